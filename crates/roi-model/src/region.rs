//! Per-side regions of interest and their JSON document format.
//!
//! A document always carries the three side keys on save:
//!
//! ```json
//! {
//!   "left": { "support": [{"x": 0.0, "y": 0.0, "width": 1.0, "height": 1.0}], "polygon": [{"x": 0.0, "y": 0.0}] },
//!   "top": { "support": [], "polygon": [] },
//!   "right": { "support": [], "polygon": [] }
//! }
//! ```
//!
//! On load any subset of the side keys may be present. Present sides are
//! replaced wholesale; absent sides keep their current state.

use crate::error::{RoiError, RoiResult};
use crate::geometry::{Point2D, Polygon2D, Rect2D};
use crate::side::{Side, SideMap};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Serialized form of one side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SideRecord {
    pub support: Vec<Rect2D>,
    pub polygon: Vec<Point2D>,
}

/// ROI for a single side: the operator-drawn polygon plus legacy support
/// rectangles that are only ever loaded and saved through.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SideRegion {
    pub support: Vec<Rect2D>,
    pub polygon: Polygon2D,
}

impl SideRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if any support rectangle holds the point.
    pub fn in_support(&self, point: Point2D) -> bool {
        self.support.iter().any(|rect| rect.contains(point))
    }

    /// Polygon containment; false until the polygon has three vertices.
    pub fn contains(&self, point: Point2D) -> bool {
        self.polygon.contains(point)
    }

    pub fn is_empty(&self) -> bool {
        self.support.is_empty() && self.polygon.is_empty()
    }

    /// True when every support and polygon value is a finite number. JSON
    /// has no encoding for NaN or infinities.
    pub fn is_finite(&self) -> bool {
        self.support.iter().all(Rect2D::is_finite)
            && self.polygon.vertices().iter().all(Point2D::is_finite)
    }

    pub fn to_record(&self) -> SideRecord {
        SideRecord { support: self.support.clone(), polygon: self.polygon.vertices().to_vec() }
    }

    pub fn from_record(record: SideRecord) -> Self {
        Self { support: record.support, polygon: Polygon2D::new(record.polygon) }
    }

    /// Replaces both support and polygon with the record contents.
    pub fn replace_from_record(&mut self, record: SideRecord) {
        *self = Self::from_record(record);
    }

    /// Validates an untyped JSON value as a side record.
    pub fn from_value(value: serde_json::Value) -> RoiResult<Self> {
        let record: SideRecord = serde_json::from_value(value)?;
        Ok(Self::from_record(record))
    }
}

#[derive(Debug, Serialize)]
struct DocumentOut {
    left: SideRecord,
    top: SideRecord,
    right: SideRecord,
}

#[derive(Debug, Deserialize)]
struct DocumentIn {
    left: Option<SideRecord>,
    top: Option<SideRecord>,
    right: Option<SideRecord>,
}

impl DocumentIn {
    fn into_side_map(self) -> SideMap<Option<SideRecord>> {
        SideMap { left: self.left, top: self.top, right: self.right }
    }
}

/// One region per side for the whole scanned object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionOfInterest {
    regions: SideMap<SideRegion>,
}

impl RegionOfInterest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &SideRegion {
        &self.regions[side]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideRegion {
        &mut self.regions[side]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &SideRegion)> {
        self.regions.iter()
    }

    /// Fails with [`RoiError::MalformedRecord`] if any side holds a
    /// non-finite value.
    pub fn to_json(&self) -> RoiResult<String> {
        if let Some((side, _)) = self.iter().find(|(_, region)| !region.is_finite()) {
            return Err(RoiError::MalformedRecord(format!(
                "{side} side has a non-finite coordinate"
            )));
        }

        let document = DocumentOut {
            left: self.regions.left.to_record(),
            top: self.regions.top.to_record(),
            right: self.regions.right.to_record(),
        };

        Ok(serde_json::to_string_pretty(&document)?)
    }

    pub fn from_json(text: &str) -> RoiResult<Self> {
        let mut roi = Self::new();
        roi.merge_json(text)?;
        Ok(roi)
    }

    /// Applies a possibly partial document. The text is fully parsed and
    /// validated before any side is replaced, so on error `self` is untouched.
    /// Returns the sides that were replaced.
    pub fn merge_json(&mut self, text: &str) -> RoiResult<Vec<Side>> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(RoiError::MalformedRecord("ROI document must be a JSON object".into()));
        }
        let document: DocumentIn = serde_json::from_value(value)?;
        let mut records = document.into_side_map();

        let mut replaced = Vec::new();
        for side in Side::ALL {
            if let Some(record) = records[side].take() {
                self.regions[side].replace_from_record(record);
                replaced.push(side);
            }
        }

        Ok(replaced)
    }
}

impl Index<Side> for RegionOfInterest {
    type Output = SideRegion;

    fn index(&self, side: Side) -> &SideRegion {
        self.side(side)
    }
}

impl IndexMut<Side> for RegionOfInterest {
    fn index_mut(&mut self, side: Side) -> &mut SideRegion {
        self.side_mut(side)
    }
}
