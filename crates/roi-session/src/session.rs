//! Interactive ROI editing state.
//!
//! The session owns the live points for every side. Each side's polygon is
//! derived from its sorted points after every mutation and is never edited
//! directly. Support rectangles have no editing affordance and are carried
//! from import to export unchanged.

use crate::error::{SessionError, SessionResult};
use crate::ordering::{derive_polygon, sort_points};
use crate::scan::ScanLineSource;
use roi_model::{Point2D, Polygon2D, RegionOfInterest, Side, SideMap, SideRegion};
use serde::{Deserialize, Serialize};

/// Stable identity of a live point within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePoint {
    pub id: PointId,
    pub position: Point2D,
}

/// Session-wide arming for point placement. Arming is one-shot: the first
/// placement on any side disarms it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddMode {
    #[default]
    Idle,
    Armed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Inside the side's polygon.
    #[default]
    Polygon,
    /// Inside the polygon or any support rectangle.
    PolygonOrSupport,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedPoint {
    #[serde(flatten)]
    pub point: Point2D,
    pub inside: bool,
}

impl ClassifiedPoint {
    pub fn label(&self) -> String {
        format!("{:.2}x{:.2}", self.point.x, self.point.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    ArmAdd,
    PlacePoint { side: Side, position: Point2D },
    MovePoint { side: Side, id: PointId, position: Point2D },
}

#[derive(Debug, Clone, Default)]
struct SideState {
    points: Vec<LivePoint>,
    region: SideRegion,
}

impl SideState {
    fn rebuild(&mut self) {
        sort_points(&mut self.points);
        self.region.polygon = derive_polygon(&self.points);
    }
}

#[derive(Debug, Clone)]
pub struct AnnotationSession {
    sides: SideMap<SideState>,
    add_mode: AddMode,
    next_point_id: u64,
}

impl Default for AnnotationSession {
    fn default() -> Self {
        Self { sides: SideMap::default(), add_mode: AddMode::Idle, next_point_id: 1 }
    }
}

impl AnnotationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mode(&self) -> AddMode {
        self.add_mode
    }

    pub fn is_armed(&self) -> bool {
        self.add_mode == AddMode::Armed
    }

    pub fn points(&self, side: Side) -> &[LivePoint] {
        &self.sides[side].points
    }

    pub fn region(&self, side: Side) -> &SideRegion {
        &self.sides[side].region
    }

    pub fn polygon(&self, side: Side) -> &Polygon2D {
        &self.sides[side].region.polygon
    }

    /// Point at a position in the canonical order of a side.
    pub fn point_at(&self, side: Side, index: usize) -> Option<LivePoint> {
        self.sides[side].points.get(index).copied()
    }

    pub fn arm_add(&mut self) {
        self.add_mode = AddMode::Armed;
    }

    /// Creates a point when armed and disarms the session. Picks while idle
    /// are ignored and return `None`.
    pub fn place_point(&mut self, side: Side, position: Point2D) -> Option<PointId> {
        if self.add_mode != AddMode::Armed {
            log::debug!("ignoring pick on {side} at ({}, {}): not armed", position.x, position.y);
            return None;
        }

        let id = self.new_point_id();
        let state = &mut self.sides[side];
        state.points.push(LivePoint { id, position });
        state.rebuild();
        self.add_mode = AddMode::Idle;

        log::debug!(
            "placed point {} on {side} at ({}, {}); polygon has {} vertices",
            id.0,
            position.x,
            position.y,
            state.points.len()
        );
        Some(id)
    }

    pub fn move_point(&mut self, side: Side, id: PointId, position: Point2D) -> SessionResult<()> {
        let state = &mut self.sides[side];
        let point = state
            .points
            .iter_mut()
            .find(|point| point.id == id)
            .ok_or(SessionError::UnknownPoint { side, id })?;

        point.position = position;
        state.rebuild();
        Ok(())
    }

    pub fn apply(&mut self, command: SessionCommand) -> SessionResult<Option<PointId>> {
        match command {
            SessionCommand::ArmAdd => {
                self.arm_add();
                Ok(None)
            }
            SessionCommand::PlacePoint { side, position } => Ok(self.place_point(side, position)),
            SessionCommand::MovePoint { side, id, position } => {
                self.move_point(side, id, position)?;
                Ok(Some(id))
            }
        }
    }

    pub fn classify_scan_points(&self, side: Side, points: &[Point2D]) -> Vec<ClassifiedPoint> {
        self.classify_scan_points_with(side, points, ClassificationMode::Polygon)
    }

    pub fn classify_scan_points_with(
        &self,
        side: Side,
        points: &[Point2D],
        mode: ClassificationMode,
    ) -> Vec<ClassifiedPoint> {
        let region = self.region(side);
        points
            .iter()
            .map(|&point| {
                let inside = match mode {
                    ClassificationMode::Polygon => region.contains(point),
                    ClassificationMode::PolygonOrSupport => {
                        region.contains(point) || region.in_support(point)
                    }
                };
                ClassifiedPoint { point, inside }
            })
            .collect()
    }

    /// Classifies one scan line on every side.
    pub fn classify_line<S: ScanLineSource + ?Sized>(
        &self,
        source: &S,
        line: usize,
        mode: ClassificationMode,
    ) -> SideMap<Vec<ClassifiedPoint>> {
        SideMap::from_fn(|side| {
            let points = source.points(side, line);
            self.classify_scan_points_with(side, &points, mode)
        })
    }

    pub fn export_to_region(&self) -> RegionOfInterest {
        let mut roi = RegionOfInterest::new();
        for side in Side::ALL {
            let state = &self.sides[side];
            roi[side] = SideRegion {
                support: state.region.support.clone(),
                polygon: derive_polygon(&state.points),
            };
        }
        roi
    }

    /// Replaces every side's live points with the ROI's polygon vertices.
    pub fn import_from_region(&mut self, roi: &RegionOfInterest) {
        for side in Side::ALL {
            self.replace_side(side, roi.side(side));
        }
    }

    pub fn save_json(&self) -> SessionResult<String> {
        Ok(self.export_to_region().to_json()?)
    }

    /// Loads a possibly partial ROI document. Sides missing from the document
    /// keep their live points; on error nothing changes.
    pub fn load_json(&mut self, text: &str) -> SessionResult<Vec<Side>> {
        let mut roi = self.export_to_region();
        let replaced = roi.merge_json(text)?;

        for &side in &replaced {
            self.replace_side(side, roi.side(side));
        }

        log::info!("loaded ROI document; replaced sides: {replaced:?}");
        Ok(replaced)
    }

    /// Returns true when the stored vertices were not in canonical order and
    /// had to be re-sorted.
    fn replace_side(&mut self, side: Side, region: &SideRegion) -> bool {
        let points: Vec<LivePoint> = region
            .polygon
            .vertices()
            .iter()
            .map(|&position| LivePoint { id: self.new_point_id(), position })
            .collect();

        let state = &mut self.sides[side];
        state.points = points;
        state.region.support = region.support.clone();
        state.rebuild();

        let reordered = state.region.polygon != region.polygon;
        if reordered {
            log::warn!(
                "{side} polygon vertices were not in canonical order and have been re-sorted; \
                 the next save writes the new order"
            );
        }
        reordered
    }

    fn new_point_id(&mut self) -> PointId {
        let id = PointId(self.next_point_id);
        self.next_point_id += 1;
        id
    }
}
