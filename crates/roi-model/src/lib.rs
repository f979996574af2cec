//! ROI data model for three-sided profile scans.
//!
//! Geometry value types, the per-side region and its JSON document format.

pub mod error;
pub mod geometry;
pub mod region;
pub mod side;

pub use error::{RoiError, RoiResult};
pub use geometry::{Point2D, Polygon2D, Rect2D};
pub use region::{RegionOfInterest, SideRecord, SideRegion};
pub use side::{Side, SideMap};
