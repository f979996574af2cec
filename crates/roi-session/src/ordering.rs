//! Canonical ordering of a side's live points.
//!
//! Points are ordered left to right, then top to bottom, comparing whole
//! scan units only: coordinates are truncated toward zero before comparison,
//! so `(3.2, 7.9)` and `(3.8, 7.1)` tie. Sorting is stable, which keeps tied
//! points in their current relative order.

use crate::session::LivePoint;
use roi_model::{Point2D, Polygon2D};
use std::cmp::Ordering;

pub fn compare_positions(a: Point2D, b: Point2D) -> Ordering {
    truncated(a.x).cmp(&truncated(b.x)).then_with(|| truncated(a.y).cmp(&truncated(b.y)))
}

pub fn sort_points(points: &mut [LivePoint]) {
    points.sort_by(|a, b| compare_positions(a.position, b.position));
}

/// Polygon ring for a sorted point list, one vertex per point.
pub fn derive_polygon(points: &[LivePoint]) -> Polygon2D {
    Polygon2D::new(points.iter().map(|point| point.position).collect())
}

fn truncated(value: f64) -> i64 {
    value.trunc() as i64
}
