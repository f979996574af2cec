//! Minimal 2D value types for scan-space geometry.
//!
//! All coordinates are in scan units as produced by the profile decoder:
//! x runs across the scan line and y is the range reading. No coordinate
//! transforms happen here.

use serde::{Deserialize, Serialize};

/// A point in scan space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle used for support regions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect2D {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect2D {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Closed-rectangle containment.
    ///
    /// Negative extents are normalized first, so a rectangle stored as
    /// `(10, 10, -5, -5)` covers the same area as `(5, 5, 5, 5)`. A rectangle
    /// with zero width or height is null and contains nothing.
    pub fn contains(&self, point: Point2D) -> bool {
        let (left, right) = ordered(self.x, self.x + self.width);
        let (top, bottom) = ordered(self.y, self.y + self.height);
        if left == right || top == bottom {
            return false;
        }

        point.x >= left && point.x <= right && point.y >= top && point.y <= bottom
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Ordered vertex ring, implicitly closed from the last vertex to the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon2D {
    vertices: Vec<Point2D>,
}

impl Polygon2D {
    pub fn new(vertices: Vec<Point2D>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2D] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// True once the ring has enough vertices to enclose an area.
    pub fn is_closed_ring(&self) -> bool {
        self.vertices.len() >= 3
    }

    pub fn into_vertices(self) -> Vec<Point2D> {
        self.vertices
    }

    /// Even-odd containment test.
    ///
    /// A ray is cast towards negative x. Horizontal edges never count (edges
    /// whose end heights are equal up to a relative 1e-12), and an
    /// edge counts only for `y1 <= p.y < y2` with the crossing at or left of
    /// `p.x`. Under this convention the min-x/min-y corner of an axis-aligned
    /// square is inside while the opposite edges are outside.
    ///
    /// Rings with fewer than three vertices contain nothing.
    pub fn contains(&self, point: Point2D) -> bool {
        if !self.is_closed_ring() {
            return false;
        }

        let mut crossings = 0usize;
        let count = self.vertices.len();
        for index in 0..count {
            let start = self.vertices[index];
            let end = self.vertices[(index + 1) % count];
            if edge_crosses_left_ray(start, end, point) {
                crossings += 1;
            }
        }

        crossings % 2 == 1
    }
}

impl From<Vec<Point2D>> for Polygon2D {
    fn from(vertices: Vec<Point2D>) -> Self {
        Self::new(vertices)
    }
}

fn edge_crosses_left_ray(start: Point2D, end: Point2D, point: Point2D) -> bool {
    if fuzzy_eq(start.y, end.y) {
        return false;
    }

    let (low, high) = if start.y < end.y { (start, end) } else { (end, start) };
    if point.y < low.y || point.y >= high.y {
        return false;
    }

    let x = low.x + (high.x - low.x) / (high.y - low.y) * (point.y - low.y);
    x <= point.x
}

fn fuzzy_eq(a: f64, b: f64) -> bool {
    (a - b).abs() * 1e12 <= a.abs().min(b.abs())
}
