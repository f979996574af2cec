//! Seam to the scan decoder.
//!
//! Decoding the binary scan files is not done here. A decoder exposes each
//! line as per-side coordinate arrays through [`ScanLineSource`]; only
//! points with strictly positive coordinates on both axes are yielded.

use roi_model::{Point2D, Side, SideMap};
use std::path::{Path, PathBuf};

/// Scan files recorded per run.
pub const FILES_PER_RUN: u32 = 30;
/// Scan lines stored in one file.
pub const LINES_PER_FILE: u32 = 512;
/// Dots captured per scan line.
pub const DOTS_PER_LINE: usize = 1024;

pub const SCAN_FILE_EXTENSION: &str = ".dat";

pub trait ScanLineSource {
    fn line_count(&self) -> usize;

    /// Valid points of one side on a zero-based line. Lines past the end
    /// yield nothing.
    fn points(&self, side: Side, line: usize) -> Vec<Point2D>;
}

pub fn is_valid_point(point: Point2D) -> bool {
    point.x > 0.0 && point.y > 0.0
}

/// Pairs up coordinate arrays and drops non-positive points.
pub fn valid_points(xs: &[f32], ys: &[f32]) -> Vec<Point2D> {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| Point2D::new(f64::from(x), f64::from(y)))
        .filter(|&point| is_valid_point(point))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
struct RawLine {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

/// Scan lines held in memory, as a decoder would hand them over.
#[derive(Debug, Clone, Default)]
pub struct MemoryScanSource {
    lines: SideMap<Vec<RawLine>>,
}

impl MemoryScanSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_line(&mut self, side: Side, xs: Vec<f32>, ys: Vec<f32>) {
        if xs.len() != ys.len() {
            log::warn!(
                "{side} line {} has {} x and {} y values; extra values are ignored",
                self.lines[side].len(),
                xs.len(),
                ys.len()
            );
        }
        if xs.len() > DOTS_PER_LINE {
            log::warn!("{side} line has {} dots, more than the {DOTS_PER_LINE} a scanner captures", xs.len());
        }
        self.lines[side].push(RawLine { xs, ys });
    }
}

impl ScanLineSource for MemoryScanSource {
    fn line_count(&self) -> usize {
        Side::ALL.into_iter().map(|side| self.lines[side].len()).max().unwrap_or(0)
    }

    fn points(&self, side: Side, line: usize) -> Vec<Point2D> {
        match self.lines[side].get(line) {
            Some(raw) => valid_points(&raw.xs, &raw.ys),
            None => Vec::new(),
        }
    }
}

/// Base name shared by the three side files of one scan, `<dir>/scan_<index>`.
pub fn scan_base_name(directory: &Path, file_index: u32) -> PathBuf {
    directory.join(format!("scan_{file_index}"))
}

/// File holding one side of a scan, `<base>_<side><ext>`.
pub fn side_file_name(base: &Path, side: Side, extension: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(format!("_{side}{extension}"));
    PathBuf::from(name)
}
