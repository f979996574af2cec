//! ROI editing session
//!
//! Live point editing, canonical point ordering, scan point classification
//! and scan navigation. Driven through explicit commands so that any UI, or
//! none, can sit on top.

pub mod error;
pub mod navigation;
pub mod ordering;
pub mod scan;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use navigation::{apply_navigation, NavigationAction, ScanCursor, ScanLayout};
pub use ordering::{compare_positions, derive_polygon, sort_points};
pub use scan::{
    is_valid_point, scan_base_name, side_file_name, valid_points, MemoryScanSource, ScanLineSource,
    DOTS_PER_LINE, FILES_PER_RUN, LINES_PER_FILE, SCAN_FILE_EXTENSION,
};
pub use session::{
    AddMode, AnnotationSession, ClassificationMode, ClassifiedPoint, LivePoint, PointId,
    SessionCommand,
};
