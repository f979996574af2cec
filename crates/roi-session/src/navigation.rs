//! Stepping through scan files and lines.

use crate::scan::{scan_base_name, FILES_PER_RUN, LINES_PER_FILE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanLayout {
    pub files_per_run: u32,
    pub lines_per_file: u32,
}

impl Default for ScanLayout {
    fn default() -> Self {
        Self { files_per_run: FILES_PER_RUN, lines_per_file: LINES_PER_FILE }
    }
}

impl ScanLayout {
    fn last_file(&self) -> u32 {
        self.files_per_run.saturating_sub(1)
    }

    fn last_line(&self) -> u32 {
        self.lines_per_file.saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanCursor {
    pub directory: Option<PathBuf>,
    pub file_index: u32,
    pub line_index: u32,
}

impl ScanCursor {
    pub fn base_name(&self) -> Option<PathBuf> {
        let directory = self.directory.as_deref()?;
        Some(scan_base_name(directory, self.file_index))
    }

    pub fn status_message(&self) -> String {
        let directory =
            self.directory.as_deref().map(|dir| dir.display().to_string()).unwrap_or_default();
        format!("{directory} / {} / {}", self.file_index, self.line_index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationAction {
    OpenDirectory { path: PathBuf },
    SetFile { index: u32 },
    SetLine { index: u32 },
    NextLine,
    PreviousLine,
}

pub fn apply_navigation(cursor: &mut ScanCursor, layout: ScanLayout, action: NavigationAction) {
    match action {
        NavigationAction::OpenDirectory { path } => {
            log::info!("scan directory set to {}", path.display());
            cursor.directory = Some(path);
            cursor.file_index = 0;
            cursor.line_index = 0;
        }
        NavigationAction::SetFile { index } => {
            cursor.file_index = index.min(layout.last_file());
            cursor.line_index = 0;
        }
        NavigationAction::SetLine { index } => {
            cursor.line_index = index.min(layout.last_line());
        }
        NavigationAction::NextLine => {
            cursor.line_index = (cursor.line_index + 1).min(layout.last_line());
        }
        NavigationAction::PreviousLine => {
            cursor.line_index = cursor.line_index.saturating_sub(1);
        }
    }
}
