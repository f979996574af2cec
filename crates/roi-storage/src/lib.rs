use directories::ProjectDirs;
use roi_model::{RegionOfInterest, RoiError, Side};
use roi_session::{AnnotationSession, ClassificationMode, ScanLayout, SessionError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PREFS_SCHEMA_VERSION: u32 = 1;

/// Suffix appended to a scan base name for its ROI sidecar.
pub const ROI_FILE_SUFFIX: &str = ".roi.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Roi(#[from] RoiError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub scan_directory: Option<PathBuf>,
    pub layout: ScanLayout,
    pub classification: ClassificationMode,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            scan_directory: None,
            layout: ScanLayout::default(),
            classification: ClassificationMode::Polygon,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferencesEnvelope {
    version: u32,
    preferences: Preferences,
}

impl Storage {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs =
            ProjectDirs::from("dev", "Ruler", "Ruler").ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load_preferences(&self) -> Result<Preferences, StorageError> {
        let path = self.preferences_path();
        if !path.exists() {
            return Ok(Preferences::default());
        }

        let bytes = fs::read(path)?;
        let envelope: PreferencesEnvelope = serde_json::from_slice(&bytes)?;

        Ok(envelope.preferences)
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;

        let envelope =
            PreferencesEnvelope { version: PREFS_SCHEMA_VERSION, preferences: preferences.clone() };

        let bytes = serde_json::to_vec_pretty(&envelope)?;
        write_atomically(&self.preferences_path(), &bytes)?;
        Ok(())
    }

    fn preferences_path(&self) -> PathBuf {
        self.root.join("preferences.json")
    }
}

/// ROI sidecar for a scan base name, e.g. `scan_3` -> `scan_3.roi.json`.
pub fn roi_sidecar_path(scan_base: &Path) -> PathBuf {
    let mut name = scan_base.as_os_str().to_owned();
    name.push(ROI_FILE_SUFFIX);
    PathBuf::from(name)
}

pub fn save_roi(path: &Path, roi: &RegionOfInterest) -> Result<(), StorageError> {
    let json = roi.to_json()?;
    write_atomically(path, json.as_bytes())?;
    log::info!("saved ROI to {}", path.display());
    Ok(())
}

pub fn load_roi(path: &Path) -> Result<RegionOfInterest, StorageError> {
    let json = fs::read_to_string(path)?;
    Ok(RegionOfInterest::from_json(&json)?)
}

/// Merges the sides present in the file into `roi`. Nothing changes when
/// reading or parsing fails.
pub fn load_roi_into(path: &Path, roi: &mut RegionOfInterest) -> Result<Vec<Side>, StorageError> {
    let json = fs::read_to_string(path)?;
    let replaced = roi.merge_json(&json)?;
    log::info!("loaded {} side(s) from {}", replaced.len(), path.display());
    Ok(replaced)
}

pub fn save_session(path: &Path, session: &AnnotationSession) -> Result<(), StorageError> {
    save_roi(path, &session.export_to_region())
}

pub fn load_session(path: &Path, session: &mut AnnotationSession) -> Result<Vec<Side>, StorageError> {
    let json = fs::read_to_string(path)?;
    Ok(session.load_json(&json)?)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_sibling(path);
    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// `x.roi.json` -> `x.roi.json.tmp`, unique per target file name.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
