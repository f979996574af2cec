#[derive(Debug, thiserror::Error)]
pub enum RoiError {
    #[error("malformed ROI record: {0}")]
    MalformedRecord(String),
    #[error("invalid side: {0:?} (expected one of left, top, right)")]
    InvalidSide(String),
}

impl From<serde_json::Error> for RoiError {
    fn from(error: serde_json::Error) -> Self {
        RoiError::MalformedRecord(error.to_string())
    }
}

pub type RoiResult<T> = Result<T, RoiError>;
