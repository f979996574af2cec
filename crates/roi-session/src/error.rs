use crate::session::PointId;
use roi_model::{RoiError, Side};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no point {} on side {side}", .id.0)]
    UnknownPoint { side: Side, id: PointId },
    #[error(transparent)]
    Roi(#[from] RoiError),
}

pub type SessionResult<T> = Result<T, SessionError>;
