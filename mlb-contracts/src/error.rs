use thiserror::Error;

/// Error taxonomy shared by the stores, the monitor, and the controller.
///
/// Stores only ever surface [`ControllerError::NotFound`]; the remaining
/// variants are produced by the monitor and controller while talking to
/// external collaborators (TopoSource, OffsetSink) or while cooperatively
/// cancelling.
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("empty source")]
    EmptySource,

    #[error("cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
