use thiserror::Error;

/// Unified result type for the easel crate.
pub type Result<T> = std::result::Result<T, EaselError>;

/// Failures surfaced by the runtime and renderer.
///
/// Command rejections are not errors; they travel as
/// [`crate::engine::Rejection`] values inside an outcome.
#[derive(Debug, Error)]
pub enum EaselError {
    #[error("terminal backend error: {0}")]
    Backend(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
