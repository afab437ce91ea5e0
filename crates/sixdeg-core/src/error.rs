//! Error types for Sixdeg Core

use crate::limits::ValidationError;
use crate::source::SourceError;
use thiserror::Error;

/// Result type alias using Sixdeg's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Sixdeg error types
///
/// Unknown endpoints and unreachable targets are not errors; they come
/// back as `Ok(None)` from the finder.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Entity source error: {0}")]
    Source(#[from] SourceError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}
