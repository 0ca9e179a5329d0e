//! Error taxonomy shared by every handler.

use thiserror::Error;

/// Everything a handler can fail with, mapped uniformly to HTTP status
/// codes by `response::from_error`: validation -> 400, not-found -> 404,
/// store -> 500 with the cause logged and a generic body.
#[derive(Debug, Error)]
pub enum PetApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Pet not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
