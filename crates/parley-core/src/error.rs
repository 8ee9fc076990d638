//! Error taxonomy for the chat core.
//!
//! [`ChatError`] is what the service hands back to callers; the HTTP layer
//! maps each variant to a status code.

use thiserror::Error;

/// Failures of the persistent message log.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Failures of the external generation call.  No retry is attempted for
/// any of these.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no model credential configured; set GOOGLE_API_KEY")]
    MissingCredential,

    #[error("generation service error: {0}")]
    Service(#[from] genai::Error),

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error("generation service unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`crate::ChatService`] operations.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The input was rejected before anything was persisted.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

