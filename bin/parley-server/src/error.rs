//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors become a `{"error": ...}` JSON
//! body with the status from [`ServerError::status`]:
//!
//! | kind                         | status |
//! |------------------------------|--------|
//! | bad request / validation     | 400    |
//! | storage                      | 500    |
//! | generation                   | 500    |
//! | internal                     | 500    |
//!
//! 500 bodies carry the underlying error text unless detail exposure has
//! been switched off with [`set_expose_detail`]; the full error is always
//! logged.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parley_core::ChatError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

static EXPOSE_DETAIL: AtomicBool = AtomicBool::new(true);

/// Toggle whether internal error text reaches HTTP clients.
pub fn set_expose_detail(expose: bool) {
    EXPOSE_DETAIL.store(expose, Ordering::Relaxed);
}

/// All errors that can occur in the parley-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request could not be parsed.
    #[error("{0}")]
    BadRequest(String),

    /// Propagated from the chat service.
    #[error(transparent)]
    Chat(#[from] ChatError),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::Chat(ChatError::Validation(_)) => {
                StatusCode::BAD_REQUEST
            }
            ServerError::Chat(ChatError::Storage(_))
            | ServerError::Chat(ChatError::Generation(_))
            | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self, expose_detail: bool) -> String {
        if self.status().is_client_error() || expose_detail {
            self.to_string()
        } else {
            "internal server error".to_owned()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                ServerError::Chat(ChatError::Generation(e)) => {
                    error!(error = %e, "generation error")
                }
                ServerError::Chat(ChatError::Storage(e)) => error!(error = %e, "storage error"),
                other => error!(error = %other, "internal server error"),
            }
        }
        let message = self.client_message(EXPOSE_DETAIL.load(Ordering::Relaxed));
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<minijinja::Error> for ServerError {
    fn from(e: minijinja::Error) -> Self {
        ServerError::Internal(format!("template rendering failed: {e}"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use parley_core::GenerationError;

    #[test]
    fn validation_maps_to_bad_request_with_message() {
        let err = ServerError::from(ChatError::Validation("Empty message".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(false), "Empty message");
    }

    #[test]
    fn generation_maps_to_internal_error() {
        let err = ServerError::from(ChatError::Generation(GenerationError::MissingCredential));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.client_message(true).contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn hidden_detail_returns_generic_message() {
        let err = ServerError::Internal("path /secret/db".into());
        assert_eq!(err.client_message(false), "internal server error");
    }

    #[test]
    fn bad_request_is_always_exposed() {
        let err = ServerError::BadRequest("expected JSON".into());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(false), "expected JSON");
    }
}
