//! Access to the hosted text-generation model.
//!
//! [`Generator`] is the seam between the chat service and the remote call.
//! [`gemini::GeminiGenerator`] talks to Google's Gemini models through
//! `genai`; tests substitute the scripted implementation.

pub mod gemini;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;

pub use gemini::{GeminiConfig, GeminiGenerator};
#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedGenerator;

use async_trait::async_trait;

use crate::context::ContextEntry;
use crate::error::GenerationError;

/// Produces a reply for `input` given the current context snapshot.
///
/// One attempt per call; failures are returned as-is.  No timeout is
/// applied here, so a slow service holds the caller for its full duration.
#[async_trait]
pub trait Generator: Send + Sync + 'static {
    async fn generate(
        &self,
        context: &[ContextEntry],
        input: &str,
    ) -> Result<String, GenerationError>;
}
