//! parley-core – conversation persistence, context window and model access.
//!
//! The crate is split along the request/response cycle:
//!
//! - [`store`]: durable append-only message log ([`MessageStore`]).
//! - [`context`]: bounded in-process window of recent turns.
//! - [`generation`]: the call to the hosted model ([`Generator`]).
//! - [`service`]: [`ChatService`], the single owner that wires the three
//!   together for the render / submit / clear operations.

pub mod context;
pub mod error;
pub mod generation;
pub mod message;
pub mod service;
pub mod store;

pub use context::{ContextEntry, ContextWindow};
pub use error::{ChatError, GenerationError, StoreError};
pub use generation::{GeminiConfig, GeminiGenerator, Generator};
pub use message::{Message, Role};
pub use service::{ChatService, ChatSettings, Reply};
pub use store::{MessageStore, SqliteStore};
