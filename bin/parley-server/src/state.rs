//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use parley_core::{ChatService, SqliteStore};

use crate::config::Config;
use crate::views::Pages;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Owner of the message log and the context window.
    pub chat: Arc<ChatService<SqliteStore>>,
    /// Compiled HTML templates.
    pub pages: Arc<Pages>,
}
