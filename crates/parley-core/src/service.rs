//! The request/response cycle.
//!
//! [`ChatService`] is the single owner of the context window.  Submit and
//! clear run under an async conversation gate, so a reply is always
//! generated against a window that reflects every turn completed before
//! it, and a clear never lands between a submit's user and assistant
//! writes.  Rendering only reads the store and skips the gate.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::context::{ContextEntry, ContextWindow, DEFAULT_SEED_MESSAGE, DEFAULT_TURN_LIMIT};
use crate::error::ChatError;
use crate::generation::Generator;
use crate::message::{Message, Role};
use crate::store::MessageStore;

/// Returned for empty or whitespace-only input.
pub const EMPTY_MESSAGE: &str = "Empty message";

/// Default upper bound on accepted input, in bytes.
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 32 * 1024;

#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub turn_limit: usize,
    pub seed_message: String,
    pub max_message_bytes: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            turn_limit: DEFAULT_TURN_LIMIT,
            seed_message: DEFAULT_SEED_MESSAGE.to_owned(),
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

/// Outcome of a successful submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub user_message_id: i64,
    pub assistant_message_id: i64,
    pub text: String,
}

pub struct ChatService<S> {
    store: S,
    generator: Arc<dyn Generator>,
    window: Mutex<ContextWindow>,
    gate: AsyncMutex<()>,
    max_message_bytes: usize,
}

impl<S: std::fmt::Debug> std::fmt::Debug for ChatService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("store", &self.store)
            .field("max_message_bytes", &self.max_message_bytes)
            .finish_non_exhaustive()
    }
}

impl<S: MessageStore> ChatService<S> {
    /// Build the service and rebuild the context window by replaying the
    /// persisted log, so only its last `turn_limit` turns survive.
    pub async fn start(
        store: S,
        generator: Arc<dyn Generator>,
        settings: ChatSettings,
    ) -> Result<Self, ChatError> {
        let mut window = ContextWindow::new(settings.seed_message, settings.turn_limit);
        let history = store.list_all().await?;
        window.replay(&history);
        info!(
            messages = history.len(),
            turns = window.turn_count(),
            turn_limit = window.turn_limit(),
            "context window rebuilt from message log"
        );

        Ok(Self {
            store,
            generator,
            window: Mutex::new(window),
            gate: AsyncMutex::new(()),
            max_message_bytes: settings.max_message_bytes,
        })
    }

    /// Full message log in insertion order.  Read-only.
    pub async fn history(&self) -> Result<Vec<Message>, ChatError> {
        Ok(self.store.list_all().await?)
    }

    /// Persist `input`, generate a reply against the current window, then
    /// persist the reply and advance the window.
    ///
    /// The user message is committed before generation starts and stays
    /// committed if generation fails; in that case no assistant row is
    /// written and the window is left untouched.
    pub async fn submit(&self, input: &str) -> Result<Reply, ChatError> {
        if input.trim().is_empty() {
            return Err(ChatError::Validation(EMPTY_MESSAGE.to_owned()));
        }
        if input.len() > self.max_message_bytes {
            return Err(ChatError::Validation(format!(
                "Message too long ({} bytes); maximum is {} bytes",
                input.len(),
                self.max_message_bytes
            )));
        }

        let _turn = self.gate.lock().await;

        let user_message_id = self.store.append(Role::User, input).await?;
        let context = self.lock_window().snapshot();
        debug!(user_message_id, context_len = context.len(), "user message stored");

        let started = Instant::now();
        let text = match self.generator.generate(&context, input).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    user_message_id,
                    error = %e,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "generation failed; user message kept without reply"
                );
                return Err(e.into());
            }
        };

        let assistant_message_id = self.store.append(Role::Assistant, &text).await?;
        {
            let mut window = self.lock_window();
            window.record_user(input);
            window.record_assistant(text.as_str());
        }

        info!(
            user_message_id,
            assistant_message_id,
            reply_len = text.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "reply generated"
        );

        Ok(Reply {
            user_message_id,
            assistant_message_id,
            text,
        })
    }

    /// Delete the whole log and reset the window to its seed.
    pub async fn clear(&self) -> Result<(), ChatError> {
        let _turn = self.gate.lock().await;
        let removed = self.store.clear().await?;
        self.lock_window().clear();
        info!(removed, "chat cleared");
        Ok(())
    }

    /// Copy of the current context window.
    pub fn context_snapshot(&self) -> Vec<ContextEntry> {
        self.lock_window().snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // A panic while holding the lock cannot leave the window half-updated
    // (every mutation is a single push/pop), so a poisoned lock is reused.
    fn lock_window(&self) -> MutexGuard<'_, ContextWindow> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
