//! Deterministic [`Generator`] for tests.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::Generator;
use crate::context::ContextEntry;
use crate::error::GenerationError;

/// A generator that replays queued outcomes and records every call.
///
/// When the queue is empty it answers `"echo: <input>"`.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    outcomes: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<(Vec<ContextEntry>, String)>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(reply.into()));
    }

    /// Queue a failure surfaced as [`GenerationError::Unavailable`].
    pub fn push_failure(&self, message: impl Into<String>) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(message.into()));
    }

    /// Every `(context, input)` pair received so far, oldest first.
    pub fn calls(&self) -> Vec<(Vec<ContextEntry>, String)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(
        &self,
        context: &[ContextEntry],
        input: &str,
    ) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((context.to_vec(), input.to_owned()));

        let next = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(GenerationError::Unavailable(message)),
            None => Ok(format!("echo: {input}")),
        }
    }
}
