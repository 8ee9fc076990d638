use async_trait::async_trait;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};
use tracing::{debug, warn};

use super::Generator;
use crate::context::ContextEntry;
use crate::error::GenerationError;
use crate::message::Role;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Connection settings for [`GeminiGenerator`].
#[derive(Clone)]
pub struct GeminiConfig {
    /// API credential; `None` makes every call fail with
    /// [`GenerationError::MissingCredential`].
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
}

impl GeminiConfig {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// [`Generator`] backed by a Gemini chat model.
pub struct GeminiGenerator {
    client: Client,
    model: String,
    options: ChatOptions,
    has_credential: bool,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Self {
        let has_credential = config.api_key.is_some();
        let client = match config.api_key {
            Some(key) => {
                let resolver = AuthResolver::from_resolver_fn(
                    move |_model: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                        Ok(Some(AuthData::from_single(key.clone())))
                    },
                );
                Client::builder().with_auth_resolver(resolver).build()
            }
            None => {
                warn!("no model credential configured; generation requests will fail");
                Client::default()
            }
        };

        Self {
            client,
            model: config.model,
            options: ChatOptions::default().with_temperature(config.temperature),
            has_credential,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl std::fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("model", &self.model)
            .field("has_credential", &self.has_credential)
            .finish()
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(
        &self,
        context: &[ContextEntry],
        input: &str,
    ) -> Result<String, GenerationError> {
        if !self.has_credential {
            return Err(GenerationError::MissingCredential);
        }

        let request = build_request(context, input);
        debug!(model = %self.model, context_len = context.len(), "sending generation request");

        let response = self
            .client
            .exec_chat(self.model.as_str(), request, Some(&self.options))
            .await?;

        match response.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_owned()),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}

/// Map the snapshot onto a chat request: the seed becomes the system
/// instruction, turns keep their roles, `input` is the final user message.
fn build_request(context: &[ContextEntry], input: &str) -> ChatRequest {
    let mut request = ChatRequest::default();
    for entry in context {
        request = match entry.role {
            Role::System => request.with_system(entry.text.as_str()),
            Role::User => request.append_message(ChatMessage::user(entry.text.as_str())),
            Role::Assistant => request.append_message(ChatMessage::assistant(entry.text.as_str())),
        };
    }
    request.append_message(ChatMessage::user(input))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
