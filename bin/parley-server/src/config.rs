//! Server configuration, loaded from environment variables at startup.

use parley_core::context::{DEFAULT_SEED_MESSAGE, DEFAULT_TURN_LIMIT};
use parley_core::generation::gemini::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use parley_core::service::DEFAULT_MAX_MESSAGE_BYTES;
use parley_core::{ChatSettings, GeminiConfig};

/// Runtime configuration for parley-server.
///
/// Every field has a default so the server starts without any environment
/// variables set.  Without a credential it still starts; generation calls
/// then fail with a 500.
#[derive(Clone)]
pub struct Config {
    /// TCP address to bind (default: `"127.0.0.1:5000"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://chat_history.db"`).  The file
    /// is created if it does not exist.
    pub database_url: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,sqlx=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Directory for a daily-rolling log file, in addition to stdout.
    pub log_dir: Option<String>,

    /// Credential for the hosted model (`GOOGLE_API_KEY`, falling back to
    /// `GEMINI_API_KEY`).
    pub api_key: Option<String>,

    pub model: String,
    pub temperature: f64,

    /// Number of turns kept in the context window.
    pub turn_limit: usize,

    /// Instruction placed at the head of the context window.
    pub seed_message: String,

    pub max_message_bytes: usize,

    /// Comma-separated CORS origins; `None` allows any origin.
    pub cors_allowed_origins: Option<String>,

    /// Serve `/swagger-ui` and `/api-docs/openapi.json`.
    pub enable_swagger: bool,

    /// Include the underlying error text in 500 responses.
    pub expose_errors: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag_or = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };

        Self {
            bind_address: string_or("PARLEY_BIND", "127.0.0.1:5000"),
            database_url: string_or("PARLEY_DATABASE_URL", "sqlite://chat_history.db"),
            log_level: string_or("PARLEY_LOG", "info"),
            log_json: flag_or("PARLEY_LOG_JSON", false),
            log_dir: non_empty("PARLEY_LOG_DIR"),
            api_key: non_empty("GOOGLE_API_KEY").or_else(|| non_empty("GEMINI_API_KEY")),
            model: string_or("PARLEY_MODEL", DEFAULT_MODEL),
            temperature: parse_or(&lookup, "PARLEY_TEMPERATURE", DEFAULT_TEMPERATURE),
            turn_limit: parse_or(&lookup, "PARLEY_TURN_LIMIT", DEFAULT_TURN_LIMIT).max(1),
            seed_message: string_or("PARLEY_SEED_MESSAGE", DEFAULT_SEED_MESSAGE),
            max_message_bytes: parse_or(&lookup, "PARLEY_MAX_MESSAGE_BYTES", DEFAULT_MAX_MESSAGE_BYTES),
            cors_allowed_origins: non_empty("PARLEY_CORS_ORIGINS"),
            enable_swagger: flag_or("PARLEY_ENABLE_SWAGGER", true),
            expose_errors: flag_or("PARLEY_EXPOSE_ERRORS", true),
        }
    }

    pub fn chat_settings(&self) -> ChatSettings {
        ChatSettings {
            turn_limit: self.turn_limit,
            seed_message: self.seed_message.clone(),
            max_message_bytes: self.max_message_bytes,
        }
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig::new(self.api_key.clone(), self.model.clone()).with_temperature(self.temperature)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_url", &self.database_url)
            .field("log_level", &self.log_level)
            .field("log_json", &self.log_json)
            .field("log_dir", &self.log_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("turn_limit", &self.turn_limit)
            .field("max_message_bytes", &self.max_message_bytes)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("enable_swagger", &self.enable_swagger)
            .field("expose_errors", &self.expose_errors)
            .finish_non_exhaustive()
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_or<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
