//! parley-server – entry point.
//!
//! Startup order:
//! 1. Load `.env` (if present) and parse configuration from the environment.
//! 2. Initialise structured tracing (JSON or pretty, optional rolling file).
//! 3. Open the SQLite database and run pending migrations.
//! 4. Build the model client and the chat service; replay the message log
//!    into the context window.
//! 5. Build the Axum router and serve with graceful shutdown.

mod config;
mod error;
mod middleware;
mod routes;
mod schemas;
mod state;
mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use parley_core::{ChatService, GeminiGenerator, SqliteStore};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use crate::config::Config;
use crate::state::AppState;
use crate::views::Pages;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let dotenv_path = dotenvy::dotenv().ok();
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let _log_guard = init_tracing(&cfg);
    if let Some(path) = dotenv_path {
        info!(path = %path.display(), "loaded environment file");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "parley-server starting");

    // ── 3. Database ────────────────────────────────────────────────────────────
    let store = SqliteStore::connect(&cfg.database_url).await?;
    info!(database_url = %cfg.database_url, "database ready");

    // ── 4. Model client + chat service ─────────────────────────────────────────
    if cfg.api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set; every generation request will fail");
    }
    let generator = GeminiGenerator::new(cfg.gemini());
    info!(model = generator.model(), temperature = cfg.temperature, "model client ready");

    let chat = ChatService::start(store, Arc::new(generator), cfg.chat_settings()).await?;
    error::set_expose_detail(cfg.expose_errors);

    let state = Arc::new(AppState {
        config: Arc::new(cfg.clone()),
        chat: Arc::new(chat),
        pages: Arc::new(Pages::new()?),
    });

    // ── 5. HTTP server with graceful shutdown ──────────────────────────────────
    let app = routes::build(Arc::clone(&state));
    let addr: SocketAddr = cfg.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.chat.store().close().await;
    info!("parley-server stopped");
    Ok(())
}

/// Install the global subscriber.  The returned guard flushes the rolling
/// log file and must be held until shutdown.
fn init_tracing(cfg: &Config) -> Option<WorkerGuard> {
    // RUST_LOG wins; otherwise PARLEY_LOG, warning loudly if it does not parse.
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: PARLEY_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let (writer, guard) = match &cfg.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "parley-server.log");
            let (file, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(std::io::stdout.and(file)), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    guard
}

/// Returns a future that resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
