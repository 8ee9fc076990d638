//! SQLite implementation of [`MessageStore`].
//!
//! Migrations under `./migrations` are embedded at compile time and run on
//! every [`SqliteStore::connect`]; the schema uses `CREATE TABLE IF NOT
//! EXISTS` so pre-existing chat databases open unchanged.
//!
//! The runtime-checked `sqlx::query` form is used so that no
//! `DATABASE_URL` is needed at compile time.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use super::MessageStore;
use crate::error::StoreError;
use crate::message::{Message, Role};

/// SQLite-backed message log.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `url` and run pending migrations.
    ///
    /// `url` is a sqlx SQLite URL, e.g. `"sqlite://chat_history.db"` or
    /// `"sqlite::memory:"` for tests.  An in-memory database lives in a
    /// single connection, so the pool is pinned to one connection that is
    /// never recycled.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool_options = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options.connect_with(options).await?;
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Close every pooled connection.  Subsequent calls fail with
    /// [`StoreError::Database`].
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl MessageStore for SqliteStore {
    async fn append(&self, role: Role, content: &str) -> Result<i64, StoreError> {
        let result = sqlx::query("INSERT INTO messages (role, content) VALUES (?1, ?2)")
            .bind(role.to_string())
            .bind(content)
            .execute(&self.pool)
            .await?;
        let id = result.last_insert_rowid();
        debug!(message_id = id, %role, "message appended");
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Message>, StoreError> {
        let rows: Vec<(i64, String, String)> =
            sqlx::query_as("SELECT id, role, content FROM messages ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, role, content)| match Role::from_str(&role) {
                Ok(role) => Some(Message { id, role, content }),
                Err(_) => {
                    warn!(message_id = id, raw = %role, "skipping message with unknown role");
                    None
                }
            })
            .collect())
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM messages")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
