//! Message log abstraction.
//!
//! [`MessageStore`] is the contract the chat service persists through.  The
//! default implementation is [`sqlite::SqliteStore`]; another backend only
//! has to implement the three operations below.
//!
//! Trait methods use `impl Future` in their signatures so no `async-trait`
//! boxing is needed on this hot path.

pub mod sqlite;

pub use sqlite::SqliteStore;

use std::future::Future;

use crate::error::StoreError;
use crate::message::{Message, Role};

/// Durable, append-only log of role-tagged messages.
///
/// Implementations must tolerate concurrent calls from multiple request
/// handlers; the SQLite implementation relies on the database's own
/// transactional guarantees for this.
pub trait MessageStore: Send + Sync + 'static {
    /// Insert a new record and return its sequence id.
    fn append(
        &self,
        role: Role,
        content: &str,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// All records in insertion order; empty when the log is empty.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Irreversibly delete every record.  Returns the number removed.
    fn clear(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;
}
