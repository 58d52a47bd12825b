//! Persistent session storage for GlowAuth.
//!
//! Provides the [`SessionStore`] trait — a durable, crash-surviving
//! key/value surface holding at most one serialized [`Session`] record —
//! plus two implementations:
//!
//! - [`FileSessionStore`] — one JSON file in the platform data
//!   directory. The production store.
//! - [`MemorySessionStore`] — a mutex-guarded slot. For tests, demos,
//!   and sessions that shouldn't outlive the process.
//!
//! The store is a passive dependency: only the auth client reads or
//! writes it, and the in-memory state it feeds stays authoritative for
//! the life of the process even when a write fails.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::{FileSessionStore, STORAGE_KEY};
pub use memory::MemorySessionStore;

use glowauth_session::Session;

/// Durable storage for at most one session record.
///
/// # Trait bounds
///
/// - `Send + Sync` → the store can be shared across async tasks
///   (Tokio may poll store futures from different threads).
/// - `'static` → it doesn't borrow temporary data; it lives as long
///   as the auth client that owns it.
///
/// # Contract
///
/// - `load` never fails: an absent record, an unreadable backing file,
///   or a record that doesn't parse are all normal, expected states and
///   yield `None`. Implementations log the cause at warn level.
/// - `save` reports failure so the caller can decide what to do with
///   it; no retries, no versioning, no migrations happen here.
pub trait SessionStore: Send + Sync + 'static {
    /// Reads the stored session, if any.
    ///
    /// Returns `None` when no record exists or when the stored value
    /// fails to deserialize for any reason — a corrupt record is
    /// equivalent to "no session", never an error.
    fn load(&self) -> impl std::future::Future<Output = Option<Session>> + Send;

    /// Writes or clears the single session record.
    ///
    /// `Some(session)` serializes and overwrites any previous value;
    /// `None` deletes the record entirely (deleting an already-absent
    /// record succeeds).
    ///
    /// # Errors
    /// Returns [`StoreError`] when serialization or the underlying
    /// storage write fails.
    fn save(
        &self,
        session: Option<&Session>,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// A shared handle to a store is itself a store. Lets an owner keep a
/// reference to the same storage the auth client writes through.
impl<S: SessionStore> SessionStore for std::sync::Arc<S> {
    async fn load(&self) -> Option<Session> {
        S::load(self).await
    }

    async fn save(&self, session: Option<&Session>) -> Result<(), StoreError> {
        S::save(self, session).await
    }
}
