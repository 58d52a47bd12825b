//! In-memory [`SessionStore`] for tests, demos, and ephemeral sessions.

use std::sync::{Mutex, PoisonError};

use glowauth_session::Session;

use crate::{SessionStore, StoreError};

/// A [`SessionStore`] holding the record in a mutex-guarded slot.
///
/// Nothing survives the process, so "durable" here means "durable for
/// the life of this store value". Saves never fail.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with a session, as if a previous run
    /// had signed in and persisted it.
    pub fn seeded(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Option<Session> {
        // The lock is only ever held for a clone/assign, so a poisoned
        // mutex can't leave the slot torn — recover the inner value.
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn save(&self, session: Option<&Session>) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) =
            session.cloned();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_empty_returns_none() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let store = MemorySessionStore::new();
        let session = Session::for_email("a@x.com");

        store.save(Some(&session)).await.unwrap();

        assert_eq!(store.load().await, Some(session));
    }

    #[tokio::test]
    async fn test_save_none_clears_slot() {
        let store = MemorySessionStore::seeded(Session::for_email("a@x.com"));

        store.save(None).await.unwrap();

        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn test_seeded_store_loads_seed() {
        let session = Session::for_email("a@x.com");
        let store = MemorySessionStore::seeded(session.clone());

        assert_eq!(store.load().await, Some(session));
    }
}
