//! Integration tests for the sign-in/sign-up/sign-out lifecycle and its
//! interaction with the persistent store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glowauth::StoreError;
use glowauth::prelude::*;

// =========================================================================
// Test stores
// =========================================================================

/// A store whose writes fail while the shared toggle is set. Loads
/// always find nothing.
#[derive(Default)]
struct FlakyStore {
    fail_writes: Arc<AtomicBool>,
}

impl FlakyStore {
    /// A store that starts out failing, plus the toggle to heal it.
    fn failing() -> (Self, Arc<AtomicBool>) {
        let toggle = Arc::new(AtomicBool::new(true));
        (
            Self {
                fail_writes: Arc::clone(&toggle),
            },
            toggle,
        )
    }
}

impl SessionStore for FlakyStore {
    async fn load(&self) -> Option<Session> {
        None
    }

    async fn save(&self, _session: Option<&Session>) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        } else {
            Ok(())
        }
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn client() -> AuthClient<MemorySessionStore> {
    AuthClient::new(MemorySessionStore::new())
}

async fn restored_client() -> AuthClient<MemorySessionStore> {
    let auth = client();
    auth.restore().await;
    auth
}

// =========================================================================
// Initial state and restore()
// =========================================================================

#[tokio::test]
async fn test_state_before_restore_is_unknown() {
    let auth = client();

    assert_eq!(auth.state(), AuthState::Unknown);
    assert_eq!(auth.current_session(), None);
}

#[tokio::test]
async fn test_restore_empty_store_resolves_signed_out() {
    let auth = client();

    let state = auth.restore().await;

    assert_eq!(state, AuthState::SignedOut);
    assert_eq!(auth.current_session(), None);
}

#[tokio::test]
async fn test_restore_seeded_store_resolves_signed_in() {
    let session = Session::for_email("a@x.com");
    let auth = AuthClient::new(MemorySessionStore::seeded(session.clone()));

    let state = auth.restore().await;

    assert_eq!(state, AuthState::SignedIn(session.clone()));
    assert_eq!(auth.current_session(), Some(session));
}

#[tokio::test]
async fn test_restore_is_one_shot() {
    let auth = restored_client().await;
    auth.sign_in("a@x.com", "secret1").await.unwrap();

    // A second restore must not reset the live session from storage.
    let state = auth.restore().await;

    assert!(state.is_signed_in());
    assert_eq!(state, auth.state());
}

#[tokio::test]
async fn test_restore_after_sign_in_does_not_clobber_live_session() {
    // The app authenticated before the startup load got a chance to
    // run — the stale stored record must lose.
    let stale = Session::for_email("old@x.com");
    let auth = AuthClient::new(MemorySessionStore::seeded(stale));

    let live = auth.sign_in("new@x.com", "secret1").await.unwrap();
    let state = auth.restore().await;

    assert_eq!(state, AuthState::SignedIn(live.clone()));
    assert_eq!(auth.current_session(), Some(live));
}

// =========================================================================
// sign_in() / sign_up()
// =========================================================================

#[tokio::test]
async fn test_sign_in_returns_session_bound_to_email() {
    let auth = restored_client().await;

    let session = auth.sign_in("a@x.com", "secret1").await.unwrap();

    assert_eq!(session.email.as_deref(), Some("a@x.com"));
    assert_eq!(session.display_name.as_deref(), Some("a"));
    assert!(session.uid.starts_with("user_"));
}

#[tokio::test]
async fn test_sign_in_sets_current_session() {
    let auth = restored_client().await;

    let session = auth.sign_in("a@x.com", "secret1").await.unwrap();

    assert_eq!(auth.current_session(), Some(session.clone()));
    assert_eq!(auth.state(), AuthState::SignedIn(session));
}

#[tokio::test]
async fn test_sign_in_short_password_fails_and_leaves_state_unchanged() {
    let auth = restored_client().await;

    let result = auth.sign_in("b@x.com", "12345").await;

    assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    assert_eq!(auth.current_session(), None);
    assert_eq!(auth.state(), AuthState::SignedOut);
}

#[tokio::test]
async fn test_sign_in_six_char_password_passes_policy() {
    let auth = restored_client().await;

    // Exactly at the boundary.
    auth.sign_in("a@x.com", "123456").await.unwrap();

    assert!(auth.state().is_signed_in());
}

#[tokio::test]
async fn test_password_length_counted_in_characters_not_bytes() {
    let auth = restored_client().await;

    // Six characters, twelve UTF-8 bytes.
    auth.sign_in("a@x.com", "éééééé").await.unwrap();

    assert!(auth.state().is_signed_in());
}

#[tokio::test]
async fn test_sign_up_behaves_like_sign_in() {
    let auth = restored_client().await;

    let result = auth.sign_up("b@x.com", "12345").await;
    assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));

    let session = auth.sign_up("b@x.com", "secret1").await.unwrap();
    assert_eq!(session.email.as_deref(), Some("b@x.com"));
    assert_eq!(session.display_name.as_deref(), Some("b"));
    assert_eq!(auth.current_session(), Some(session));
}

#[tokio::test]
async fn test_sign_in_while_signed_in_replaces_session() {
    let auth = restored_client().await;

    let first = auth.sign_in("a@x.com", "secret1").await.unwrap();
    let second = auth.sign_in("b@y.org", "secret2").await.unwrap();

    assert_ne!(first.uid, second.uid);
    assert_eq!(auth.current_session(), Some(second));
}

#[tokio::test]
async fn test_sign_in_persists_record_before_returning() {
    let store = Arc::new(MemorySessionStore::new());
    let auth = AuthClient::new(Arc::clone(&store));
    auth.restore().await;

    let session = auth.sign_in("a@x.com", "secret1").await.unwrap();

    // The durable write completed before sign_in returned.
    assert_eq!(store.load().await, Some(session));
}

#[tokio::test]
async fn test_sign_out_deletes_record_before_returning() {
    let store = Arc::new(MemorySessionStore::new());
    let auth = AuthClient::new(Arc::clone(&store));
    auth.restore().await;
    auth.sign_in("a@x.com", "secret1").await.unwrap();

    auth.sign_out().await;

    assert_eq!(store.load().await, None);
}

// =========================================================================
// sign_out()
// =========================================================================

#[tokio::test]
async fn test_sign_out_clears_session() {
    let auth = restored_client().await;
    auth.sign_in("a@x.com", "secret1").await.unwrap();

    auth.sign_out().await;

    assert_eq!(auth.current_session(), None);
    assert_eq!(auth.state(), AuthState::SignedOut);
}

#[tokio::test]
async fn test_sign_out_while_signed_out_is_harmless() {
    let auth = restored_client().await;

    auth.sign_out().await;
    auth.sign_out().await;

    assert_eq!(auth.state(), AuthState::SignedOut);
}

// =========================================================================
// Full scenarios across a cold start (file-backed store)
// =========================================================================

#[tokio::test]
async fn test_scenario_empty_storage_sign_in_sign_out() {
    // Empty storage → absent → sign_in succeeds with derived display
    // name → current matches → sign_out → absent → reload absent.
    let dir = tempfile::tempdir().unwrap();

    let auth = AuthClient::new(FileSessionStore::at(dir.path()));
    auth.restore().await;
    assert_eq!(auth.current_session(), None);

    let session = auth.sign_in("a@x.com", "secret1").await.unwrap();
    assert_eq!(session.email.as_deref(), Some("a@x.com"));
    assert_eq!(session.display_name.as_deref(), Some("a"));
    assert_eq!(auth.current_session(), Some(session));

    auth.sign_out().await;
    assert_eq!(auth.current_session(), None);

    // A fresh client over the same storage sees no session either.
    let relaunched = AuthClient::new(FileSessionStore::at(dir.path()));
    assert_eq!(relaunched.restore().await, AuthState::SignedOut);
}

#[tokio::test]
async fn test_cold_start_restores_persisted_session() {
    let dir = tempfile::tempdir().unwrap();

    let auth = AuthClient::new(FileSessionStore::at(dir.path()));
    auth.restore().await;
    let session = auth.sign_in("a@x.com", "secret1").await.unwrap();
    drop(auth);

    let relaunched = AuthClient::new(FileSessionStore::at(dir.path()));
    let state = relaunched.restore().await;

    assert_eq!(state, AuthState::SignedIn(session));
}

#[tokio::test]
async fn test_corrupt_stored_record_restores_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("user.json"), b"{ definitely not json").unwrap();

    let auth = AuthClient::new(FileSessionStore::at(dir.path()));

    assert_eq!(auth.restore().await, AuthState::SignedOut);
}

// =========================================================================
// Persistence failure policy
// =========================================================================

#[tokio::test]
async fn test_write_failure_keeps_in_memory_state_authoritative() {
    let (store, _toggle) = FlakyStore::failing();
    let auth = AuthClient::new(store);
    auth.restore().await;

    let session = auth.sign_in("a@x.com", "secret1").await.unwrap();

    // The operation succeeded and the running process is signed in,
    // even though durability was not achieved.
    assert_eq!(auth.current_session(), Some(session));
    assert!(auth.sync_degraded());
}

#[tokio::test]
async fn test_successful_write_clears_degraded_flag() {
    let (store, toggle) = FlakyStore::failing();
    let auth = AuthClient::new(store);
    auth.restore().await;

    auth.sign_in("a@x.com", "secret1").await.unwrap();
    assert!(auth.sync_degraded());

    // Storage recovers; the next transition writes cleanly.
    toggle.store(false, Ordering::SeqCst);
    auth.sign_out().await;

    assert!(!auth.sync_degraded());
}

#[tokio::test]
async fn test_sign_out_never_fails_even_when_delete_fails() {
    let (store, _toggle) = FlakyStore::failing();
    let auth = AuthClient::new(store);
    auth.restore().await;
    auth.sign_in("a@x.com", "secret1").await.unwrap();

    auth.sign_out().await;

    assert_eq!(auth.current_session(), None);
    assert!(auth.sync_degraded());
}
