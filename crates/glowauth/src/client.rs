//! The auth client: owner of session state and sole driver of the
//! sign-in/sign-up/sign-out transitions.
//!
//! This is the central piece of the auth core. It's responsible for:
//! - Restoring the persisted session once at startup
//! - Fabricating a session on sign-in/sign-up (after the policy check)
//! - Clearing everything on sign-out
//! - Keeping the persistent store in sync with the in-memory state
//! - Fanning out every transition to subscribed observers
//!
//! # Concurrency note
//!
//! All state-changing operations run under a single async operation
//! guard, so no two transitions ever interleave at the data level. The
//! in-memory state is swapped atomically *before* the durable write
//! begins; synchronous readers ([`current_session`](AuthClient::current_session),
//! [`state`](AuthClient::state)) therefore see either the pre- or the
//! post-transition value, never a torn one, even while the write is
//! still in flight. The in-memory value — not the store — is
//! authoritative for the life of the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use glowauth_session::Session;
use glowauth_store::SessionStore;

use crate::watch::{self, Subscription, WatchFn, WatcherRegistry};
use crate::{AuthConfig, AuthError, AuthState};

/// Client-side session manager.
///
/// One `AuthClient` per process, constructed at startup and handed to
/// the UI root as an explicit dependency — its owner decides the
/// lifecycle, there is no hidden global instance.
///
/// ## Lifecycle
///
/// ```text
/// AuthClient::new() ──→ restore() ──→ sign_in()/sign_up() ──→ sign_out()
///        │                  │                 │                   │
///        ▼                  ▼                 ▼                   ▼
///    [Unknown]    [SignedOut|SignedIn]    [SignedIn]         [SignedOut]
/// ```
pub struct AuthClient<S> {
    /// The persistent store. Exclusively owned; nothing else reads or
    /// writes it.
    store: S,

    /// Credential policy.
    config: AuthConfig,

    /// Current session state. Guarded by a sync mutex so reads never
    /// await; the lock is only ever held for a clone or an assignment.
    state: Mutex<AuthState>,

    /// Registered observers. Shared with [`Subscription`] handles
    /// through a weak reference so unsubscribing outlives nothing.
    watchers: Arc<Mutex<WatcherRegistry>>,

    /// Serializes restore/sign-in/sign-up/sign-out end to end. Held
    /// across the durable write so transitions can't interleave.
    op: tokio::sync::Mutex<()>,

    /// Set once the state has left `Unknown` — whether by the one-shot
    /// restore or by an explicit transition racing ahead of it.
    resolved: AtomicBool,

    /// Raised when the most recent durable write failed. The running
    /// process keeps behaving correctly off the in-memory state; a
    /// future cold start would see stale storage.
    sync_degraded: AtomicBool,
}

impl<S: SessionStore> AuthClient<S> {
    /// Creates a client in the `Unknown` state with the default
    /// credential policy. Call [`restore`](AuthClient::restore) to
    /// resolve the initial state from the store.
    pub fn new(store: S) -> Self {
        Self::with_config(store, AuthConfig::default())
    }

    /// Creates a client with an explicit [`AuthConfig`].
    pub fn with_config(store: S, config: AuthConfig) -> Self {
        Self {
            store,
            config,
            state: Mutex::new(AuthState::Unknown),
            watchers: Arc::new(Mutex::new(WatcherRegistry::new())),
            op: tokio::sync::Mutex::new(()),
            resolved: AtomicBool::new(false),
            sync_degraded: AtomicBool::new(false),
        }
    }

    // ---------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------

    /// Resolves the initial state from the persistent store: `SignedIn`
    /// when a valid record was found, `SignedOut` otherwise.
    ///
    /// This transition happens at most once per process. Calling
    /// `restore` again — or after a sign-in/sign-out already resolved
    /// the state — is a logged no-op returning the current state, so a
    /// slow startup load can never clobber a session the user created
    /// in the meantime.
    pub async fn restore(&self) -> AuthState {
        let _op = self.op.lock().await;

        if self.resolved.load(Ordering::Acquire) {
            tracing::debug!("restore after state already resolved, ignoring");
            return self.state();
        }

        // A missing, unreadable, or corrupt record all come back as
        // `None` — the store never raises on load.
        let next = match self.store.load().await {
            Some(session) => AuthState::SignedIn(session),
            None => AuthState::SignedOut,
        };

        self.commit(next.clone());
        watch::broadcast(&self.watchers, &next);
        tracing::info!(state = %next, "session restored from storage");
        next
    }

    /// Signs in with the given email and password.
    ///
    /// The password-length policy is the only validation performed:
    /// there is no account registry, so any email "succeeds" and a
    /// fresh principal identity is fabricated for it. Signing in while
    /// already signed in replaces the current session with the new one.
    ///
    /// On success the session is set as current, durably persisted
    /// (awaited), broadcast to observers, and returned.
    ///
    /// # Errors
    /// [`AuthError::InvalidCredentials`] when the password is shorter
    /// than the policy minimum. The current state is left untouched.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.authenticate(email, password).await
    }

    /// Registers a new account with the given email and password.
    ///
    /// Behaviorally identical to [`sign_in`](AuthClient::sign_in):
    /// with no account registry there is nothing to make registration
    /// distinct, and the two entry points differ only by UI intent.
    ///
    /// # Errors
    /// [`AuthError::InvalidCredentials`] when the password is shorter
    /// than the policy minimum. The current state is left untouched.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        self.authenticate(email, password).await
    }

    /// Signs out: clears the current session, durably deletes the
    /// persisted record (awaited), and broadcasts the change.
    ///
    /// Never fails. Signing out while already signed out is permitted
    /// and still broadcasts, matching the "every transition is
    /// delivered" contract.
    pub async fn sign_out(&self) {
        let _op = self.op.lock().await;

        self.commit(AuthState::SignedOut);
        self.persist(None).await;
        watch::broadcast(&self.watchers, &AuthState::SignedOut);
        tracing::info!("signed out");
    }

    /// The shared sign-in/sign-up transition.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let _op = self.op.lock().await;

        // Counted in characters: a 6-character password is valid even
        // when its UTF-8 encoding is longer than 6 bytes.
        let min = self.config.min_password_len;
        if password.chars().count() < min {
            return Err(AuthError::InvalidCredentials(format!(
                "password must be at least {min} characters"
            )));
        }

        let session = Session::for_email(email);
        let next = AuthState::SignedIn(session.clone());

        self.commit(next.clone());
        self.persist(Some(&session)).await;
        watch::broadcast(&self.watchers, &next);
        tracing::info!(uid = %session.uid, "signed in");
        Ok(session)
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// The current session, if a principal is signed in. Synchronous —
    /// never blocks on I/O, never fails.
    pub fn current_session(&self) -> Option<Session> {
        self.lock_state().session().cloned()
    }

    /// A snapshot of the full [`AuthState`], including the pre-restore
    /// `Unknown` state. Synchronous.
    pub fn state(&self) -> AuthState {
        self.lock_state().clone()
    }

    /// Whether the most recent durable write failed. The in-memory
    /// session is still authoritative while the process lives; this
    /// flag only warns that a future cold start may see stale state.
    /// Cleared by the next successful write.
    pub fn sync_degraded(&self) -> bool {
        self.sync_degraded.load(Ordering::Acquire)
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        watch::lock(&self.watchers).len()
    }

    // ---------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------

    /// Registers an observer for session state changes.
    ///
    /// The observer is synchronously invoked exactly once with the
    /// current state before this call returns — even when that state
    /// is still `Unknown` (its `session()` is simply absent). After
    /// that it receives every transition, in registration order
    /// relative to other observers, with no coalescing.
    ///
    /// The returned [`Subscription`] removes the observer when
    /// [`unsubscribe`](Subscription::unsubscribe) is called; calling it
    /// repeatedly is a no-op.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        let observer: Arc<WatchFn> = Arc::new(observer);
        let id = watch::lock(&self.watchers).register(Arc::clone(&observer));

        // Initial replay: outside the registry lock, same panic
        // isolation as a broadcast pass.
        let snapshot = self.state();
        watch::deliver(id, observer.as_ref(), &snapshot);

        Subscription::new(id, Arc::downgrade(&self.watchers))
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn lock_state(&self) -> std::sync::MutexGuard<'_, AuthState> {
        // The state lock is never held across user code or awaits, so
        // a poisoned lock still guards a consistent value.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically installs the post-transition state. Any committed
    /// state is by definition resolved.
    fn commit(&self, next: AuthState) {
        *self.lock_state() = next;
        self.resolved.store(true, Ordering::Release);
    }

    /// Writes (or clears) the durable record, absorbing failure: the
    /// transition has already committed in memory, so a failed write
    /// degrades durability, not correctness.
    async fn persist(&self, session: Option<&Session>) {
        match self.store.save(session).await {
            Ok(()) => {
                self.sync_degraded.store(false, Ordering::Release);
            }
            Err(e) => {
                self.sync_degraded.store(true, Ordering::Release);
                tracing::warn!(
                    error = %e,
                    "failed to persist session, in-memory state remains authoritative"
                );
            }
        }
    }
}
