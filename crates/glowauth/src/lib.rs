//! # GlowAuth
//!
//! Client-side session state management for the GlowUp app.
//!
//! The UI layer consumes a tiny surface: the current session, a
//! subscribe/unsubscribe pair, and the sign-in/sign-up/sign-out
//! transitions. Everything behind that surface — the one-shot restore
//! from device storage, the credential policy, keeping the durable
//! record in sync, and fanning changes out to observers — lives here.
//!
//! # How it fits in the stack
//!
//! ```text
//! UI layer (out of scope)  ← subscribes, redirects on auth transitions
//!     ↕
//! Auth client (this crate)  ← owns session state and its transitions
//!     ↕
//! Store layer (glowauth-store)  ← one durable JSON record
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glowauth::prelude::*;
//!
//! # async fn run() -> Result<(), glowauth::AuthError> {
//! let store = MemorySessionStore::new();
//! let auth = AuthClient::new(store);
//!
//! let _sub = auth.subscribe(|state| {
//!     println!("session state: {state}");
//! });
//!
//! auth.restore().await;
//! let session = auth.sign_in("a@x.com", "secret1").await?;
//! assert_eq!(auth.current_session(), Some(session));
//! auth.sign_out().await;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod state;
mod watch;

pub use client::AuthClient;
pub use config::{AuthConfig, DEFAULT_MIN_PASSWORD_LEN};
pub use error::AuthError;
pub use state::AuthState;
pub use watch::Subscription;

// Re-export the lower layers so most consumers need only this crate.
pub use glowauth_session::Session;
pub use glowauth_store::{
    FileSessionStore, MemorySessionStore, STORAGE_KEY, SessionStore, StoreError,
};

/// Everything a typical consumer needs, importable in one line.
pub mod prelude {
    pub use crate::{
        AuthClient, AuthConfig, AuthError, AuthState, FileSessionStore,
        MemorySessionStore, Session, SessionStore, Subscription,
    };
}
