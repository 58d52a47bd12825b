//! Session entity for GlowAuth.
//!
//! A "session" is the client's record of the signed-in principal:
//!
//! - WHO they are (`uid`, an opaque stable identifier)
//! - HOW they identified themselves (`email`, declared but never verified)
//! - WHAT to call them (`display_name`, derived from the email when not
//!   supplied explicitly)
//!
//! This crate also pins the exact JSON shape the session is persisted in,
//! so the record written by one app version can be read back by the next.
//!
//! # How it fits in the stack
//!
//! ```text
//! Auth client (above)  ← owns the one live Session and its lifecycle
//!     ↕
//! Session layer (this crate)  ← identity fabrication and record shape
//!     ↕
//! Store layer (below)  ← serializes the record to device storage
//! ```

mod session;

pub use session::Session;
