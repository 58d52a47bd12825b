//! The [`Session`] type: the sole durable entity in the auth core.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The record representing a signed-in principal.
///
/// At most one `Session` is live at any time — there is no concept of
/// multiple concurrent principals. A session is created by a successful
/// sign-in or sign-up, held unchanged while signed in, and destroyed by
/// sign-out. There is no update-in-place.
///
/// # Persisted shape
///
/// The session is stored as JSON under camelCase keys:
///
/// ```json
/// { "uid": "user_3f…", "email": "a@x.com", "displayName": "a" }
/// ```
///
/// `uid` is required. `email` may be null. `displayName` is omitted
/// entirely when absent. A stored record that doesn't match this shape
/// is treated as "no session" by the store layer, never as a fatal error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque stable identifier, unique per signed-in principal.
    ///
    /// Format: `user_` followed by 32 lowercase hex characters (128 bits
    /// of randomness). Generated once at creation time; never changes
    /// for the life of the session.
    pub uid: String,

    /// The principal's declared email address. Never validated against
    /// a real mail system.
    pub email: Option<String>,

    /// Optional human-readable label. When not supplied, derived from
    /// the email local part (the text before the first `@`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Session {
    /// Fabricates a new principal identity for the given email.
    ///
    /// Every successful sign-in and sign-up goes through here: there is
    /// no registry of accounts, so each authentication mints a fresh
    /// `uid` and binds it to the declared address. The display name is
    /// derived from the email local part.
    pub fn for_email(email: &str) -> Self {
        Self {
            uid: new_uid(),
            email: Some(email.to_string()),
            display_name: Some(local_part(email).to_string()),
        }
    }

    /// Same as [`Session::for_email`], but with an explicitly supplied
    /// display name instead of the derived one.
    pub fn with_display_name(email: &str, display_name: &str) -> Self {
        Self {
            uid: new_uid(),
            email: Some(email.to_string()),
            display_name: Some(display_name.to_string()),
        }
    }

    /// Returns the best available human-readable label: the display
    /// name if set, otherwise the email, otherwise the uid.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.uid)
    }
}

/// Generates a fresh session identifier: `user_` + 32 hex chars
/// (128 bits of entropy). Collisions are computationally implausible,
/// which is all the uniqueness guarantee this identifier needs.
fn new_uid() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    format!("user_{hex}")
}

/// The text before the first `@`, or the whole string when there is no
/// `@` at all. `split('@')` always yields at least one element, so the
/// `expect` can't fire.
fn local_part(email: &str) -> &str {
    email.split('@').next().expect("split yields at least one part")
}

// =========================================================================
// Tests
// =========================================================================
