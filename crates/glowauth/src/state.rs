//! The session state machine.

use std::fmt;

use glowauth_session::Session;

/// The current authentication state of the client.
///
/// This is a state machine with three states:
///
/// ```text
///              ┌──(stored record found)──→ SignedIn ──┐
///   Unknown ───┤                               ↑      │ sign_out
///              └──(nothing stored)──→ SignedOut│      │
///                                        │     │      │
///                                        └─sign_in/───┘
///                                           sign_up
/// ```
///
/// - **Unknown**: the initial state, before the one-shot load from the
///   persistent store has completed. Observers subscribed this early
///   see a state whose [`session()`](AuthState::session) is absent.
/// - **SignedOut**: no principal. Reached from `Unknown` when the store
///   held nothing, or from `SignedIn` by signing out.
/// - **SignedIn**: exactly one live [`Session`]. Re-authenticating
///   while signed in replaces the session with the freshly fabricated
///   one.
///
/// `Unknown` is left exactly once per process, by the completion of the
/// initial load; no transition ever leads back into it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Initial load hasn't completed yet.
    #[default]
    Unknown,

    /// No signed-in principal.
    SignedOut,

    /// A principal is signed in.
    SignedIn(Session),
}

impl AuthState {
    /// The current session, if one is signed in.
    ///
    /// `Unknown` and `SignedOut` both answer `None` — callers that only
    /// care about "who, if anyone" don't need to distinguish them.
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::Unknown | Self::SignedOut => None,
        }
    }

    /// Returns `true` if a principal is signed in.
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    /// Returns `true` once the initial load has completed — i.e. the
    /// state is anything other than `Unknown`.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::SignedOut => write!(f, "SignedOut"),
            Self::SignedIn(session) => write!(f, "SignedIn({})", session.uid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(AuthState::default(), AuthState::Unknown);
    }

    #[test]
    fn test_session_absent_unless_signed_in() {
        assert!(AuthState::Unknown.session().is_none());
        assert!(AuthState::SignedOut.session().is_none());

        let session = Session::for_email("a@x.com");
        let state = AuthState::SignedIn(session.clone());
        assert_eq!(state.session(), Some(&session));
    }

    #[test]
    fn test_is_signed_in() {
        assert!(!AuthState::Unknown.is_signed_in());
        assert!(!AuthState::SignedOut.is_signed_in());
        assert!(AuthState::SignedIn(Session::for_email("a@x.com")).is_signed_in());
    }

    #[test]
    fn test_is_resolved_false_only_for_unknown() {
        assert!(!AuthState::Unknown.is_resolved());
        assert!(AuthState::SignedOut.is_resolved());
        assert!(AuthState::SignedIn(Session::for_email("a@x.com")).is_resolved());
    }

    #[test]
    fn test_display() {
        assert_eq!(AuthState::Unknown.to_string(), "Unknown");
        assert_eq!(AuthState::SignedOut.to_string(), "SignedOut");

        let mut session = Session::for_email("a@x.com");
        session.uid = "user_abc".into();
        assert_eq!(
            AuthState::SignedIn(session).to_string(),
            "SignedIn(user_abc)"
        );
    }
}
