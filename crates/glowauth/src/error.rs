//! Error types for the auth client.

/// Errors surfaced by the auth client's fallible operations.
///
/// Only `sign_in` and `sign_up` can fail, and only one way: the
/// credential policy rejected the password. Storage failures never
/// appear here — a failed read is recovered as "no session", and a
/// failed write is logged while the in-memory state stays
/// authoritative (see [`AuthClient::sync_degraded`](crate::AuthClient::sync_degraded)).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The supplied credentials failed the policy check. The message is
    /// suitable for showing to the user as-is.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),
}
