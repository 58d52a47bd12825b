//! Configuration for the auth client.

/// Minimum password length accepted by default.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 6;

/// Configuration for authentication behavior.
///
/// There is deliberately little to configure: the only credential check
/// the mock auth flow performs is the password-length policy.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Minimum password length, counted in characters (not bytes).
    /// Passwords shorter than this are rejected with
    /// [`AuthError::InvalidCredentials`](crate::AuthError::InvalidCredentials).
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
        }
    }
}
