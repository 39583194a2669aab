//! Auth error types.

/// Errors that can occur while signing or verifying tokens.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Failed to sign a token.
    #[error("failed to sign token: {reason}")]
    Sign {
        /// Error description.
        reason: String,
    },

    /// Token failed signature, shape, or expiry validation.
    #[error("invalid token: {reason}")]
    Verify {
        /// Error description.
        reason: String,
    },

    /// Token is valid but of the wrong kind for the operation, e.g. a
    /// refresh token presented as a bearer credential.
    #[error("expected {expected} token, got {actual}")]
    WrongKind {
        /// Kind the operation requires.
        expected: &'static str,
        /// Kind the token carried.
        actual: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
