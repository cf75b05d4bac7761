//! User and login-token models for storage.

use serde::{Deserialize, Serialize};

/// User record, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Email address (unique identity key, also the document ID)
    pub email: String,
    /// When the user first verified (RFC 3339)
    pub created_at: String,
}

/// One-time login token pending verification.
///
/// Single-use: removed from storage on verification or on the first lookup
/// after `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginToken {
    /// Random 256-bit token, hex-encoded (also the document ID)
    pub token: String,
    /// Email the token was issued for
    pub email: String,
    /// Expiry instant (Unix seconds)
    pub expires_at: i64,
}

impl LoginToken {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at < now
    }
}
