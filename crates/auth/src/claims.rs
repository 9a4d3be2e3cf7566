use serde::{Deserialize, Serialize};

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account identifier of the caller.
    pub user_id: u64,
    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
    /// Issued at timestamp (Unix seconds).
    pub iat: i64,
}

impl Claims {
    /// A token is expired once the verification instant reaches `exp`.
    pub fn is_expired_at(&self, now_ts: i64) -> bool {
        self.exp <= now_ts
    }
}
