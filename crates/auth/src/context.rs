use crate::Claims;

/// Verified identity of the caller, attached to the request after the
/// credential check. Only the account id is trusted downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: u64,
}

impl RequestContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
        }
    }
}
