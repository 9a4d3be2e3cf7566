use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};

use crate::{AuthError, Claims, RequestContext, Result};

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// HS256 token issuer and verifier bound to the service signing secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create the service with HS256 (symmetric secret).
    pub fn with_hs256(secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }

        // Expiry is checked against an explicit instant in `verify_at`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `user_id` valid from now for the configured ttl.
    pub fn issue(&self, user_id: u64) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: u64, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            user_id,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.ttl)
                .ok_or(AuthError::TtlOutOfRange)?
                .timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|source| AuthError::Encode { source })
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|source| AuthError::InvalidToken { source })?;

        if data.claims.is_expired_at(now.timestamp()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }

    /// Full header check: shape, signature, expiry. Yields the identity
    /// context for the rest of the request.
    pub fn authenticate(&self, header: Option<&str>) -> Result<RequestContext> {
        let token = crate::parse_authorization(header)?;
        let claims = self.verify(token)?;
        tracing::trace!(user_id = claims.user_id, "credential verified");
        Ok(RequestContext::from_claims(claims))
    }
}
