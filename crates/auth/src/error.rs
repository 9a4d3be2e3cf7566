use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authorization header missing")]
    MissingHeader,

    #[error("Invalid token format")]
    MalformedHeader,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {source}")]
    InvalidToken {
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("Token encoding failed: {source}")]
    Encode {
        #[source]
        source: jsonwebtoken::errors::Error,
    },

    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Token lifetime out of range")]
    TtlOutOfRange,
}

impl AuthError {
    /// Stable code for logs; every variant maps to the same external status.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "MISSING_AUTH_HEADER",
            Self::MalformedHeader => "MALFORMED_AUTH_HEADER",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::Encode { .. } => "TOKEN_ENCODE_FAILED",
            Self::EmptySecret => "EMPTY_SECRET",
            Self::TtlOutOfRange => "TTL_OUT_OF_RANGE",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
