use crate::{AuthError, Result};

/// Split an `Authorization` header value into its token part.
///
/// The value must be exactly `"<scheme> <token>"`: one single space and two
/// non-empty parts.
pub fn parse_authorization(value: Option<&str>) -> Result<&str> {
    let value = match value {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::MissingHeader),
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if !scheme.is_empty() && !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
