//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use sea_orm::DbErr;

use crate::{EngineError, ResultEngine};

/// Account ids are unsigned at the API and signed integers in storage.
pub(crate) fn account_id_to_db(id: u64) -> ResultEngine<i64> {
    i64::try_from(id).map_err(|_| EngineError::validation("user_id", "account id out of range"))
}

pub(crate) fn account_id_from_db(id: i64) -> ResultEngine<u64> {
    u64::try_from(id)
        .map_err(|_| EngineError::Database(DbErr::Custom(format!("invalid stored account id {id}"))))
}

/// Trim a login handle and reject empty ones.
pub(crate) fn normalize_handle(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation(
            "username",
            "username must not be empty",
        ));
    }
    Ok(trimmed.to_string())
}

/// Amounts are finite and non-negative.
pub(crate) fn validate_amount(amount: f64) -> ResultEngine<f64> {
    if !amount.is_finite() {
        return Err(EngineError::validation("amount", "amount must be a number"));
    }
    if amount < 0.0 {
        return Err(EngineError::validation("amount", "amount must be >= 0"));
    }
    Ok(amount)
}
