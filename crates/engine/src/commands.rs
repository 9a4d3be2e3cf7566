//! Command structs for engine write operations.
//!
//! Category values arrive as raw strings and are validated by the engine, so
//! these types carry exactly what the caller supplied.

use chrono::{DateTime, Utc};

/// Create an expense owned by the caller.
#[derive(Clone, Debug)]
pub struct CreateExpenseCmd {
    pub title: String,
    pub amount: f64,
    pub category: String,
    /// Defaults to the creation instant when absent.
    pub date: Option<DateTime<Utc>>,
}

impl CreateExpenseCmd {
    #[must_use]
    pub fn new(title: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            amount,
            category: category.into(),
            date: None,
        }
    }

    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}

/// Partial update of an expense.
///
/// `None` leaves a field unchanged; an empty category also means unchanged.
/// There is no owner field: ownership never moves.
#[derive(Clone, Debug, Default)]
pub struct UpdateExpenseCmd {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl UpdateExpenseCmd {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }
}
