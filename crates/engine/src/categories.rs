//! The closed set of expense categories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Allowed expense categories. Declaration order is the reporting order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Groceries,
    Leisure,
    Electronics,
    Utilities,
    Clothing,
    Health,
    Others,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Groceries,
        Self::Leisure,
        Self::Electronics,
        Self::Utilities,
        Self::Clothing,
        Self::Health,
        Self::Others,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Groceries => "Groceries",
            Self::Leisure => "Leisure",
            Self::Electronics => "Electronics",
            Self::Utilities => "Utilities",
            Self::Clothing => "Clothing",
            Self::Health => "Health",
            Self::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| {
                let allowed: Vec<_> = Self::ALL.iter().map(|c| c.as_str()).collect();
                EngineError::validation(
                    "category",
                    format!("Invalid category. Allowed: {}", allowed.join(", ")),
                )
            })
    }
}
