//! Per-category totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Category, Expense};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Sum amounts per category.
///
/// Only categories that occur in `expenses` are returned, each once, in
/// category declaration order.
pub fn aggregate<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Vec<CategoryTotal> {
    expenses
        .into_iter()
        .fold(BTreeMap::<Category, f64>::new(), |mut acc, expense| {
            *acc.entry(expense.category).or_default() += expense.amount;
            acc
        })
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect()
}
