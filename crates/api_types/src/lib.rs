use serde::{Deserialize, Serialize};

/// Success envelope: every JSON response body is `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: u64,
        pub username: String,
        pub is_premium: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenResponse {
        pub token: String,
        /// Seconds until the token expires.
        pub expires_in: i64,
    }
}

pub mod expense {
    use chrono::{DateTime, FixedOffset};

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        #[serde(default)]
        pub title: String,
        pub amount: f64,
        pub category: String,
        /// Defaults to the creation time.
        pub date: Option<DateTime<FixedOffset>>,
    }

    /// Partial update. Absent fields and an empty `category` are left
    /// unchanged. Unknown fields (an owner id, for instance) are ignored.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub title: Option<String>,
        pub amount: Option<f64>,
        pub category: Option<String>,
        pub date: Option<DateTime<FixedOffset>>,
    }

    /// Query string of list, stats and export requests.
    ///
    /// `filter` is one of `week`, `month`, `quarter` (or `3months`), `custom`;
    /// anything else selects every expense. `custom` reads `start_date` and
    /// `end_date` as `YYYY-MM-DD`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseQuery {
        pub filter: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i64,
        pub user_id: u64,
        pub title: String,
        pub amount: f64,
        pub category: String,
        pub date: DateTime<FixedOffset>,
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoryStat {
        pub category: String,
        pub total: f64,
    }
}
