//! Query scoping for expense reads.
//!
//! A [`QueryScope`] is always bound to exactly one owner and optionally
//! narrowed by a [`TimeWindow`]. Building a scope performs no I/O: the store
//! translates it into a query, and [`QueryScope::contains`] evaluates it in
//! memory.

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::{EngineError, Expense, ResultEngine};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Named filter requested by the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterSelector {
    #[default]
    None,
    Week,
    Month,
    Quarter,
    Custom,
}

impl FilterSelector {
    /// Unrecognized or absent values select everything.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("week") => Self::Week,
            Some("month") => Self::Month,
            Some("quarter" | "3months") => Self::Quarter,
            Some("custom") => Self::Custom,
            _ => Self::None,
        }
    }

    /// Length of the rolling window in calendar days.
    pub fn rolling_days(self) -> Option<u64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Quarter => Some(90),
            Self::None | Self::Custom => None,
        }
    }
}

/// Filter input as received from the caller (query string values).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub selector: FilterSelector,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ExpenseFilter {
    pub fn new(filter: Option<&str>, start_date: Option<&str>, end_date: Option<&str>) -> Self {
        Self {
            selector: FilterSelector::parse(filter),
            start_date: non_empty(start_date),
            end_date: non_empty(end_date),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn rolling(selector: FilterSelector) -> Self {
        Self {
            selector,
            ..Self::default()
        }
    }

    pub fn custom(start_date: &str, end_date: &str) -> Self {
        Self::new(Some("custom"), Some(start_date), Some(end_date))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Time predicate over `Expense::date`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeWindow {
    Unbounded,
    /// `date >= from`.
    Since(DateTime<Utc>),
    /// `from <= date < to`.
    Range {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

impl TimeWindow {
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        match *self {
            Self::Unbounded => true,
            Self::Since(from) => date >= from,
            Self::Range { from, to } => date >= from && date < to,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryScope {
    owner_id: u64,
    window: TimeWindow,
}

impl QueryScope {
    /// Resolve `filter` for `owner_id` relative to `now`.
    ///
    /// Rolling windows subtract calendar days from `now` and include the
    /// boundary. A custom range covers whole days, both ends included. A
    /// custom filter missing either date selects everything.
    pub fn build(owner_id: u64, filter: &ExpenseFilter, now: DateTime<Utc>) -> ResultEngine<Self> {
        let window = match filter.selector {
            FilterSelector::None => TimeWindow::Unbounded,
            FilterSelector::Week | FilterSelector::Month | FilterSelector::Quarter => {
                let days = filter.selector.rolling_days().unwrap_or_default();
                let from = now
                    .checked_sub_days(Days::new(days))
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                TimeWindow::Since(from)
            }
            FilterSelector::Custom => match (&filter.start_date, &filter.end_date) {
                (Some(start), Some(end)) => custom_range(start, end)?,
                _ => {
                    tracing::debug!(
                        owner_id,
                        "custom filter without both dates, ignoring the range"
                    );
                    TimeWindow::Unbounded
                }
            },
        };

        Ok(Self { owner_id, window })
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn contains(&self, expense: &Expense) -> bool {
        expense.user_id == self.owner_id && self.window.contains(expense.date)
    }
}

fn parse_date(value: &str, field: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| EngineError::validation(field, "expected a date in YYYY-MM-DD format"))
}

fn custom_range(start: &str, end: &str) -> ResultEngine<TimeWindow> {
    let start = parse_date(start, "start_date")?;
    let end = parse_date(end, "end_date")?;
    if start > end {
        return Err(EngineError::validation(
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    let after_end = end
        .succ_opt()
        .ok_or_else(|| EngineError::validation("end_date", "end_date out of range"))?;

    Ok(TimeWindow::Range {
        from: start.and_time(chrono::NaiveTime::MIN).and_utc(),
        to: after_end.and_time(chrono::NaiveTime::MIN).and_utc(),
    })
}
