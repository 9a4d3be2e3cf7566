use chrono::{DateTime, Utc};

use crate::{
    Category, CategoryTotal, CreateExpenseCmd, EngineError, Expense, ExpenseFilter, NewExpense,
    QueryScope, ResultEngine, UpdateExpenseCmd, stats, util::validate_amount,
};

use super::Engine;

impl Engine {
    /// Create an expense owned by `user_id`, which must be a live account.
    pub async fn create_expense(&self, user_id: u64, cmd: CreateExpenseCmd) -> ResultEngine<Expense> {
        self.account(user_id).await?;
        let category = Category::try_from(cmd.category.as_str())?;
        let amount = validate_amount(cmd.amount)?;
        let now = Utc::now();

        self.store
            .create_record(NewExpense {
                user_id,
                title: cmd.title,
                amount,
                category,
                date: cmd.date.unwrap_or(now),
                created_at: now,
            })
            .await
    }

    /// Expenses of `user_id` matching `filter`, newest first.
    pub async fn list_expenses(
        &self,
        user_id: u64,
        filter: &ExpenseFilter,
    ) -> ResultEngine<Vec<Expense>> {
        self.list_expenses_at(user_id, filter, Utc::now()).await
    }

    pub async fn list_expenses_at(
        &self,
        user_id: u64,
        filter: &ExpenseFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<Expense>> {
        let scope = QueryScope::build(user_id, filter, now)?;
        self.store.list_records_by_scope(&scope).await
    }

    /// A single expense. Missing and foreign records are both not found.
    pub async fn expense(&self, user_id: u64, id: i64) -> ResultEngine<Expense> {
        self.store
            .find_record_by_id_and_owner(id, user_id)
            .await?
            .ok_or_else(EngineError::expense_not_found)
    }

    /// Apply the supplied fields of `cmd`. The owner is kept as stored.
    pub async fn update_expense(
        &self,
        user_id: u64,
        id: i64,
        cmd: UpdateExpenseCmd,
    ) -> ResultEngine<Expense> {
        let mut expense = self.expense(user_id, id).await?;

        if let Some(category) = cmd.category.as_deref().filter(|c| !c.is_empty()) {
            expense.category = Category::try_from(category)?;
        }
        if let Some(amount) = cmd.amount {
            expense.amount = validate_amount(amount)?;
        }
        if let Some(title) = cmd.title {
            expense.title = title;
        }
        if let Some(date) = cmd.date {
            expense.date = date;
        }
        expense.updated_at = Utc::now();

        self.store.update_record(&expense).await?;
        Ok(expense)
    }

    pub async fn delete_expense(&self, user_id: u64, id: i64) -> ResultEngine<()> {
        let expense = self.expense(user_id, id).await?;
        self.store.delete_record(&expense).await
    }

    /// Per-category totals over the expenses matching `filter`.
    pub async fn expense_stats(
        &self,
        user_id: u64,
        filter: &ExpenseFilter,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        self.expense_stats_at(user_id, filter, Utc::now()).await
    }

    pub async fn expense_stats_at(
        &self,
        user_id: u64,
        filter: &ExpenseFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        let expenses = self.list_expenses_at(user_id, filter, now).await?;
        Ok(stats::aggregate(&expenses))
    }
}
