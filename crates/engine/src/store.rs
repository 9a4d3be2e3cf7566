//! Persistence seam.
//!
//! The engine talks to storage only through [`Store`]. [`DbStore`] is the
//! sea-orm implementation; tests may inject any other implementation through
//! [`EngineBuilder::store`](crate::EngineBuilder::store).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseConnection, QueryFilter, QueryOrder, SqlErr, prelude::*,
};

use crate::{
    Account, EngineError, Expense, NewAccount, NewExpense, QueryScope, ResultEngine, TimeWindow,
    expenses, users, util,
};

#[async_trait]
pub trait Store: Send + Sync {
    async fn find_account_by_id(&self, id: u64) -> ResultEngine<Option<Account>>;

    async fn find_account_by_handle(&self, handle: &str) -> ResultEngine<Option<Account>>;

    /// Fails with [`EngineError::ExistingKey`] when the handle is taken.
    async fn create_account(&self, account: NewAccount) -> ResultEngine<Account>;

    /// Persist the mutable account fields (premium flag, payment reference).
    async fn update_account(&self, account: &Account) -> ResultEngine<()>;

    async fn create_record(&self, record: NewExpense) -> ResultEngine<Expense>;

    async fn find_record_by_id_and_owner(
        &self,
        id: i64,
        owner_id: u64,
    ) -> ResultEngine<Option<Expense>>;

    /// Persist the mutable fields of `record`. The owner is never written.
    async fn update_record(&self, record: &Expense) -> ResultEngine<()>;

    async fn delete_record(&self, record: &Expense) -> ResultEngine<()>;

    /// Materialize every record in `scope`, newest first.
    async fn list_records_by_scope(&self, scope: &QueryScope) -> ResultEngine<Vec<Expense>>;
}

#[derive(Clone, Debug)]
pub struct DbStore {
    database: DatabaseConnection,
}

impl DbStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

trait ApplyScope: QueryFilter + Sized {
    fn apply_scope(self, scope: &QueryScope) -> ResultEngine<Self>;
}

impl<T> ApplyScope for T
where
    T: QueryFilter + Sized,
{
    fn apply_scope(mut self, scope: &QueryScope) -> ResultEngine<Self> {
        let owner_id = util::account_id_to_db(scope.owner_id())?;
        self = self.filter(expenses::Column::UserId.eq(owner_id));

        match scope.window() {
            TimeWindow::Unbounded => {}
            TimeWindow::Since(from) => {
                self = self.filter(expenses::Column::Date.gte(from));
            }
            TimeWindow::Range { from, to } => {
                self = self
                    .filter(expenses::Column::Date.gte(from))
                    .filter(expenses::Column::Date.lt(to));
            }
        }

        Ok(self)
    }
}

#[async_trait]
impl Store for DbStore {
    async fn find_account_by_id(&self, id: u64) -> ResultEngine<Option<Account>> {
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };
        users::Entity::find_by_id(id)
            .one(&self.database)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_account_by_handle(&self, handle: &str) -> ResultEngine<Option<Account>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(handle))
            .one(&self.database)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn create_account(&self, account: NewAccount) -> ResultEngine<Account> {
        let handle = account.handle.clone();
        let model = users::ActiveModel {
            id: ActiveValue::NotSet,
            username: ActiveValue::Set(account.handle),
            password_hash: ActiveValue::Set(account.password_hash),
            is_premium: ActiveValue::Set(false),
            payment_ref: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(&self.database)
        .await
        .map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => EngineError::ExistingKey(handle),
            _ => EngineError::Database(err),
        })?;

        Account::try_from(model)
    }

    async fn update_account(&self, account: &Account) -> ResultEngine<()> {
        let model = users::ActiveModel {
            id: ActiveValue::Unchanged(util::account_id_to_db(account.id)?),
            is_premium: ActiveValue::Set(account.is_premium),
            payment_ref: ActiveValue::Set(account.payment_ref.clone()),
            ..Default::default()
        };
        model.update(&self.database).await?;
        Ok(())
    }

    async fn create_record(&self, record: NewExpense) -> ResultEngine<Expense> {
        let model = expenses::ActiveModel::try_from(&record)?
            .insert(&self.database)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                    EngineError::Unauthenticated("user not found".to_string())
                }
                _ => EngineError::Database(err),
            })?;
        Expense::try_from(model)
    }

    async fn find_record_by_id_and_owner(
        &self,
        id: i64,
        owner_id: u64,
    ) -> ResultEngine<Option<Expense>> {
        let Ok(owner_id) = i64::try_from(owner_id) else {
            return Ok(None);
        };
        expenses::Entity::find_by_id(id)
            .filter(expenses::Column::UserId.eq(owner_id))
            .one(&self.database)
            .await?
            .map(Expense::try_from)
            .transpose()
    }

    async fn update_record(&self, record: &Expense) -> ResultEngine<()> {
        let model = expenses::ActiveModel::try_from(record)?;
        match model.update(&self.database).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(EngineError::expense_not_found()),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_record(&self, record: &Expense) -> ResultEngine<()> {
        let owner_id = util::account_id_to_db(record.user_id)?;
        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(record.id))
            .filter(expenses::Column::UserId.eq(owner_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::expense_not_found());
        }
        Ok(())
    }

    async fn list_records_by_scope(&self, scope: &QueryScope) -> ResultEngine<Vec<Expense>> {
        expenses::Entity::find()
            .apply_scope(scope)?
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }
}
