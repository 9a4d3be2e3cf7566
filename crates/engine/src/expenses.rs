//! Expense records.
//!
//! An `Expense` is one spending event owned by exactly one account.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Category, EngineError, util};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: u64,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated expense ready to be stored; the store assigns the id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub user_id: u64,
    pub title: String,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub category: String,
    pub date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&NewExpense> for ActiveModel {
    type Error = EngineError;

    fn try_from(expense: &NewExpense) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(util::account_id_to_db(expense.user_id)?),
            title: ActiveValue::Set(expense.title.clone()),
            amount: ActiveValue::Set(expense.amount),
            category: ActiveValue::Set(expense.category.to_string()),
            date: ActiveValue::Set(expense.date),
            created_at: ActiveValue::Set(expense.created_at),
            updated_at: ActiveValue::Set(expense.created_at),
        })
    }
}

impl TryFrom<&Expense> for ActiveModel {
    type Error = EngineError;

    fn try_from(expense: &Expense) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ActiveValue::Unchanged(expense.id),
            user_id: ActiveValue::Unchanged(util::account_id_to_db(expense.user_id)?),
            title: ActiveValue::Set(expense.title.clone()),
            amount: ActiveValue::Set(expense.amount),
            category: ActiveValue::Set(expense.category.to_string()),
            date: ActiveValue::Set(expense.date),
            created_at: ActiveValue::Unchanged(expense.created_at),
            updated_at: ActiveValue::Set(expense.updated_at),
        })
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: util::account_id_from_db(model.user_id)?,
            title: model.title,
            amount: model.amount,
            category: Category::try_from(model.category.as_str())?,
            date: model.date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
