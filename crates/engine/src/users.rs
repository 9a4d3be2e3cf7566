//! Registered accounts.

use sea_orm::entity::prelude::*;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: u64,
    pub handle: String,
    pub password_hash: String,
    pub is_premium: bool,
    pub payment_ref: Option<String>,
}

/// Account data before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAccount {
    pub handle: String,
    pub password_hash: String,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub is_premium: bool,
    pub payment_ref: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: crate::util::account_id_from_db(model.id)?,
            handle: model.username,
            password_hash: model.password_hash,
            is_premium: model.is_premium,
            payment_ref: model.payment_ref,
        })
    }
}
