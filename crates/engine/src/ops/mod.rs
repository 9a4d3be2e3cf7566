use std::{fmt, sync::Arc};

use sea_orm::DatabaseConnection;

use crate::{DbStore, EngineError, ResultEngine, Store};

mod accounts;
mod expenses;

/// Message returned when a premium capability is used without the
/// entitlement.
pub const UPGRADE_REQUIRED: &str = "This is a Premium feature. Please upgrade!";

pub struct Engine {
    store: Arc<dyn Store>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn Store>>,
}

impl EngineBuilder {
    /// Back the engine with a sea-orm database.
    pub fn database(self, db: DatabaseConnection) -> EngineBuilder {
        self.store(Arc::new(DbStore::new(db)))
    }

    /// Back the engine with any [`Store`] implementation.
    pub fn store(mut self, store: Arc<dyn Store>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Configuration("missing store".to_string()))?;
        Ok(Engine { store })
    }
}
