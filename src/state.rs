use std::sync::Arc;

use crate::db::DbPool;
use crate::domain::ports::{OrderRepository, ProductRepository, TableRepository};
use crate::infrastructure::{DieselOrderRepository, DieselProductRepository, DieselTableRepository};

/// Repository handles shared by every worker.
#[derive(Clone)]
pub struct Repositories {
    pub tables: Arc<dyn TableRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    pub fn diesel(pool: DbPool) -> Self {
        Self {
            tables: Arc::new(DieselTableRepository::new(pool.clone())),
            products: Arc::new(DieselProductRepository::new(pool.clone())),
            orders: Arc::new(DieselOrderRepository::new(pool)),
        }
    }

    /// All three handles backed by the same in-memory store.
    #[cfg(any(test, feature = "test-support"))]
    pub fn in_memory(store: Arc<crate::infrastructure::memory::InMemoryStore>) -> Self {
        Self {
            tables: store.clone(),
            products: store.clone(),
            orders: store,
        }
    }
}
