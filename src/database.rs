use std::sync::Arc;

use axum::async_trait;

use crate::error::ServiceResult;
use crate::filter::ProductFilter;
use crate::models::{NewProduct, Product};

mod memory;
mod postgres;

#[cfg(test)]
mod tests;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Persistence for products.
///
/// Implementations assign ids from a store-wide sequence and keep products forever.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist all `products` atomically, in the given order.
    ///
    /// Ids of one call form a contiguous ascending run, even while other imports are running.
    async fn store_products(&self, products: Vec<NewProduct>) -> ServiceResult<Vec<Product>>;

    /// All products matching `filter`, ordered by ascending id.
    async fn get_products(&self, filter: &ProductFilter) -> ServiceResult<Vec<Product>>;
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    /// Connect to the store behind `url`, running pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> ServiceResult<AppState> {
        if url == "memory" {
            log::warn!("Using in-memory product store, data is lost on shutdown");
            return Ok(Self::from_store(MemoryStore::new()));
        }

        let store = PostgresStore::connect(url, max_connections).await?;
        Ok(Self::from_store(store))
    }

    pub fn from_store(store: impl ProductStore + 'static) -> AppState {
        AppState {
            store: Arc::new(store),
        }
    }
}
