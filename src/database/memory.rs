use axum::async_trait;
use tokio::sync::Mutex;

use crate::error::ServiceResult;
use crate::filter::ProductFilter;
use crate::models::{NewProduct, Product};

use super::ProductStore;

#[derive(Default)]
struct Inner {
    products: Vec<Product>,
    last_id: u64,
}

/// Volatile store for development and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn store_products(&self, products: Vec<NewProduct>) -> ServiceResult<Vec<Product>> {
        let mut inner = self.inner.lock().await;

        let first_id = inner.last_id + 1;
        let stored: Vec<Product> = products
            .into_iter()
            .zip(first_id..)
            .map(|(product, id)| product.with_id(id))
            .collect();

        if let Some(last) = stored.last() {
            inner.last_id = last.id;
        }
        inner.products.extend(stored.iter().cloned());

        Ok(stored)
    }

    async fn get_products(&self, filter: &ProductFilter) -> ServiceResult<Vec<Product>> {
        let inner = self.inner.lock().await;

        // Products are appended with increasing ids, so insertion order is id order.
        Ok(inner
            .products
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::filter::FilterKey;

    fn named(name: &str) -> NewProduct {
        NewProduct {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ids_continue_across_imports() {
        let store = MemoryStore::new();

        let first = store
            .store_products(vec![named("Frilly Pillow"), named("Carpet")])
            .await
            .unwrap();
        assert_eq!(first.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);

        let empty = store.store_products(vec![]).await.unwrap();
        assert!(empty.is_empty());

        let second = store.store_products(vec![named("Vase")]).await.unwrap();
        assert_eq!(second, vec![named("Vase").with_id(3)]);

        let all = store.get_products(&ProductFilter::new()).await.unwrap();
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_filter() {
        let store = MemoryStore::new();
        store
            .store_products(vec![named("Lamp"), named("Vase"), named("Lamp")])
            .await
            .unwrap();

        let lamps = store
            .get_products(&ProductFilter::new().with(FilterKey::Name, "Lamp"))
            .await
            .unwrap();
        assert_eq!(lamps.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 3]);

        let none = store
            .get_products(&ProductFilter::new().with(FilterKey::Sku, "Lamp"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_imports_get_disjoint_runs() {
        let store = Arc::new(MemoryStore::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .store_products(vec![named("a"), named("b"), named("c")])
                    .await
                    .unwrap()
            }));
        }

        let mut all_ids = Vec::new();
        for handle in handles {
            let ids: Vec<u64> = handle.await.unwrap().iter().map(|p| p.id).collect();
            assert_eq!(ids, vec![ids[0], ids[0] + 1, ids[0] + 2]);
            all_ids.extend(ids);
        }

        all_ids.sort_unstable();
        assert_eq!(all_ids, (1..=24).collect::<Vec<u64>>());
    }
}
