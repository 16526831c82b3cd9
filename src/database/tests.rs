//! Tests against the PostgreSQL server in `DATABASE_URL`.
use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::filter::{FilterKey, ProductFilter};
use crate::models::NewProduct;

use super::{PostgresStore, ProductStore};

fn pillow() -> NewProduct {
    NewProduct {
        name: Some("Frilly Pillow".to_string()),
        description: Some("Synthetic".to_string()),
        price: Some(Decimal::from_str("19.99").unwrap()),
        primary_category: Some("Living room".to_string()),
        secondary_category: Some("Textile".to_string()),
        model_number: Some("15587".to_string()),
        upc: Some("123140".to_string()),
        sku: Some("8857425124".to_string()),
    }
}

fn carpet() -> NewProduct {
    NewProduct {
        name: Some("Carpet".to_string()),
        description: Some("Polyester".to_string()),
        price: Some(Decimal::from_str("290.99").unwrap()),
        primary_category: Some("Apartment".to_string()),
        secondary_category: Some("Textile".to_string()),
        model_number: Some("M-590X".to_string()),
        upc: Some("123143".to_string()),
        sku: Some("001-74227".to_string()),
    }
}

#[sqlx::test]
async fn test_store_and_list_products(pool: PgPool) {
    let store = PostgresStore::from_pool(pool).await.unwrap();

    assert!(store.get_products(&ProductFilter::new()).await.unwrap().is_empty());

    let stored = store.store_products(vec![pillow(), carpet()]).await.unwrap();
    assert_eq!(stored, vec![pillow().with_id(1), carpet().with_id(2)]);

    let vase = NewProduct {
        name: Some("Vase".to_string()),
        price: Some(Decimal::from_str("40.00").unwrap()),
        ..Default::default()
    };
    let stored = store.store_products(vec![vase.clone()]).await.unwrap();
    assert_eq!(stored, vec![vase.clone().with_id(3)]);
    assert_eq!(stored[0].price.map(|p| p.to_string()), Some("40.00".to_string()));

    let all = store.get_products(&ProductFilter::new()).await.unwrap();
    assert_eq!(
        all,
        vec![pillow().with_id(1), carpet().with_id(2), vase.with_id(3)]
    );
}

#[sqlx::test]
async fn test_filter_products(pool: PgPool) {
    let store = PostgresStore::from_pool(pool).await.unwrap();
    store.store_products(vec![pillow(), carpet()]).await.unwrap();

    for (key, value, expected_id) in [
        (FilterKey::Name, "Frilly Pillow", 1),
        (FilterKey::Sku, "001-74227", 2),
        (FilterKey::PrimaryCategory, "Living room", 1),
        (FilterKey::ModelNumber, "M-590X", 2),
        (FilterKey::Upc, "123140", 1),
    ] {
        let products = store
            .get_products(&ProductFilter::new().with(key, value))
            .await
            .unwrap();
        assert_eq!(
            products.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![expected_id],
            "filter {}={}",
            key.param(),
            value
        );
    }

    let products = store
        .get_products(&ProductFilter::new().with(FilterKey::Sku, "001-7422"))
        .await
        .unwrap();
    assert!(products.is_empty());

    let products = store
        .get_products(
            &ProductFilter::new()
                .with(FilterKey::PrimaryCategory, "Apartment")
                .with(FilterKey::Upc, "123143"),
        )
        .await
        .unwrap();
    assert_eq!(products, vec![carpet().with_id(2)]);
}

#[sqlx::test]
async fn test_failed_import_stores_nothing(pool: PgPool) {
    let store = PostgresStore::from_pool(pool).await.unwrap();

    // Exceeds the NUMERIC(8, 2) price column.
    let overflowing = NewProduct {
        name: Some("Chandelier".to_string()),
        price: Some(Decimal::from(10_000_000)),
        ..Default::default()
    };
    let result = store.store_products(vec![pillow(), overflowing]).await;
    assert!(result.is_err());
    assert!(store.get_products(&ProductFilter::new()).await.unwrap().is_empty());

    let stored = store.store_products(vec![carpet()]).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(
        store.get_products(&ProductFilter::new()).await.unwrap(),
        stored
    );
}

#[sqlx::test]
async fn test_concurrent_imports_get_contiguous_ids(pool: PgPool) {
    let store = PostgresStore::from_pool(pool).await.unwrap();

    let (a, b) = tokio::join!(
        store.store_products(vec![pillow(), carpet(), pillow()]),
        store.store_products(vec![carpet(), pillow(), carpet()]),
    );

    for stored in [a.unwrap(), b.unwrap()] {
        let ids: Vec<u64> = stored.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ids[0], ids[0] + 1, ids[0] + 2]);
    }

    let all = store.get_products(&ProductFilter::new()).await.unwrap();
    assert_eq!(
        all.iter().map(|p| p.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5, 6]
    );
}
