use axum::async_trait;
use rust_decimal::Decimal;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::ServiceResult;
use crate::filter::ProductFilter;
use crate::models::{NewProduct, Product};

use super::ProductStore;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Key of the transaction scoped advisory lock that serializes imports.
const IMPORT_LOCK_KEY: i64 = 0x7072_6f64;

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, primary_category, secondary_category, model_number, upc, sku";

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    primary_category: Option<String>,
    secondary_category: Option<String>,
    model_number: Option<String>,
    upc: Option<String>,
    sku: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id as u64,
            name: row.name,
            description: row.description,
            price: row.price,
            primary_category: row.primary_category,
            secondary_category: row.secondary_category,
            model_number: row.model_number,
            upc: row.upc,
            sku: row.sku,
        }
    }
}

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(url: &str, max_connections: u32) -> ServiceResult<PostgresStore> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: PgPool) -> ServiceResult<PostgresStore> {
        MIGRATOR.run(&pool).await?;
        Ok(PostgresStore { pool })
    }
}

#[async_trait]
impl ProductStore for PostgresStore {
    async fn store_products(&self, products: Vec<NewProduct>) -> ServiceResult<Vec<Product>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(IMPORT_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let insert = format!(
            "INSERT INTO products (name, description, price, primary_category, secondary_category, model_number, upc, sku) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {PRODUCT_COLUMNS}"
        );

        let mut stored = Vec::with_capacity(products.len());
        for product in products {
            let row: ProductRow = sqlx::query_as(&insert)
                .bind(product.name)
                .bind(product.description)
                .bind(product.price)
                .bind(product.primary_category)
                .bind(product.secondary_category)
                .bind(product.model_number)
                .bind(product.upc)
                .bind(product.sku)
                .fetch_one(&mut *tx)
                .await?;
            stored.push(Product::from(row));
        }

        tx.commit().await?;
        Ok(stored)
    }

    async fn get_products(&self, filter: &ProductFilter) -> ServiceResult<Vec<Product>> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));

        for (index, (key, value)) in filter.criteria().iter().enumerate() {
            query.push(if index == 0 { " WHERE " } else { " AND " });
            query.push(key.column());
            query.push(" = ");
            query.push_bind(value.clone());
        }
        query.push(" ORDER BY id ASC");

        let rows: Vec<ProductRow> = query.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}
