use std::collections::HashMap;

use aide::axum::routing::get_with;
use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::{Query, State};
use axum::Json;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;

use crate::database::AppState;
use crate::error::ServiceResult;
use crate::filter::{FilterKey, ProductFilter};
use crate::{import, models};

use super::upload::CsvUpload;
use super::Created;

pub fn router(app_state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/products",
            get_with(list_products, list_products_docs)
                .post_with(import_products, import_products_docs),
        )
        .with_state(app_state)
}

#[derive(Debug, PartialEq, Serialize, JsonSchema)]
pub struct ProductDto {
    pub id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Decimal without trailing zeros, e.g. `"19.99"`, `"19.9"` or `"40.0"`.
    pub price: Option<String>,
    pub primary_category: Option<String>,
    #[serde(rename = "seconday_category")]
    pub secondary_category: Option<String>,
    pub model_number: Option<String>,
    pub upc: Option<String>,
    pub sku: Option<String>,
}

impl From<&models::Product> for ProductDto {
    fn from(value: &models::Product) -> Self {
        Self {
            id: value.id,
            name: value.name.to_owned(),
            description: value.description.to_owned(),
            price: value.price.map(format_price),
            primary_category: value.primary_category.to_owned(),
            secondary_category: value.secondary_category.to_owned(),
            model_number: value.model_number.to_owned(),
            upc: value.upc.to_owned(),
            sku: value.sku.to_owned(),
        }
    }
}

/// Render a price without the zero padding of the stored scale, keeping at least one
/// fractional digit.
fn format_price(price: Decimal) -> String {
    let price = price.normalize();
    if price.scale() == 0 {
        format!("{price}.0")
    } else {
        price.to_string()
    }
}

/// Build a filter from query parameters. Unknown parameters are ignored.
fn filter_from_params(params: &HashMap<String, String>) -> ProductFilter {
    let mut filter = ProductFilter::new();

    for (param, value) in params {
        match FilterKey::from_param(param) {
            Some(key) => filter = filter.with(key, value.as_str()),
            None => log::debug!("Ignoring unknown product filter '{}'", param),
        }
    }

    filter
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ServiceResult<Json<Vec<ProductDto>>> {
    let filter = filter_from_params(&params);
    if !filter.is_empty() {
        log::debug!("Listing products matching {:?}", filter.criteria());
    }

    let products = state.store.get_products(&filter).await?;
    Ok(Json(products.iter().map(|p| p.into()).collect()))
}

fn list_products_docs(op: TransformOperation) -> TransformOperation {
    op.description(
        "List all products ordered by id. \
         Optionally filter by exact match on one of `name`, `sku`, `primary_category`, `model_number` or `upc`.",
    )
    .tag("products")
    .response::<200, Json<Vec<ProductDto>>>()
}

async fn import_products(
    State(state): State<AppState>,
    upload: CsvUpload,
) -> ServiceResult<Created<Json<Vec<ProductDto>>>> {
    log::info!(
        "Importing products from '{}' ({} bytes)",
        upload.file_name.as_deref().unwrap_or("<unnamed>"),
        upload.data.len()
    );

    let products = import::import_products(state.store.as_ref(), &upload.data).await?;
    Ok(Created(Json(products.iter().map(|p| p.into()).collect())))
}

fn import_products_docs(op: TransformOperation) -> TransformOperation {
    op.description(
        "Import products from the csv file in the multipart field `file`. \
         Returns the created products.",
    )
    .tag("products")
    .response::<201, Json<Vec<ProductDto>>>()
    .response_with::<422, (), _>(|res| res.description("The file is missing or empty!"))
    .response_with::<413, (), _>(|res| res.description("The upload exceeds the size limit!"))
}
