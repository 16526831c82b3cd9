//! Exact-match filtering of products
use crate::models::Product;

/// A product attribute that can be used to narrow down a product listing.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FilterKey {
    Name,
    Sku,
    PrimaryCategory,
    ModelNumber,
    Upc,
}

impl FilterKey {
    pub const ALL: [FilterKey; 5] = [
        FilterKey::Name,
        FilterKey::Sku,
        FilterKey::PrimaryCategory,
        FilterKey::ModelNumber,
        FilterKey::Upc,
    ];

    /// Name of the query parameter.
    pub fn param(self) -> &'static str {
        match self {
            FilterKey::Name => "name",
            FilterKey::Sku => "sku",
            FilterKey::PrimaryCategory => "primary_category",
            FilterKey::ModelNumber => "model_number",
            FilterKey::Upc => "upc",
        }
    }

    pub fn from_param(param: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.param() == param)
    }

    /// Name of the backing column in the `products` table.
    pub fn column(self) -> &'static str {
        match self {
            FilterKey::Name => "name",
            FilterKey::Sku => "sku",
            FilterKey::PrimaryCategory => "primary_category",
            FilterKey::ModelNumber => "model_number",
            FilterKey::Upc => "upc",
        }
    }

    pub fn value_of(self, product: &Product) -> Option<&str> {
        let value = match self {
            FilterKey::Name => &product.name,
            FilterKey::Sku => &product.sku,
            FilterKey::PrimaryCategory => &product.primary_category,
            FilterKey::ModelNumber => &product.model_number,
            FilterKey::Upc => &product.upc,
        };
        value.as_deref()
    }
}

/// A conjunction of exact, case-sensitive equality checks.
///
/// The empty filter matches every product. A product without a value for a filtered
/// attribute never matches.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct ProductFilter {
    criteria: Vec<(FilterKey, String)>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a criterion. A repeated key replaces the earlier value.
    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.criteria.iter_mut().find(|(k, _)| *k == key) {
            Some(criterion) => criterion.1 = value,
            None => self.criteria.push((key, value)),
        }
        self
    }

    pub fn criteria(&self) -> &[(FilterKey, String)] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.criteria
            .iter()
            .all(|(key, value)| key.value_of(product) == Some(value.as_str()))
    }
}
