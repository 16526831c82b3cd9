use rust_decimal::Decimal;

/// A persisted catalog record.
///
/// Products are created by an import and never change afterwards.
#[derive(Debug, PartialEq, Clone)]
pub struct Product {
    pub id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub primary_category: Option<String>,
    pub secondary_category: Option<String>,
    pub model_number: Option<String>,
    pub upc: Option<String>,
    pub sku: Option<String>,
}

/// A product parsed from an import row that has not been assigned an id yet.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct NewProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub primary_category: Option<String>,
    pub secondary_category: Option<String>,
    pub model_number: Option<String>,
    pub upc: Option<String>,
    pub sku: Option<String>,
}

impl NewProduct {
    pub fn with_id(self, id: u64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            primary_category: self.primary_category,
            secondary_category: self.secondary_category,
            model_number: self.model_number,
            upc: self.upc,
            sku: self.sku,
        }
    }
}
