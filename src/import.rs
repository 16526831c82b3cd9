//! CSV parsing for product imports
//!
//! An import file starts with a header row. Known header names are mapped to product attributes,
//! every other column is ignored. Rows are parsed leniently: missing or empty cells leave the
//! attribute unset and an unusable price is dropped instead of failing the whole file.
use std::str::FromStr;

use csv::{ByteRecord, ReaderBuilder};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::database::ProductStore;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewProduct, Product};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Number of fractional digits a price is stored with.
pub const PRICE_SCALE: u32 = 2;

/// Largest storable price, `999999.99`.
pub const MAX_PRICE: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, PRICE_SCALE);

/// A recognized column of an import file.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ImportColumn {
    Name,
    Description,
    Price,
    PrimaryCategory,
    /// Spelled `seconday_category` in import files.
    SecondaryCategory,
    ModelNumber,
    Upc,
    Sku,
}

impl ImportColumn {
    pub const ALL: [ImportColumn; 8] = [
        ImportColumn::Name,
        ImportColumn::Description,
        ImportColumn::Price,
        ImportColumn::PrimaryCategory,
        ImportColumn::SecondaryCategory,
        ImportColumn::ModelNumber,
        ImportColumn::Upc,
        ImportColumn::Sku,
    ];

    pub fn header(self) -> &'static str {
        match self {
            ImportColumn::Name => "name",
            ImportColumn::Description => "description",
            ImportColumn::Price => "price",
            ImportColumn::PrimaryCategory => "primary_category",
            ImportColumn::SecondaryCategory => "seconday_category",
            ImportColumn::ModelNumber => "model_number",
            ImportColumn::Upc => "upc",
            ImportColumn::Sku => "sku",
        }
    }

    /// Header names match case-sensitively.
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.header() == header)
    }

    /// Store a raw cell value into the matching attribute of `product`.
    fn apply(self, product: &mut NewProduct, raw: &str, line: u64) {
        match self {
            ImportColumn::Name => product.name = parse_text(raw),
            ImportColumn::Description => product.description = parse_text(raw),
            ImportColumn::Price => product.price = parse_price(raw, line),
            ImportColumn::PrimaryCategory => product.primary_category = parse_text(raw),
            ImportColumn::SecondaryCategory => product.secondary_category = parse_text(raw),
            ImportColumn::ModelNumber => product.model_number = parse_text(raw),
            ImportColumn::Upc => product.upc = parse_text(raw),
            ImportColumn::Sku => product.sku = parse_text(raw),
        }
    }
}

fn parse_text(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_owned())
    }
}

/// Parse a price cell and normalize it to the stored precision.
///
/// Values are rounded half away from zero to two fractional digits. Unparseable
/// and out of range values yield `None`.
pub fn parse_price(raw: &str, line: u64) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let price = match Decimal::from_str(raw) {
        Ok(price) => price,
        Err(e) => {
            log::warn!("Ignoring price '{}' in line {}: {}", raw, line, e);
            return None;
        }
    };

    let mut price = price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if price.abs() > MAX_PRICE {
        log::warn!("Ignoring price '{}' in line {}: exceeds {}", raw, line, MAX_PRICE);
        return None;
    }

    price.rescale(PRICE_SCALE);
    Some(price)
}

/// Parse the content of an uploaded csv file into products, in file order.
///
/// Fails only if the header row cannot be read. Blank lines are skipped.
pub fn parse_products(data: &[u8]) -> ServiceResult<Vec<NewProduct>> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers = reader
        .byte_headers()
        .map_err(|e| ServiceError::ValidationError(format!("cannot read csv header: {e}")))?
        .clone();

    // Only the first occurrence of a duplicated header is used.
    let mut columns: Vec<Option<ImportColumn>> = Vec::with_capacity(headers.len());
    for header in headers.iter() {
        let column = ImportColumn::from_header(&String::from_utf8_lossy(header))
            .filter(|column| !columns.contains(&Some(*column)));
        columns.push(column);
    }

    if columns.iter().all(Option::is_none) {
        log::warn!(
            "Import file has no known column, got headers {:?}",
            headers
                .iter()
                .map(|h| String::from_utf8_lossy(h).into_owned())
                .collect::<Vec<_>>()
        );
    }

    let mut products = Vec::new();
    let mut record = ByteRecord::new();
    loop {
        let has_record = reader
            .read_byte_record(&mut record)
            .map_err(|e| ServiceError::ValidationError(format!("cannot read csv file: {e}")))?;
        if !has_record {
            break;
        }

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let mut product = NewProduct::default();
        for (column, cell) in columns.iter().zip(record.iter()) {
            if let Some(column) = column {
                column.apply(&mut product, &String::from_utf8_lossy(cell), line);
            }
        }
        products.push(product);
    }

    Ok(products)
}

/// Parse `data` and persist every row as a new product.
///
/// Either all rows are stored or none. Returns only the products created by this import.
pub async fn import_products(store: &dyn ProductStore, data: &[u8]) -> ServiceResult<Vec<Product>> {
    if data.is_empty() {
        return Err(ServiceError::ValidationError("Import file is empty".to_owned()));
    }

    let products = parse_products(data)?;
    let stored = store.store_products(products).await?;

    match (stored.first(), stored.last()) {
        (Some(first), Some(last)) => log::info!(
            "Imported {} products with ids {}..={}",
            stored.len(),
            first.id,
            last.id
        ),
        _ => log::info!("Import file contained no products"),
    }

    Ok(stored)
}
