//! Product types and their filters.

use crate::catalog::Category;
use crate::money::Currency;
use catalog_db::{Column, DbError, Filter, Record, Row, SqlType, Table, Value};
use serde::{Deserialize, Serialize};

/// `products` table, keyed on SKU.
pub static PRODUCTS: Table = Table {
    name: "products",
    columns: &[
        Column::new("sku", SqlType::Text).primary_key(),
        Column::new("name", SqlType::Text),
        Column::new("category_id", SqlType::Integer),
        Column::new("price", SqlType::Integer),
    ],
};

/// A product in the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stock keeping unit (unique).
    pub sku: String,
    /// Product name.
    pub name: String,
    /// Category this product belongs to.
    #[serde(alias = "category_id")]
    pub category_id: i64,
    /// Price in minor currency units.
    pub price: i64,
    /// The category, when loaded. Not stored with the product.
    #[serde(default)]
    pub category: Option<Category>,
}

impl Product {
    /// Query parameter names a listing may filter on, mapped to their columns.
    pub const FILTERABLE: &'static [(&'static str, &'static str)] =
        &[("category", "category_id"), ("price", "price")];

    /// Column backing a filterable field.
    pub fn filter_column(field: &str) -> Option<&'static str> {
        Self::FILTERABLE
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
    }

    /// Filter on the product's category. Neither argument is validated here.
    pub fn category_filter(value: impl Into<Value>, operand: &str) -> Filter {
        Filter::new("category_id", operand, value)
    }

    /// Filter on the product's price. Neither argument is validated here.
    pub fn price_filter(value: impl Into<Value>, operand: &str) -> Filter {
        Filter::new("price", operand, value)
    }

    /// Store key of this product.
    pub fn identifier(&self) -> &str {
        &self.sku
    }

    /// Name of the loaded category, or `""` when none is loaded.
    pub fn category_name(&self) -> &str {
        self.category.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }
}

impl Record for Product {
    const TABLE: &'static Table = &PRODUCTS;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::from(self.sku.as_str()),
            Value::from(self.name.as_str()),
            Value::Integer(self.category_id),
            Value::Integer(self.price),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self {
            sku: row.text("sku")?,
            name: row.text("name")?,
            category_id: row.integer("category_id")?,
            price: row.integer("price")?,
            category: None,
        })
    }
}

/// Body for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub sku: String,
    pub name: String,
    pub price: i64,
    #[serde(alias = "category_id")]
    pub category_id: i64,
}

impl ProductRequest {
    pub fn to_product(&self) -> Product {
        Product {
            sku: self.sku.clone(),
            name: self.name.clone(),
            category_id: self.category_id,
            price: self.price,
            category: None,
        }
    }
}

/// Price block of a listed product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    /// Price before discounts.
    pub original: i64,
    /// Price after the best applicable discount.
    #[serde(rename = "final")]
    pub final_price: i64,
    /// Percentage of the discount that produced `final_price`, if any.
    pub discount_percentage: Option<String>,
    pub currency: Currency,
}

impl PriceResponse {
    /// An undiscounted price.
    pub fn undiscounted(price: i64) -> Self {
        Self {
            original: price,
            final_price: price,
            discount_percentage: None,
            currency: Currency::EUR,
        }
    }
}

/// A listed product with its resolved price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductResponse {
    pub sku: String,
    pub name: String,
    /// Category name.
    pub category: String,
    pub price: PriceResponse,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            sku: product.sku.clone(),
            name: product.name.clone(),
            category: product.category_name().to_string(),
            price: PriceResponse::undiscounted(product.price),
        }
    }
}

/// A priced product, as produced by the pricing engine.
pub type PricedProduct = ProductResponse;
