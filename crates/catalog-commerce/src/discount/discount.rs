//! Discount records and the discount sum type.

use catalog_db::{Column, DbError, Record, Row, SqlType, Table, Value};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CatalogError;

/// Discount type id of discounts that apply to a whole category.
pub const CATEGORY: i64 = 1;
/// Discount type id of discounts that apply to a single SKU.
pub const SKU: i64 = 2;
/// Discount type id of discounts that apply to every product.
pub const GENERAL: i64 = 3;

/// `discount_types` table.
pub static DISCOUNT_TYPES: Table = Table {
    name: "discount_types",
    columns: &[
        Column::serial("id"),
        Column::new("kind", SqlType::Text).unique(),
    ],
};

/// `discounts` table. `discount_type_id` is not a foreign key: rows may
/// reference type ids that do not exist.
pub static DISCOUNTS: Table = Table {
    name: "discounts",
    columns: &[
        Column::serial("id"),
        Column::new("percentage", SqlType::Integer),
        Column::new("discount_type_id", SqlType::Integer),
        Column::new("target", SqlType::Text),
    ],
};

fn serial_value(id: i64) -> Value {
    if id == 0 {
        Value::Null
    } else {
        Value::Integer(id)
    }
}

/// A kind of discount ("category", "sku", "general"). Immutable once created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscountType {
    pub id: i64,
    #[serde(alias = "type")]
    pub kind: String,
}

impl Record for DiscountType {
    const TABLE: &'static Table = &DISCOUNT_TYPES;

    fn values(&self) -> Vec<Value> {
        vec![serial_value(self.id), Value::from(self.kind.as_str())]
    }

    fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self {
            id: row.integer("id")?,
            kind: row.text("kind")?,
        })
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Body for creating a discount type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscountTypeRequest {
    #[serde(alias = "type")]
    pub kind: String,
}

impl DiscountTypeRequest {
    pub fn to_discount_type(&self) -> DiscountType {
        DiscountType {
            id: 0,
            kind: self.kind.clone(),
        }
    }
}

/// A persisted discount row.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRecord {
    pub id: i64,
    /// Whole percent, nominally 0 to 100.
    pub percentage: i64,
    #[serde(alias = "discount_type_id")]
    pub discount_type_id: i64,
    /// The discount type, when loaded. Not stored with the discount.
    #[serde(default, alias = "discount_type")]
    pub discount_type: Option<DiscountType>,
    /// Category id, SKU, or empty, depending on the discount type.
    #[serde(default)]
    pub target: String,
}

impl Record for DiscountRecord {
    const TABLE: &'static Table = &DISCOUNTS;

    fn values(&self) -> Vec<Value> {
        vec![
            serial_value(self.id),
            Value::Integer(self.percentage),
            Value::Integer(self.discount_type_id),
            Value::from(self.target.as_str()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self {
            id: row.integer("id")?,
            percentage: row.integer("percentage")?,
            discount_type_id: row.integer("discount_type_id")?,
            discount_type: None,
            target: row.text("target")?,
        })
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Body for creating a discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequest {
    pub percentage: i64,
    #[serde(alias = "discount_type_id")]
    pub discount_type_id: i64,
    #[serde(default)]
    pub target: String,
}

impl DiscountRequest {
    /// Reject percentages outside 0 to 100.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !(0..=100).contains(&self.percentage) {
            return Err(CatalogError::Validation(format!(
                "percentage must be between 0 and 100, got {}",
                self.percentage
            )));
        }
        Ok(())
    }

    pub fn to_record(&self) -> DiscountRecord {
        DiscountRecord {
            id: 0,
            percentage: self.percentage,
            discount_type_id: self.discount_type_id,
            discount_type: None,
            target: self.target.clone(),
        }
    }
}

/// Response for a created discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscountResponse {
    pub id: String,
    pub target: String,
    pub discount_type: Option<DiscountType>,
    pub percentage: i64,
}

/// What a discount is matched against: one product's category and SKU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscountConditions {
    pub category_id: String,
    pub sku: String,
}

impl DiscountConditions {
    pub fn new(category_id: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            sku: sku.into(),
        }
    }
}

/// A classified discount. The variant decides applicability; pricing is
/// the same for all three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discount {
    /// Applies to every product.
    General(DiscountRecord),
    /// Applies when the product's category id equals the target.
    Category(DiscountRecord),
    /// Applies when the product's SKU equals the target.
    Sku(DiscountRecord),
}

impl Discount {
    /// The underlying record.
    pub fn record(&self) -> &DiscountRecord {
        match self {
            Discount::General(r) | Discount::Category(r) | Discount::Sku(r) => r,
        }
    }

    pub fn into_record(self) -> DiscountRecord {
        match self {
            Discount::General(r) | Discount::Category(r) | Discount::Sku(r) => r,
        }
    }

    pub fn percentage(&self) -> i64 {
        self.record().percentage
    }

    pub fn is_applicable_for(&self, conditions: &DiscountConditions) -> bool {
        match self {
            Discount::General(_) => true,
            Discount::Category(r) => conditions.category_id == r.target,
            Discount::Sku(r) => conditions.sku == r.target,
        }
    }

    /// `original - original * percentage / 100`, truncating. The percentage
    /// is not checked here.
    pub fn apply(&self, original: i64) -> i64 {
        let original = i128::from(original);
        let cut = original * i128::from(self.percentage()) / 100;
        (original - cut).clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    pub fn to_response(&self) -> DiscountResponse {
        let r = self.record();
        DiscountResponse {
            id: r.id.to_string(),
            target: r.target.clone(),
            discount_type: r.discount_type.clone(),
            percentage: r.percentage,
        }
    }
}

/// Serialized as the underlying record.
impl Serialize for Discount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record().serialize(serializer)
    }
}

/// The discounted price when `discount` applies to `conditions`.
pub fn apply_and_check(discount: &Discount, conditions: &DiscountConditions, price: i64) -> Option<i64> {
    discount
        .is_applicable_for(conditions)
        .then(|| discount.apply(price))
}
