//! Mapping raw discount rows to [`Discount`] variants.

use catalog_observability::Logger;

use super::discount::{Discount, DiscountRecord, CATEGORY, GENERAL, SKU};

impl From<DiscountRecord> for Discount {
    /// Total: any type id other than category or SKU is a general discount.
    fn from(record: DiscountRecord) -> Self {
        match record.discount_type_id {
            CATEGORY => Discount::Category(record),
            SKU => Discount::Sku(record),
            _ => Discount::General(record),
        }
    }
}

/// Classify discount rows, keeping their order.
pub fn classify(records: Vec<DiscountRecord>, logger: &Logger) -> Vec<Discount> {
    records
        .into_iter()
        .map(|record| classify_one(record, logger))
        .collect()
}

/// Classify a single row. A type id that is not one of the known kinds is
/// treated as a general discount and logged.
pub fn classify_one(record: DiscountRecord, logger: &Logger) -> Discount {
    if !matches!(record.discount_type_id, CATEGORY | SKU | GENERAL) {
        logger
            .with_field("discount_id", record.id)
            .with_field("discount_type_id", record.discount_type_id)
            .warn("unknown discount type, treating as general");
    }
    Discount::from(record)
}
