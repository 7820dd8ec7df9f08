//! Discount service.

use std::collections::HashMap;

use catalog_db::Store;
use catalog_observability::Logger;

use super::classify::{classify, classify_one};
use super::discount::{Discount, DiscountRecord, DiscountRequest, DiscountType, DiscountTypeRequest};
use crate::error::CatalogError;

/// Creates and lists discounts. Every listing reads and classifies the
/// stored rows afresh.
#[derive(Clone)]
pub struct DiscountService {
    store: Store,
    logger: Logger,
}

impl DiscountService {
    pub fn new(store: Store, logger: Logger) -> Self {
        Self { store, logger }
    }

    pub async fn create_discount_type(
        &self,
        request: DiscountTypeRequest,
    ) -> Result<DiscountType, CatalogError> {
        let mut discount_type = request.to_discount_type();
        if let Err(e) = self
            .store
            .save(&discount_type.id.to_string(), &mut discount_type)
            .await
        {
            self.logger.with_error(&e).error("error creating discount type");
            return Err(CatalogError::internal("error creating discount type"));
        }
        Ok(discount_type)
    }

    /// Save a discount and return it classified, with its discount type
    /// attached when that type exists.
    pub async fn create_discount(&self, request: DiscountRequest) -> Result<Discount, CatalogError> {
        request.validate()?;

        let mut record = request.to_record();
        if let Err(e) = self.store.save(&record.id.to_string(), &mut record).await {
            self.logger.with_error(&e).error("error creating discount");
            return Err(CatalogError::internal("error creating discount"));
        }

        match self
            .store
            .get::<DiscountType>(&record.discount_type_id.to_string())
            .await
        {
            Ok(discount_type) => record.discount_type = Some(discount_type),
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                self.logger
                    .with_field("discount_id", record.id)
                    .with_error(&e)
                    .warn("could not load discount type");
            }
        }

        Ok(classify_one(record, &self.logger))
    }

    /// All discounts, in storage order, with their discount types attached.
    pub async fn get_discounts(&self) -> Result<Vec<Discount>, CatalogError> {
        let loaded = async {
            let mut records: Vec<DiscountRecord> = self.store.get_filtered(&[]).await?;
            let types: HashMap<i64, DiscountType> = self
                .store
                .get_filtered::<DiscountType>(&[])
                .await?
                .into_iter()
                .map(|t| (t.id, t))
                .collect();

            for record in &mut records {
                record.discount_type = types.get(&record.discount_type_id).cloned();
            }
            Ok::<_, catalog_db::DbError>(records)
        }
        .await;

        match loaded {
            Ok(records) => Ok(classify(records, &self.logger)),
            Err(e) => {
                self.logger.with_error(&e).error("error getting discounts");
                Err(CatalogError::internal("error getting discounts"))
            }
        }
    }
}
