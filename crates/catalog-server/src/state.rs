//! Shared handler state.

use catalog_commerce::catalog::{CategoryService, ProductService};
use catalog_commerce::discount::DiscountService;
use catalog_db::Store;
use catalog_observability::Logger;

/// Services handed to every handler. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub categories: CategoryService,
    pub products: ProductService,
    pub discounts: DiscountService,
    pub logger: Logger,
}

impl AppState {
    /// Wire the services over one store.
    pub fn new(store: Store, logger: Logger) -> Self {
        let discounts = DiscountService::new(store.clone(), logger.with_field("component", "discount"));
        Self {
            categories: CategoryService::new(store.clone(), logger.with_field("component", "category")),
            products: ProductService::new(
                store,
                logger.with_field("component", "product"),
                discounts.clone(),
            ),
            discounts,
            logger,
        }
    }
}
