//! Catalog domain for the catalog service.
//!
//! - **Catalog**: categories and products, plus their services
//! - **Discount**: discount records, classification into `Discount`
//!   variants, and the discount service
//! - **Pricing**: best-price resolution of products against discounts
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_commerce::prelude::*;
//!
//! let discounts = DiscountService::new(store.clone(), logger.clone());
//! let products = ProductService::new(store, logger, discounts);
//!
//! let boots = products
//!     .list_products(&[Product::category_filter("1", "=")])
//!     .await?;
//! println!("{}", boots[0].price.final_price);
//! ```

pub mod error;
pub mod money;

pub mod catalog;
pub mod discount;
pub mod pricing;
pub mod seed;

use catalog_db::Table;

pub use error::{CatalogError, ErrorBody};
pub use money::Currency;

/// Every table the catalog stores, in migration order.
pub static TABLES: [&Table; 4] = [
    &catalog::CATEGORIES,
    &catalog::PRODUCTS,
    &discount::DISCOUNT_TYPES,
    &discount::DISCOUNTS,
];

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CatalogError, ErrorBody};
    pub use crate::money::Currency;

    // Catalog
    pub use crate::catalog::{
        Category, CategoryRequest, CategoryService, PriceResponse, PricedProduct, Product,
        ProductRequest, ProductResponse, ProductService,
    };

    // Discount
    pub use crate::discount::{
        classify, Discount, DiscountConditions, DiscountRecord, DiscountRequest,
        DiscountResponse, DiscountService, DiscountType, DiscountTypeRequest,
    };

    // Pricing
    pub use crate::pricing::{best_price, price_products};
    pub use crate::seed::seed_catalog;
}
