//! Discounts: records, classification and the discount service.

mod classify;
#[allow(clippy::module_inception)]
mod discount;
mod service;

pub use classify::{classify, classify_one};
pub use discount::*;
pub use service::DiscountService;
