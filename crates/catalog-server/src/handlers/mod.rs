//! HTTP handlers.

pub mod discount;
pub mod health;
pub mod product;
