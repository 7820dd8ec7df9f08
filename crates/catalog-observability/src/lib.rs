//! Observability infrastructure for the catalog service.
//!
//! This crate provides:
//! - `Logger` - Structured logger handed to every component at construction
//! - `LoggingConfig` - Process-wide `tracing` subscriber setup
//! - `RequestId` - Request identifier propagated through `X-Request-Id`

mod logging;
mod request;

pub use logging::*;
pub use request::*;
