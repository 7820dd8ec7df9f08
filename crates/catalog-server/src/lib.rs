//! HTTP server for the catalog service.
//!
//! Routes:
//! - `GET /ping`
//! - `POST /v1/product`, `GET /v1/product/:id`, `GET /v1/products`
//! - `POST /v1/discount`, `GET /v1/discounts`
//!
//! Every response carries an `X-Request-Id` header, echoed from the request
//! or generated.

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use config::{Cli, ConfigError, ServerConfig};
pub use router::build_router;
pub use state::AppState;
