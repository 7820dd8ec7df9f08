//! Record store for the catalog service.
//!
//! Services talk to a [`Store`], which offers typed Save / Get / GetFiltered
//! over any [`Database`] backend. Persisted types describe their table with
//! the [`Record`] trait, so no backend ever needs to know about domain types.
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_db::{Filter, SqliteDb, Store};
//!
//! let db = SqliteDb::connect("").await?;
//! let store = Store::new(Arc::new(db), logger);
//! store.migrate(&[Product::TABLE]).await?;
//!
//! let cheap: Vec<Product> = store
//!     .get_filtered(&[Filter::new("price", "<=", 60000)])
//!     .await?;
//! ```

mod error;
mod filter;
mod memory;
mod record;
mod sqlite;
mod store;
mod types;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::DbError;
pub use filter::{Filter, Operator};
pub use memory::MemoryDb;
pub use record::{Column, Record, SqlType, Table};
pub use sqlite::SqliteDb;
pub use store::{Database, Store};
pub use types::{QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Database, DbError, Filter, Record, Store, Value};
}
