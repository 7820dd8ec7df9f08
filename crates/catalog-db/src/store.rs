//! The store contract used by the services.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_observability::Logger;

use crate::{DbError, Filter, QueryResult, Record, Row, Table, Value};

/// A storage backend. Works on table descriptors and raw values so that it
/// stays object safe; typed access goes through [`Store`].
#[async_trait]
pub trait Database: Send + Sync {
    /// Create the given tables if they do not exist.
    async fn migrate(&self, tables: &[&'static Table]) -> Result<(), DbError>;

    /// Insert a row. Returns the generated key for auto-increment tables,
    /// otherwise the backend's row id.
    async fn insert(&self, table: &'static Table, values: Vec<Value>) -> Result<i64, DbError>;

    /// Fetch the row whose key column equals `key`.
    async fn find(&self, table: &'static Table, key: Value) -> Result<Option<Row>, DbError>;

    /// Fetch every row matching all filters, in insertion order.
    async fn find_filtered(
        &self,
        table: &'static Table,
        filters: &[Filter],
    ) -> Result<QueryResult, DbError>;
}

/// Typed Save/Get/GetFiltered over any [`Database`].
#[derive(Clone)]
pub struct Store {
    db: Arc<dyn Database>,
    logger: Logger,
}

impl Store {
    /// Wrap a backend.
    pub fn new(db: Arc<dyn Database>, logger: Logger) -> Self {
        Self { db, logger }
    }

    /// Create tables for the given records' descriptors.
    pub async fn migrate(&self, tables: &[&'static Table]) -> Result<(), DbError> {
        self.db.migrate(tables).await
    }

    /// Persist a record. Auto-increment keys are written back into it.
    pub async fn save<R: Record>(&self, key: &str, record: &mut R) -> Result<(), DbError> {
        let table = R::TABLE;
        self.logger
            .with_field("key", key)
            .info(&format!("creating {}", table.name));

        match self.db.insert(table, record.values()).await {
            Ok(id) => {
                if table.key().auto_increment {
                    record.assign_id(id);
                }
                Ok(())
            }
            Err(e) => {
                self.logger
                    .with_error(&e)
                    .error(&format!("error creating {}", table.name));
                Err(e)
            }
        }
    }

    /// Fetch one record by key; `DbError::NotFound` when absent.
    pub async fn get<R: Record>(&self, key: &str) -> Result<R, DbError> {
        let table = R::TABLE;
        let logger = self.logger.with_field("key", key);
        logger.info(&format!("getting {}", table.name));

        let result = async {
            let key = table.key_value(key)?;
            let row = self.db.find(table, key).await?.ok_or(DbError::NotFound)?;
            R::from_row(&row)
        }
        .await;

        if let Err(e) = &result {
            logger.with_error(e).error(&format!("error getting {}", table.name));
        }
        result
    }

    /// Fetch every record matching all filters. No filters returns the
    /// whole table.
    pub async fn get_filtered<R: Record>(&self, filters: &[Filter]) -> Result<Vec<R>, DbError> {
        let table = R::TABLE;
        let result = async {
            self.db
                .find_filtered(table, filters)
                .await?
                .iter()
                .map(R::from_row)
                .collect::<Result<Vec<_>, _>>()
        }
        .await;

        match &result {
            Ok(records) => self
                .logger
                .with_field("found", records.len())
                .info(&format!("getting {}", table.name)),
            Err(e) => self
                .logger
                .with_field("filters", filters.len())
                .with_error(e)
                .error(&format!("error getting {}", table.name)),
        }
        result
    }
}
