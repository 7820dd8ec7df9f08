//! Test doubles for the store.

use async_trait::async_trait;

use crate::{Database, DbError, Filter, QueryResult, Row, Table, Value};

/// A backend whose every call fails with a query error.
#[derive(Debug, Default)]
pub struct FailingDb;

fn failure() -> DbError {
    DbError::QueryError("database unavailable".to_string())
}

#[async_trait]
impl Database for FailingDb {
    async fn migrate(&self, _tables: &[&'static Table]) -> Result<(), DbError> {
        Err(failure())
    }

    async fn insert(&self, _table: &'static Table, _values: Vec<Value>) -> Result<i64, DbError> {
        Err(failure())
    }

    async fn find(&self, _table: &'static Table, _key: Value) -> Result<Option<Row>, DbError> {
        Err(failure())
    }

    async fn find_filtered(
        &self,
        _table: &'static Table,
        _filters: &[Filter],
    ) -> Result<QueryResult, DbError> {
        Err(failure())
    }
}
