//! In-memory backend.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{Database, DbError, Filter, Operator, QueryResult, Row, Table, Value};

#[derive(Debug, Default)]
struct TableData {
    rows: Vec<Vec<Value>>,
    next_id: i64,
}

/// A [`Database`] kept entirely in process memory.
///
/// Enforces primary-key and unique constraints. Values are stored with
/// their column's affinity and compared by SQLite's rules, so filters
/// select the same rows as on the SQLite backend.
#[derive(Debug, Default)]
pub struct MemoryDb {
    tables: RwLock<HashMap<&'static str, TableData>>,
}

impl MemoryDb {
    /// Create an empty database with no tables.
    pub fn new() -> Self {
        Self::default()
    }
}

fn no_such_table(table: &Table) -> DbError {
    DbError::QueryError(format!("no such table: {}", table.name))
}

fn to_row(table: &Table, values: &[Value]) -> Row {
    Row::new(table.column_names(), values.to_vec())
}

#[async_trait]
impl Database for MemoryDb {
    async fn migrate(&self, tables: &[&'static Table]) -> Result<(), DbError> {
        let mut guard = self.tables.write();
        for table in tables {
            guard.entry(table.name).or_default();
        }
        Ok(())
    }

    async fn insert(&self, table: &'static Table, mut values: Vec<Value>) -> Result<i64, DbError> {
        if values.len() != table.columns.len() {
            return Err(DbError::QueryError(format!(
                "{} values supplied for {} columns of {}",
                values.len(),
                table.columns.len(),
                table.name
            )));
        }

        let mut guard = self.tables.write();
        let data = guard.get_mut(table.name).ok_or_else(|| no_such_table(table))?;

        for (value, column) in values.iter_mut().zip(table.columns) {
            *value = value.with_affinity(column.sql_type);
        }

        let key = table.key();
        let key_index = table.position(key.name).unwrap_or(0);
        if key.auto_increment && values[key_index].is_null() {
            values[key_index] = Value::Integer(data.next_id + 1);
        }

        for (index, column) in table.columns.iter().enumerate() {
            if !(column.primary_key || column.unique) {
                continue;
            }
            let taken = data.rows.iter().any(|row| row[index] == values[index]);
            if taken {
                return Err(DbError::Constraint(format!(
                    "UNIQUE constraint failed: {}.{}",
                    table.name, column.name
                )));
            }
        }

        let id = match values[key_index] {
            Value::Integer(id) => id,
            _ => data.rows.len() as i64 + 1,
        };
        if key.auto_increment {
            data.next_id = data.next_id.max(id);
        }
        data.rows.push(values);
        Ok(id)
    }

    async fn find(&self, table: &'static Table, key: Value) -> Result<Option<Row>, DbError> {
        let guard = self.tables.read();
        let data = guard.get(table.name).ok_or_else(|| no_such_table(table))?;
        let key_column = table.key();
        let key_index = table.position(key_column.name).unwrap_or(0);

        Ok(data
            .rows
            .iter()
            .find(|row| {
                row[key_index].compare(&key, key_column.sql_type) == Some(std::cmp::Ordering::Equal)
            })
            .map(|row| to_row(table, row)))
    }

    async fn find_filtered(
        &self,
        table: &'static Table,
        filters: &[Filter],
    ) -> Result<QueryResult, DbError> {
        let mut positions = Vec::with_capacity(filters.len());
        for filter in filters {
            let column = table.require_column(filter.column_name())?;
            Operator::parse(filter.operand())?;
            let index = table.position(column.name).unwrap_or(0);
            positions.push((index, column.sql_type));
        }

        let guard = self.tables.read();
        let data = guard.get(table.name).ok_or_else(|| no_such_table(table))?;

        let mut rows = Vec::new();
        for row in &data.rows {
            let mut keep = true;
            for (filter, &(index, affinity)) in filters.iter().zip(&positions) {
                if !filter.matches(&row[index], affinity)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                rows.push(to_row(table, row));
            }
        }

        Ok(QueryResult::new(rows))
    }
}
