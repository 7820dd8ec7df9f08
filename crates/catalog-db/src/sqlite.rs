//! SQLite backend on an sqlx connection pool.

use std::path::Path;

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column as _, Row as _, TypeInfo as _, ValueRef as _};

use crate::{Database, DbError, Filter, QueryResult, Row, Table, Value};

/// SQLite database.
///
/// An empty path opens a private in-memory database on a single
/// connection, so every query sees the same data.
#[derive(Debug, Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, DbError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbError::OpenError(format!("{}: {}", path.display(), e)))?;
        Ok(Self { pool })
    }

    /// Open `path`, or an in-memory database when `path` is empty.
    pub async fn connect(path: &str) -> Result<Self, DbError> {
        if path.trim().is_empty() {
            Self::open_in_memory().await
        } else {
            Self::open(Path::new(path)).await
        }
    }
}

fn bind_value<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    value: &'q Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<i64>),
        Value::Integer(i) => query.bind(*i),
        Value::Real(f) => query.bind(*f),
        Value::Text(s) => query.bind(s.as_str()),
        Value::Blob(b) => query.bind(b.as_slice()),
    }
}

fn convert_row(row: &SqliteRow) -> Result<Row, DbError> {
    let mut columns = Vec::with_capacity(row.columns().len());
    let mut values = Vec::with_capacity(row.columns().len());

    for (index, column) in row.columns().iter().enumerate() {
        let (is_null, type_name) = {
            let raw = row.try_get_raw(index)?;
            (raw.is_null(), raw.type_info().name().to_string())
        };

        let value = if is_null {
            Value::Null
        } else {
            match type_name.as_str() {
                "INTEGER" | "BOOLEAN" => Value::Integer(row.try_get::<i64, _>(index)?),
                "REAL" => Value::Real(row.try_get::<f64, _>(index)?),
                "BLOB" => Value::Blob(row.try_get::<Vec<u8>, _>(index)?),
                _ => Value::Text(row.try_get::<String, _>(index)?),
            }
        };

        columns.push(column.name().to_string());
        values.push(value);
    }

    Ok(Row::new(columns, values))
}

fn select_sql(table: &Table) -> String {
    format!("SELECT {} FROM {}", table.column_names().join(", "), table.name)
}

#[async_trait]
impl Database for SqliteDb {
    async fn migrate(&self, tables: &[&'static Table]) -> Result<(), DbError> {
        for table in tables {
            sqlx::query(&table.create_sql()).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn insert(&self, table: &'static Table, values: Vec<Value>) -> Result<i64, DbError> {
        // Unassigned auto-increment keys are left to SQLite.
        let (names, bound): (Vec<&str>, Vec<&Value>) = table
            .columns
            .iter()
            .zip(values.iter())
            .filter(|(column, value)| !(column.auto_increment && value.is_null()))
            .map(|(column, value)| (column.name, value))
            .unzip();

        let placeholders = vec!["?"; names.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.name,
            names.join(", "),
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for value in bound {
            query = bind_value(query, value);
        }

        let result = query.execute(&self.pool).await?;
        Ok(result.last_insert_rowid())
    }

    async fn find(&self, table: &'static Table, key: Value) -> Result<Option<Row>, DbError> {
        let sql = format!("{} WHERE {} = ? LIMIT 1", select_sql(table), table.key().name);
        let row = bind_value(sqlx::query(&sql), &key)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(convert_row).transpose()
    }

    async fn find_filtered(
        &self,
        table: &'static Table,
        filters: &[Filter],
    ) -> Result<QueryResult, DbError> {
        let mut clauses = Vec::with_capacity(filters.len());
        for filter in filters {
            table.require_column(filter.column_name())?;
            clauses.push(filter.to_sql()?);
        }

        let mut sql = select_sql(table);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY rowid");

        let mut query = sqlx::query(&sql);
        for filter in filters {
            query = bind_value(query, filter.value());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(convert_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(QueryResult::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, SqlType};

    static ITEMS: Table = Table {
        name: "items",
        columns: &[
            Column::serial("id"),
            Column::new("name", SqlType::Text).unique(),
            Column::new("price", SqlType::Integer),
        ],
    };

    async fn seeded() -> SqliteDb {
        let db = SqliteDb::connect("").await.unwrap();
        db.migrate(&[&ITEMS]).await.unwrap();
        for (name, price) in [("a", 100), ("b", 200), ("c", 300)] {
            db.insert(&ITEMS, vec![Value::Null, name.into(), price.into()])
                .await
                .unwrap();
        }
        db
    }

    #[tokio::test]
    async fn test_insert_returns_generated_key() {
        let db = seeded().await;
        let id = db
            .insert(&ITEMS, vec![Value::Null, "d".into(), 400.into()])
            .await
            .unwrap();
        assert_eq!(id, 4);
    }

    #[tokio::test]
    async fn test_find() {
        let db = seeded().await;
        let row = db.find(&ITEMS, Value::Integer(3)).await.unwrap().unwrap();
        assert_eq!(row.text("name").unwrap(), "c");
        assert_eq!(row.integer("price").unwrap(), 300);
        assert!(db.find(&ITEMS, Value::Integer(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_violation_is_constraint_error() {
        let db = seeded().await;
        let err = db
            .insert(&ITEMS, vec![Value::Null, "b".into(), 1.into()])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_text_bound_against_integer_column() {
        let db = seeded().await;
        let filters = vec![
            Filter::new("price", ">=", "200"),
            Filter::new("price", "<=", 250),
        ];
        let result = db.find_filtered(&ITEMS, &filters).await.unwrap();
        assert_eq!(result.iter().count(), 1);
        assert_eq!(result.iter().next().unwrap().text("name").unwrap(), "b");
    }

    #[tokio::test]
    async fn test_rejects_operand_before_touching_sql() {
        let db = seeded().await;
        let err = db
            .find_filtered(&ITEMS, &[Filter::new("price", "; DROP TABLE items; --", 1)])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UnsupportedOperand(_)));
        assert_eq!(db.find_filtered(&ITEMS, &[]).await.unwrap().iter().count(), 3);
    }
}
