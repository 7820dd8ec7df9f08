//! Table descriptors and the `Record` mapping trait.
//!
//! Every persisted type declares its table at compile time: the column
//! list, which column is the key, and how a row maps back to the type.
//! Backends only ever see these descriptors and `Value`s.

use crate::{DbError, Row, Value};

/// SQL storage class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Text,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
        }
    }
}

/// A column declaration.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub unique: bool,
}

impl Column {
    /// A plain `NOT NULL` column.
    pub const fn new(name: &'static str, sql_type: SqlType) -> Self {
        Self {
            name,
            sql_type,
            primary_key: false,
            auto_increment: false,
            unique: false,
        }
    }

    /// An auto-incrementing integer primary key.
    pub const fn serial(name: &'static str) -> Self {
        Self {
            name,
            sql_type: SqlType::Integer,
            primary_key: true,
            auto_increment: true,
            unique: false,
        }
    }

    /// Mark as primary key.
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Mark as unique.
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn definition(&self) -> String {
        let mut def = format!("{} {}", self.name, self.sql_type.as_sql());
        if self.primary_key {
            def.push_str(" PRIMARY KEY");
            if self.auto_increment {
                def.push_str(" AUTOINCREMENT");
            }
        } else {
            def.push_str(" NOT NULL");
        }
        if self.unique {
            def.push_str(" UNIQUE");
        }
        def
    }
}

/// A table declaration.
#[derive(Debug)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Table {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Index of a column by name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// The primary key column. Tables without one are keyed on their first column.
    pub fn key(&self) -> &Column {
        self.columns
            .iter()
            .find(|c| c.primary_key)
            .unwrap_or(&self.columns[0])
    }

    /// Column names, in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.to_string()).collect()
    }

    /// Ensure a filter or lookup targets a declared column.
    pub fn require_column(&self, name: &str) -> Result<&Column, DbError> {
        self.column(name).ok_or_else(|| DbError::UnknownColumn {
            table: self.name.to_string(),
            column: name.to_string(),
        })
    }

    /// Convert a textual key into the key column's type. A key that cannot
    /// be converted cannot match any row.
    pub fn key_value(&self, key: &str) -> Result<Value, DbError> {
        match self.key().sql_type {
            SqlType::Integer => key.trim().parse::<i64>().map(Value::Integer).map_err(|_| DbError::NotFound),
            SqlType::Text => Ok(Value::Text(key.to_string())),
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statement.
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(Column::definition).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            columns.join(", ")
        )
    }
}

/// A type persisted in a table.
pub trait Record: Clone + Send + Sync + 'static {
    /// The table this record lives in.
    const TABLE: &'static Table;

    /// Column values in `TABLE.columns` order. An auto-increment key that
    /// has not been assigned yet is `Value::Null`.
    fn values(&self) -> Vec<Value>;

    /// Rebuild the record from a row.
    fn from_row(row: &Row) -> Result<Self, DbError>;

    /// Receive the key generated by the store on insert.
    fn assign_id(&mut self, _id: i64) {}
}
