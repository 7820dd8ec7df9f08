//! Category types for product organization.

use catalog_db::{Column, DbError, Record, Row, SqlType, Table, Value};
use serde::{Deserialize, Serialize};

/// `categories` table.
pub static CATEGORIES: Table = Table {
    name: "categories",
    columns: &[
        Column::serial("id"),
        Column::new("name", SqlType::Text).unique(),
    ],
};

/// A product category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Store-assigned identifier; `0` until saved.
    pub id: i64,
    /// Category name (unique).
    pub name: String,
}

impl Category {
    /// Create an unsaved category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }

    /// Store key of this category.
    pub fn identifier(&self) -> String {
        self.id.to_string()
    }
}

impl Record for Category {
    const TABLE: &'static Table = &CATEGORIES;

    fn values(&self) -> Vec<Value> {
        let id = if self.id == 0 {
            Value::Null
        } else {
            Value::Integer(self.id)
        };
        vec![id, Value::from(self.name.as_str())]
    }

    fn from_row(row: &Row) -> Result<Self, DbError> {
        Ok(Self {
            id: row.integer("id")?,
            name: row.text("name")?,
        })
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Body for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRequest {
    pub name: String,
}

impl CategoryRequest {
    pub fn to_category(&self) -> Category {
        Category::new(self.name.clone())
    }
}
