//! Database value types and conversions.

use crate::{DbError, SqlType};
use serde::Serialize;
use std::cmp::Ordering;

/// A database value that can be used as a parameter or result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value.
    Null,
    /// Integer value.
    Integer(i64),
    /// Real/float value.
    Real(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl Value {
    /// Interpret a raw request parameter: integers stay integers, anything
    /// else is kept as text.
    pub fn from_param(raw: &str) -> Self {
        raw.trim()
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::Text(raw.to_string()))
    }

    /// Try to get the value as an i64.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Real(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Try to get the value as an f64.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Check if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value as a column with the given affinity stores it.
    ///
    /// An INTEGER column turns numeric text into a number and keeps any
    /// other text as text. A TEXT column renders numbers as text.
    pub fn with_affinity(&self, affinity: SqlType) -> Value {
        match (affinity, self) {
            (SqlType::Integer, Value::Text(t)) => numeric_literal(t).unwrap_or_else(|| self.clone()),
            (SqlType::Integer, Value::Real(f)) => integral(*f).unwrap_or(Value::Real(*f)),
            (SqlType::Text, Value::Integer(i)) => Value::Text(i.to_string()),
            (SqlType::Text, Value::Real(f)) => Value::Text(format!("{:?}", f)),
            _ => self.clone(),
        }
    }

    /// Compare a column value against a bound parameter as SQLite does.
    ///
    /// The column's affinity applies to both sides first. Values of
    /// different storage classes then order numbers before text before
    /// blobs. `Null` compares to nothing.
    pub fn compare(&self, other: &Value, affinity: SqlType) -> Option<Ordering> {
        let left = self.with_affinity(affinity);
        let right = other.with_affinity(affinity);
        match (&left, &right) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Blob(a), Value::Blob(b)) => Some(a.cmp(b)),
            _ => match (left.as_real(), right.as_real()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => Some(left.storage_class().cmp(&right.storage_class())),
            },
        }
    }

    fn storage_class(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Integer(_) | Value::Real(_) => 1,
            Value::Text(_) => 2,
            Value::Blob(_) => 3,
        }
    }
}

/// Parse text that is a well-formed integer or real literal.
fn numeric_literal(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(i) = trimmed.parse::<i64>() {
        return Some(Value::Integer(i));
    }
    // f64 parsing also accepts "inf" and "NaN"; SQLite does not.
    let literal = trimmed.chars().any(|c| c.is_ascii_digit())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !literal {
        return None;
    }
    let f = trimmed.parse::<f64>().ok()?;
    Some(integral(f).unwrap_or(Value::Real(f)))
}

fn integral(f: f64) -> Option<Value> {
    let fits = f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64;
    fits.then(|| Value::Integer(f as i64))
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// A row from a query result.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Create a new row from columns and values.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Read a required integer column.
    pub fn integer(&self, column: &str) -> Result<i64, DbError> {
        self.get(column)
            .and_then(Value::as_integer)
            .ok_or_else(|| DbError::TypeError(format!("expected integer in column {}", column)))
    }

    /// Read a required text column. Integers are rendered as text, matching
    /// SQLite's affinity rules for TEXT columns.
    pub fn text(&self, column: &str) -> Result<String, DbError> {
        match self.get(column) {
            Some(Value::Text(s)) => Ok(s.clone()),
            Some(Value::Integer(i)) => Ok(i.to_string()),
            _ => Err(DbError::TypeError(format!("expected text in column {}", column))),
        }
    }
}

/// Rows returned by a filtered query, in table order.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    rows: Vec<Row>,
}

impl QueryResult {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Iterate over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_text_in_integer_column_compares_as_number() {
        let column = Value::Integer(89000);
        assert_eq!(column.compare(&Value::from("90000"), SqlType::Integer), Some(Ordering::Less));
        assert_eq!(column.compare(&Value::from(" 89000 "), SqlType::Integer), Some(Ordering::Equal));
        assert_eq!(column.compare(&Value::from("89000.0"), SqlType::Integer), Some(Ordering::Equal));
    }

    #[test]
    fn test_integers_sort_before_text_in_integer_column() {
        let column = Value::Integer(1);
        assert_eq!(column.compare(&Value::from("boots"), SqlType::Integer), Some(Ordering::Less));
        assert_eq!(column.compare(&Value::from("inf"), SqlType::Integer), Some(Ordering::Less));
    }

    #[test]
    fn test_text_column_compares_numbers_as_text() {
        let sku = Value::from("000003");
        assert_eq!(sku.compare(&Value::Integer(3), SqlType::Text), Some(Ordering::Less));
        assert_eq!(Value::from("3").compare(&Value::Integer(3), SqlType::Text), Some(Ordering::Equal));
        assert_eq!(Value::from("10").compare(&Value::Integer(9), SqlType::Text), Some(Ordering::Less));
    }

    #[test]
    fn test_null_compares_to_nothing() {
        assert_eq!(Value::Null.compare(&Value::Null, SqlType::Integer), None);
        assert_eq!(Value::Integer(1).compare(&Value::Null, SqlType::Text), None);
    }

    #[test]
    fn test_with_affinity() {
        assert_eq!(Value::from("42").with_affinity(SqlType::Integer), Value::Integer(42));
        assert_eq!(Value::from("1.5").with_affinity(SqlType::Integer), Value::Real(1.5));
        assert_eq!(Value::from("abc").with_affinity(SqlType::Integer), Value::from("abc"));
        assert_eq!(Value::Integer(7).with_affinity(SqlType::Text), Value::from("7"));
        assert_eq!(Value::Null.with_affinity(SqlType::Text), Value::Null);
    }

    #[test]
    fn test_from_param() {
        assert_eq!(Value::from_param("59000"), Value::Integer(59000));
        assert_eq!(Value::from_param("boots"), Value::Text("boots".to_string()));
    }

    #[test]
    fn test_row_accessors() {
        let row = Row::new(
            vec!["id".to_string(), "target".to_string()],
            vec![Value::Integer(7), Value::Integer(1)],
        );
        assert_eq!(row.integer("id").unwrap(), 7);
        assert_eq!(row.text("target").unwrap(), "1");
        assert!(row.integer("missing").is_err());
    }
}
