//! Query filters.

use crate::{DbError, SqlType, Value};
use serde::Serialize;
use std::cmp::Ordering;

/// A single `column OP value` predicate.
///
/// Filters are plain value objects: they carry whatever column and operand
/// the caller supplied. The store validates both when the query runs and
/// rejects anything it does not understand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    column: String,
    operand: String,
    value: Value,
}

impl Filter {
    /// Create a filter on an arbitrary column.
    pub fn new(column: impl Into<String>, operand: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operand: operand.into(),
            value: value.into(),
        }
    }

    /// Column the predicate applies to.
    pub fn column_name(&self) -> &str {
        &self.column
    }

    /// Value bound to the placeholder.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Comparison operator, uninterpreted.
    pub fn operand(&self) -> &str {
        &self.operand
    }

    /// Build the SQL WHERE clause component, `"<column> <operand> ?"`.
    ///
    /// Fails when the operand is not one the store supports.
    pub fn to_sql(&self) -> Result<String, DbError> {
        let op = Operator::parse(&self.operand)?;
        Ok(format!("{} {} ?", self.column, op.as_sql()))
    }

    /// Evaluate the predicate against a value stored in a column of the
    /// given affinity.
    pub fn matches(&self, column_value: &Value, affinity: SqlType) -> Result<bool, DbError> {
        let op = Operator::parse(&self.operand)?;
        Ok(op.holds(column_value.compare(&self.value, affinity)))
    }
}

/// Comparison operators accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Operator {
    /// Parse an operand string.
    pub fn parse(operand: &str) -> Result<Self, DbError> {
        match operand.trim() {
            "=" | "==" => Ok(Operator::Eq),
            "!=" | "<>" => Ok(Operator::Ne),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            other => Err(DbError::UnsupportedOperand(other.to_string())),
        }
    }

    /// SQL spelling.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
        }
    }

    /// Whether the operator holds for a comparison outcome. A comparison
    /// with NULL never matches, as in SQL.
    pub fn holds(&self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Ge => ordering != Ordering::Less,
        }
    }
}
