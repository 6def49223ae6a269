//! Filter types for dynamic query building.
//!
//! A [`Filter`] is a conjunction of [`FilterField`] conditions. It is the
//! predicate passed across the repository boundary: plain data that the
//! database layer validates against the entity's columns and renders into
//! bound SQL.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// SQL `LIKE` pattern match.
    Like,
    /// Case-insensitive pattern match.
    ILike,
    /// SQL `IN` list membership.
    In,
    /// SQL `IS NULL` check.
    IsNull,
    /// SQL `IS NOT NULL` check.
    IsNotNull,
}

impl FilterOp {
    /// Return the SQL comparison operator for binary operators.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Like | Self::ILike => "LIKE",
            Self::In => "IN",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// Whether the operator takes no right-hand value.
    pub fn is_unary(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

/// A dynamic filter value that can represent various SQL types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// A timestamp value.
    Timestamp(NaiveDateTime),
    /// A string value.
    String(String),
    /// A list of integer values (for `IN` operator).
    IntegerList(Vec<i64>),
    /// A list of string values (for `IN` operator).
    StringList(Vec<String>),
    /// Null / no value (for `IS NULL`, `IS NOT NULL`).
    Null,
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(values: Vec<i64>) -> Self {
        Self::IntegerList(values)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::StringList(values)
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column or field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Shorthand for a case-insensitive LIKE filter.
    pub fn ilike(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOp::ILike, FilterValue::String(pattern.into()))
    }

    /// Shorthand for an `IN` filter.
    pub fn is_in(field: impl Into<String>, values: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOp::In, values)
    }

    /// Shorthand for an `IS NULL` filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, FilterValue::Null)
    }
}

/// A conjunction of filter conditions. An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    fields: Vec<FilterField>,
}

impl Filter {
    /// A filter that matches every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Start a filter from a single condition.
    pub fn by(field: FilterField) -> Self {
        Self {
            fields: vec![field],
        }
    }

    /// Start a filter from a single equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::by(FilterField::eq(field, value))
    }

    /// Add another condition.
    pub fn and(mut self, field: FilterField) -> Self {
        self.fields.push(field);
        self
    }

    /// Append every condition of `other`.
    pub fn merge(mut self, other: Filter) -> Self {
        self.fields.extend(other.fields);
        self
    }

    /// The conditions in this filter.
    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    /// Whether this filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_all() {
        assert!(Filter::all().is_empty());
    }

    #[test]
    fn test_filter_conjunction() {
        let filter = Filter::eq("Surname", "Smith").and(FilterField::ilike("FirstName", "jo%"));
        assert_eq!(filter.fields().len(), 2);
        assert_eq!(filter.fields()[0].op, FilterOp::Eq);
        assert_eq!(filter.fields()[1].op, FilterOp::ILike);
    }

    #[test]
    fn test_merge_keeps_order() {
        let merged = Filter::eq("CustomerId", 1_i64).merge(Filter::eq("ProductId", 2_i64));
        let fields: Vec<&str> = merged.fields().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["CustomerId", "ProductId"]);
    }

    #[test]
    fn test_unary_operators() {
        assert!(FilterOp::IsNull.is_unary());
        assert!(FilterOp::IsNotNull.is_unary());
        assert!(!FilterOp::Eq.is_unary());
        assert_eq!(FilterOp::Ne.as_sql(), "<>");
    }
}
