//! Query conditions produced by filter components.
//!
//! A [`Condition`] is an in-memory predicate tree. Leaf conditions describe a
//! single property comparison or a raw JPQL fragment; logical conditions combine
//! children under AND/OR. Conditions carry no rendering logic of their own, the
//! [`crate::query`] layer turns them into query text.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod jpql;

pub use jpql::JpqlCondition;

/// Combinator used by logical conditions and group filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    And,
    Or,
}

impl Operation {
    /// Keyword used when rendering the combinator into a query
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Operation::And => "and",
            Operation::Or => "or",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl std::str::FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Operation::And),
            "or" => Ok(Operation::Or),
            other => Err(format!("unknown operation '{}', expected 'and' or 'or'", other)),
        }
    }
}

/// Comparison applied by a property condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOperation {
    #[default]
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    /// Value is a boolean: `true` means "is not null", `false` means "is null"
    IsSet,
    InList,
    NotInList,
}

impl PropertyOperation {
    /// Whether the operation expects a [`ParameterValue::List`]
    #[must_use]
    pub fn is_collection(self) -> bool {
        matches!(self, PropertyOperation::InList | PropertyOperation::NotInList)
    }

    /// Whether the operation matches string fragments with wildcards
    #[must_use]
    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            PropertyOperation::Contains
                | PropertyOperation::NotContains
                | PropertyOperation::StartsWith
                | PropertyOperation::EndsWith
        )
    }
}

/// Type tag of a bound parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterClass {
    String,
    Integer,
    Double,
    Boolean,
    Date,
    DateTime,
    Uuid,
}

impl fmt::Display for ParameterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterClass::String => "string",
            ParameterClass::Integer => "integer",
            ParameterClass::Double => "double",
            ParameterClass::Boolean => "boolean",
            ParameterClass::Date => "date",
            ParameterClass::DateTime => "date_time",
            ParameterClass::Uuid => "uuid",
        };
        f.write_str(name)
    }
}

/// Value bound to a condition parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    List(Vec<ParameterValue>),
}

impl ParameterValue {
    /// Type tag of a scalar value. Lists report `None`; see [`Self::matches_class`].
    #[must_use]
    pub fn class(&self) -> Option<ParameterClass> {
        match self {
            ParameterValue::String(_) => Some(ParameterClass::String),
            ParameterValue::Integer(_) => Some(ParameterClass::Integer),
            ParameterValue::Double(_) => Some(ParameterClass::Double),
            ParameterValue::Boolean(_) => Some(ParameterClass::Boolean),
            ParameterValue::Date(_) => Some(ParameterClass::Date),
            ParameterValue::DateTime(_) => Some(ParameterClass::DateTime),
            ParameterValue::Uuid(_) => Some(ParameterClass::Uuid),
            ParameterValue::List(_) => None,
        }
    }

    /// True when a scalar has the given class, or every list element does
    #[must_use]
    pub fn matches_class(&self, class: ParameterClass) -> bool {
        match self {
            ParameterValue::List(items) => items.iter().all(|item| item.class() == Some(class)),
            scalar => scalar.class() == Some(class),
        }
    }

    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, ParameterValue::List(_))
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::String(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Double(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Boolean(value)
    }
}

impl From<Uuid> for ParameterValue {
    fn from(value: Uuid) -> Self {
        ParameterValue::Uuid(value)
    }
}

impl From<NaiveDate> for ParameterValue {
    fn from(value: NaiveDate) -> Self {
        ParameterValue::Date(value)
    }
}

/// Comparison of one entity property against a bound parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyCondition {
    /// Dotted property path relative to the query entity, e.g. `customer.name`
    pub property: String,
    pub operation: PropertyOperation,
    pub parameter_name: String,
    /// `None` means the filter has no value yet; query builders skip it
    pub parameter_value: Option<ParameterValue>,
}

impl PropertyCondition {
    pub fn new(
        property: impl Into<String>,
        operation: PropertyOperation,
        parameter_name: impl Into<String>,
        parameter_value: Option<ParameterValue>,
    ) -> Self {
        Self {
            property: property.into(),
            operation,
            parameter_name: parameter_name.into(),
            parameter_value,
        }
    }
}

/// AND/OR over child conditions, in evaluation order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicalCondition {
    pub operation: Operation,
    pub conditions: Vec<Condition>,
}

impl LogicalCondition {
    pub fn new(operation: Operation, conditions: Vec<Condition>) -> Self {
        Self { operation, conditions }
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Self::new(Operation::And, conditions)
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Self::new(Operation::Or, conditions)
    }

    pub fn add(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Empty when no child contributes a predicate
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.iter().all(Condition::is_empty)
    }
}

/// A node of the condition tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Property(PropertyCondition),
    Jpql(JpqlCondition),
    Logical(LogicalCondition),
}

impl Condition {
    /// The neutral condition: an AND with no children, which filters nothing
    #[must_use]
    pub fn neutral() -> Self {
        Condition::Logical(LogicalCondition::default())
    }

    pub fn and(conditions: Vec<Condition>) -> Self {
        Condition::Logical(LogicalCondition::and(conditions))
    }

    pub fn or(conditions: Vec<Condition>) -> Self {
        Condition::Logical(LogicalCondition::or(conditions))
    }

    pub fn logical(operation: Operation, conditions: Vec<Condition>) -> Self {
        Condition::Logical(LogicalCondition::new(operation, conditions))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Condition::Logical(logical) => logical.is_empty(),
            Condition::Property(_) | Condition::Jpql(_) => false,
        }
    }

    #[must_use]
    pub fn as_logical(&self) -> Option<&LogicalCondition> {
        match self {
            Condition::Logical(logical) => Some(logical),
            _ => None,
        }
    }
}

impl From<PropertyCondition> for Condition {
    fn from(condition: PropertyCondition) -> Self {
        Condition::Property(condition)
    }
}

impl From<JpqlCondition> for Condition {
    fn from(condition: JpqlCondition) -> Self {
        Condition::Jpql(condition)
    }
}

impl From<LogicalCondition> for Condition {
    fn from(condition: LogicalCondition) -> Self {
        Condition::Logical(condition)
    }
}
