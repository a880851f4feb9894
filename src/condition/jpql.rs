use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ParameterValue;

/// Raw JPQL fragment contributed by a JPQL filter.
///
/// `where_clause` and `join` may contain the `{E}` entity alias token, which is
/// left untouched here and substituted by the query builder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JpqlCondition {
    #[serde(rename = "where")]
    pub where_clause: String,
    pub join: Option<String>,
    pub parameters: BTreeMap<String, ParameterValue>,
}

impl JpqlCondition {
    pub fn new(where_clause: impl Into<String>, join: Option<String>) -> Self {
        Self {
            where_clause: where_clause.into(),
            join,
            parameters: BTreeMap::new(),
        }
    }

    /// Bind a named parameter referenced as `:name` in the fragment
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: ParameterValue) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }
}
