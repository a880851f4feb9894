//! Query-building side of the condition tree.
//!
//! A [`DataLoader`] receives the root condition of a filter tree. The
//! [`QueryBuilder`] renders a condition into a JPQL `where` fragment with its
//! bound parameters, and [`JpqlLoader`] merges that fragment into a base query.

use std::collections::BTreeMap;

use crate::condition::{Condition, JpqlCondition, ParameterValue, PropertyCondition, PropertyOperation};
use crate::config::FilterConfig;
use crate::constants::{DEFAULT_ENTITY_ALIAS, ENTITY_ALIAS_TOKEN};

/// Consumer of the condition produced by a filter tree
pub trait DataLoader {
    /// Replace the loader's filter condition; `None` removes filtering
    fn set_condition(&mut self, condition: Option<Condition>);

    fn condition(&self) -> Option<&Condition>;
}

/// A rendered `where` fragment with the joins and parameters it needs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedCondition {
    pub where_clause: String,
    pub joins: Vec<String>,
    pub parameters: BTreeMap<String, ParameterValue>,
}

/// Renders conditions into JPQL, substituting the `{E}` alias token
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    entity_alias: String,
}

impl QueryBuilder {
    pub fn new(entity_alias: impl Into<String>) -> Self {
        Self {
            entity_alias: entity_alias.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.entity_alias.clone())
    }

    #[must_use]
    pub fn entity_alias(&self) -> &str {
        &self.entity_alias
    }

    /// Render `condition`, or `None` when nothing in it filters
    #[must_use]
    pub fn render(&self, condition: &Condition) -> Option<RenderedCondition> {
        let mut rendered = RenderedCondition::default();
        let where_clause = self.render_node(condition, &mut rendered)?;
        rendered.where_clause = where_clause;
        Some(rendered)
    }

    fn render_node(&self, condition: &Condition, out: &mut RenderedCondition) -> Option<String> {
        match condition {
            Condition::Property(property) => self.render_property(property, out),
            Condition::Jpql(jpql) => self.render_jpql(jpql, out),
            Condition::Logical(logical) => {
                let parts: Vec<String> = logical
                    .conditions
                    .iter()
                    .filter_map(|child| self.render_node(child, out))
                    .collect();
                match parts.len() {
                    0 => None,
                    1 => parts.into_iter().next(),
                    _ => Some(format!("({})", parts.join(&format!(" {} ", logical.operation.keyword())))),
                }
            }
        }
    }

    fn render_property(&self, condition: &PropertyCondition, out: &mut RenderedCondition) -> Option<String> {
        let path = format!("{}.{}", self.entity_alias, condition.property);
        let parameter = &condition.parameter_name;

        if condition.operation == PropertyOperation::IsSet {
            return match condition.parameter_value {
                Some(ParameterValue::Boolean(true)) => Some(format!("{} is not null", path)),
                Some(ParameterValue::Boolean(false)) => Some(format!("{} is null", path)),
                _ => None,
            };
        }

        let value = condition.parameter_value.as_ref()?;
        let operator = match condition.operation {
            PropertyOperation::Equal => "=",
            PropertyOperation::NotEqual => "<>",
            PropertyOperation::Greater => ">",
            PropertyOperation::GreaterOrEqual => ">=",
            PropertyOperation::Less => "<",
            PropertyOperation::LessOrEqual => "<=",
            PropertyOperation::Contains | PropertyOperation::StartsWith | PropertyOperation::EndsWith => "like",
            PropertyOperation::NotContains => "not like",
            PropertyOperation::InList => "in",
            PropertyOperation::NotInList => "not in",
            PropertyOperation::IsSet => return None,
        };

        out.parameters
            .insert(parameter.clone(), pattern_value(condition.operation, value));
        Some(format!("{} {} :{}", path, operator, parameter))
    }

    fn render_jpql(&self, condition: &JpqlCondition, out: &mut RenderedCondition) -> Option<String> {
        if let Some(missing) = named_parameters(&condition.where_clause)
            .into_iter()
            .find(|name| !condition.parameters.contains_key(*name))
        {
            log::debug!("Skipping JPQL condition with unbound parameter :{}", missing);
            return None;
        }

        if let Some(join) = &condition.join {
            let join = self.substitute_alias(join);
            if !out.joins.contains(&join) {
                out.joins.push(join);
            }
        }
        for (name, value) in &condition.parameters {
            out.parameters.insert(name.clone(), value.clone());
        }
        Some(format!("({})", self.substitute_alias(&condition.where_clause)))
    }

    /// Replace every `{E}` token with the entity alias
    #[must_use]
    pub fn substitute_alias(&self, fragment: &str) -> String {
        fragment.replace(ENTITY_ALIAS_TOKEN, &self.entity_alias)
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ENTITY_ALIAS)
    }
}

/// Wrap string values of pattern operations in `%` wildcards
fn pattern_value(operation: PropertyOperation, value: &ParameterValue) -> ParameterValue {
    let ParameterValue::String(text) = value else {
        return value.clone();
    };
    let pattern = match operation {
        PropertyOperation::Contains | PropertyOperation::NotContains => format!("%{}%", text),
        PropertyOperation::StartsWith => format!("{}%", text),
        PropertyOperation::EndsWith => format!("%{}", text),
        _ => return value.clone(),
    };
    ParameterValue::String(pattern)
}

/// Names of the `:name` parameters referenced outside string literals
fn named_parameters(fragment: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut in_literal = false;
    let mut chars = fragment.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        match c {
            '\'' => in_literal = !in_literal,
            ':' if !in_literal => {
                let start = index + 1;
                let mut end = start;
                while let Some(&(next, c)) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    end = next + c.len_utf8();
                    chars.next();
                }
                if end > start {
                    names.push(&fragment[start..end]);
                }
            }
            _ => {}
        }
    }
    names
}

/// Data loader that merges its condition into a base JPQL query
#[derive(Debug, Clone)]
pub struct JpqlLoader {
    query: String,
    condition: Option<Condition>,
    builder: QueryBuilder,
}

/// Final query text and the parameters to bind
#[derive(Debug, Clone, PartialEq)]
pub struct LoadQuery {
    pub query: String,
    pub parameters: BTreeMap<String, ParameterValue>,
}

impl JpqlLoader {
    /// `query` is a base query such as `select e from app_Customer e`
    pub fn new(query: impl Into<String>, builder: QueryBuilder) -> Self {
        Self {
            query: query.into(),
            condition: None,
            builder,
        }
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Base query with joins appended and the condition merged into its `where`
    #[must_use]
    pub fn built_query(&self) -> LoadQuery {
        let rendered = self.condition.as_ref().and_then(|condition| self.builder.render(condition));
        let Some(rendered) = rendered else {
            return LoadQuery {
                query: self.query.clone(),
                parameters: BTreeMap::new(),
            };
        };

        let (body, tail) = split_tail(&self.query);
        let (head, existing_where) = split_where(body);
        let mut query = head.trim_end().to_string();
        for join in &rendered.joins {
            query.push(' ');
            query.push_str(join);
        }
        match existing_where {
            Some(existing) => {
                query.push_str(&format!(" where ({}) and {}", existing.trim(), rendered.where_clause));
            }
            None => {
                query.push_str(&format!(" where {}", rendered.where_clause));
            }
        }
        if let Some(tail) = tail {
            query.push(' ');
            query.push_str(tail.trim());
        }

        LoadQuery {
            query,
            parameters: rendered.parameters,
        }
    }
}

impl DataLoader for JpqlLoader {
    fn set_condition(&mut self, condition: Option<Condition>) {
        log::debug!("Loader condition {}", if condition.is_some() { "set" } else { "cleared" });
        self.condition = condition;
    }

    fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}

/// Split off a trailing `group by` or `order by` clause, keyword included
fn split_tail(query: &str) -> (&str, Option<&str>) {
    let lowered = query.to_ascii_lowercase();
    let index = [" group by ", " order by "]
        .iter()
        .filter_map(|keyword| lowered.find(keyword))
        .min();
    match index {
        Some(index) => (&query[..index], Some(&query[index + 1..])),
        None => (query, None),
    }
}

/// Split `query` at its top-level ` where ` keyword, if any
fn split_where(query: &str) -> (&str, Option<&str>) {
    let lowered = query.to_ascii_lowercase();
    match lowered.find(" where ") {
        Some(index) => (&query[..index], Some(&query[index + " where ".len()..])),
        None => (query, None),
    }
}
