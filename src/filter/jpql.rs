use once_cell::unsync::OnceCell;

use crate::condition::{Condition, JpqlCondition, ParameterClass, ParameterValue};
use crate::constants::{JPQL_PARAMETER_PREFIX, PARAMETER_PLACEHOLDER};

use super::{CaptionPosition, FilterComponent, FilterCore, FilterError, FilterState, HasCaption, SupportsCaptionPosition};

/// Leaf filter contributing a raw JPQL fragment.
///
/// The `where` fragment may contain one `?` placeholder, which is bound to the
/// filter's value under a generated parameter name. The `{E}` token stands for
/// the query entity alias and is left for the query builder to substitute.
#[derive(Debug)]
pub struct JpqlFilter {
    pub(crate) core: FilterCore,
    where_clause: Option<String>,
    join: Option<String>,
    parameter_class: Option<ParameterClass>,
    value: Option<ParameterValue>,
    parameter_name: String,
    caption: Option<String>,
    caption_position: CaptionPosition,
    cached: OnceCell<JpqlCondition>,
}

impl JpqlFilter {
    #[must_use]
    pub fn new() -> Self {
        let core = FilterCore::new(FilterState::Unbound);
        let parameter_name = format!("{}{}", JPQL_PARAMETER_PREFIX, core.id().simple());
        Self {
            core,
            where_clause: None,
            join: None,
            parameter_class: None,
            value: None,
            parameter_name,
            caption: None,
            caption_position: CaptionPosition::default(),
            cached: OnceCell::new(),
        }
    }

    /// Store the `where` and optional `join` fragments.
    ///
    /// Fails when `where` is blank or holds more than one placeholder. A blank
    /// `join` is treated as no join. The bound value is reshaped for the new
    /// fragment, or dropped when it no longer fits.
    pub fn set_condition(&mut self, where_clause: &str, join: Option<&str>) -> Result<(), FilterError> {
        let where_clause = where_clause.trim();
        if where_clause.is_empty() {
            return Err(FilterError::BlankWhere(self.core.id()));
        }

        let count = count_placeholders(where_clause);
        if count > 1 {
            return Err(FilterError::TooManyPlaceholders {
                id: self.core.id(),
                count,
            });
        }

        self.value = fit_value(self.value.take(), count, is_in_expression(where_clause));
        self.where_clause = Some(where_clause.to_string());
        self.join = join.map(str::trim).filter(|join| !join.is_empty()).map(str::to_string);
        self.core.mark_configured();
        self.invalidate();
        Ok(())
    }

    #[must_use]
    pub fn where_clause(&self) -> Option<&str> {
        self.where_clause.as_deref()
    }

    #[must_use]
    pub fn join(&self) -> Option<&str> {
        self.join.as_deref()
    }

    #[must_use]
    pub fn parameter_class(&self) -> Option<ParameterClass> {
        self.parameter_class
    }

    /// Change the bound value type; a value of another type is dropped
    pub fn set_parameter_class(&mut self, parameter_class: Option<ParameterClass>) {
        let keeps_value = match (&self.value, parameter_class) {
            (Some(value), Some(class)) => value.matches_class(class),
            _ => false,
        };
        if !keeps_value {
            self.value = None;
        }
        self.parameter_class = parameter_class;
        self.invalidate();
    }

    #[must_use]
    pub fn value(&self) -> Option<&ParameterValue> {
        self.value.as_ref()
    }

    /// Bind the placeholder value.
    ///
    /// The value must match the parameter class. With an `in ?` fragment a
    /// single value is wrapped into a one-element list; otherwise lists are
    /// rejected.
    pub fn set_value(&mut self, value: Option<ParameterValue>) -> Result<(), FilterError> {
        let value = match value {
            None => None,
            Some(value) => {
                let class = self.parameter_class.ok_or(FilterError::MissingParameterClass(self.core.id()))?;
                let in_expression = self.has_in_expression();
                let id = self.core.id();
                let mismatch = |actual: String| FilterError::ParameterTypeMismatch {
                    id,
                    expected: class,
                    actual,
                };

                if value.is_list() && !in_expression {
                    return Err(mismatch("a list".to_string()));
                }
                if !value.matches_class(class) {
                    let actual = value.class().map(|c| c.to_string()).unwrap_or_else(|| "mixed list".to_string());
                    return Err(mismatch(actual));
                }

                if in_expression && !value.is_list() {
                    Some(ParameterValue::List(vec![value]))
                } else {
                    Some(value)
                }
            }
        };

        self.value = value;
        self.invalidate();
        Ok(())
    }

    #[must_use]
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    /// Whether the placeholder is used as the right side of an `in` expression
    #[must_use]
    pub fn has_in_expression(&self) -> bool {
        self.where_clause.as_deref().is_some_and(is_in_expression)
    }

    fn invalidate(&mut self) {
        self.cached = OnceCell::new();
    }

    fn build_condition(&self) -> Result<JpqlCondition, FilterError> {
        let where_clause = self
            .where_clause
            .as_deref()
            .filter(|w| !w.trim().is_empty())
            .ok_or(FilterError::BlankWhere(self.core.id()))?;

        if count_placeholders(where_clause) == 0 {
            return Ok(JpqlCondition::new(where_clause, self.join.clone()));
        }

        if self.parameter_class.is_none() {
            return Err(FilterError::MissingParameterClass(self.core.id()));
        }

        let bound = bind_placeholder(where_clause, &format!(":{}", self.parameter_name));
        let mut condition = JpqlCondition::new(bound, self.join.clone());
        if let Some(value) = &self.value {
            condition = condition.with_parameter(self.parameter_name.clone(), value.clone());
        }
        Ok(condition)
    }
}

impl Default for JpqlFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterComponent for JpqlFilter {
    fn core(&self) -> &FilterCore {
        &self.core
    }

    fn query_condition(&self) -> Result<Condition, FilterError> {
        let condition = self.cached.get_or_try_init(|| self.build_condition())?;
        Ok(Condition::Jpql(condition.clone()))
    }
}

impl HasCaption for JpqlFilter {
    fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }
}

impl SupportsCaptionPosition for JpqlFilter {
    fn caption_position(&self) -> CaptionPosition {
        self.caption_position
    }

    fn set_caption_position(&mut self, position: CaptionPosition) {
        self.caption_position = position;
    }
}

/// Count `?` placeholders outside single-quoted string literals
fn count_placeholders(fragment: &str) -> usize {
    let mut in_literal = false;
    let mut count = 0;
    for c in fragment.chars() {
        match c {
            '\'' => in_literal = !in_literal,
            PARAMETER_PLACEHOLDER if !in_literal => count += 1,
            _ => {}
        }
    }
    count
}

/// Replace the first `?` outside string literals with `parameter`
fn bind_placeholder(fragment: &str, parameter: &str) -> String {
    let mut in_literal = false;
    let mut bound = String::with_capacity(fragment.len() + parameter.len());
    let mut replaced = false;
    for c in fragment.chars() {
        match c {
            '\'' => {
                in_literal = !in_literal;
                bound.push(c);
            }
            PARAMETER_PLACEHOLDER if !in_literal && !replaced => {
                bound.push_str(parameter);
                replaced = true;
            }
            _ => bound.push(c),
        }
    }
    bound
}

/// Reshape a bound value for a fragment with `placeholders` placeholders
fn fit_value(value: Option<ParameterValue>, placeholders: usize, in_expression: bool) -> Option<ParameterValue> {
    let value = value?;
    if placeholders == 0 {
        return None;
    }
    match value {
        ParameterValue::List(mut values) if !in_expression => {
            if values.len() == 1 {
                values.pop()
            } else {
                None
            }
        }
        value if in_expression && !value.is_list() => Some(ParameterValue::List(vec![value])),
        value => Some(value),
    }
}

fn is_in_expression(fragment: &str) -> bool {
    let normalized: Vec<String> = fragment
        .split_whitespace()
        .map(|token| token.to_ascii_lowercase())
        .collect();
    normalized.windows(2).any(|pair| pair[0] == "in" && (pair[1] == "?" || pair[1] == "(?)"))
        || normalized.iter().any(|token| token == "in(?)")
}
