use crate::condition::{Condition, ParameterValue, PropertyCondition, PropertyOperation};
use crate::constants::PROPERTY_PARAMETER_PREFIX;

use super::{CaptionPosition, FilterComponent, FilterCore, FilterError, FilterState, HasCaption, SupportsCaptionPosition};

/// Leaf filter comparing one entity property against a value
#[derive(Debug)]
pub struct PropertyFilter {
    pub(crate) core: FilterCore,
    property: Option<String>,
    operation: PropertyOperation,
    value: Option<ParameterValue>,
    parameter_name: String,
    caption: Option<String>,
    caption_position: CaptionPosition,
}

impl PropertyFilter {
    #[must_use]
    pub fn new() -> Self {
        let core = FilterCore::new(FilterState::Unbound);
        let parameter_name = format!("{}{}", PROPERTY_PARAMETER_PREFIX, core.id().simple());
        Self {
            core,
            property: None,
            operation: PropertyOperation::default(),
            value: None,
            parameter_name,
            caption: None,
            caption_position: CaptionPosition::default(),
        }
    }

    /// Shorthand for a configured filter on `property`
    pub fn for_property(property: &str, operation: PropertyOperation) -> Result<Self, FilterError> {
        let mut filter = Self::new();
        filter.set_property(property)?;
        filter.set_operation(operation);
        Ok(filter)
    }

    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Set the dotted property path this filter compares
    pub fn set_property(&mut self, property: &str) -> Result<(), FilterError> {
        let property = property.trim();
        if property.is_empty() || property.split('.').any(str::is_empty) {
            return Err(FilterError::MissingProperty(self.core.id()));
        }
        self.property = Some(property.to_string());
        self.core.mark_configured();
        Ok(())
    }

    #[must_use]
    pub fn operation(&self) -> PropertyOperation {
        self.operation
    }

    /// Switching to an operation that takes a different kind of value clears the value
    pub fn set_operation(&mut self, operation: PropertyOperation) {
        if value_shape(operation) != value_shape(self.operation) {
            self.value = None;
        }
        self.operation = operation;
    }

    #[must_use]
    pub fn value(&self) -> Option<&ParameterValue> {
        self.value.as_ref()
    }

    /// `None` clears the value; list values are only accepted by list operations
    pub fn set_value(&mut self, value: Option<ParameterValue>) -> Result<(), FilterError> {
        if let Some(ref value) = value {
            let actual = match value {
                ParameterValue::List(_) => "a list",
                ParameterValue::Boolean(_) => "a boolean",
                _ => "a single value",
            };
            let accepted = match value_shape(self.operation) {
                ValueShape::List => value.is_list(),
                ValueShape::Flag => matches!(value, ParameterValue::Boolean(_)),
                ValueShape::Single => !value.is_list(),
            };
            if !accepted {
                return Err(FilterError::UnsupportedValue {
                    id: self.core.id(),
                    operation: self.operation,
                    actual,
                });
            }
        }
        self.value = value;
        Ok(())
    }

    #[must_use]
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }
}

#[derive(PartialEq)]
enum ValueShape {
    Single,
    List,
    Flag,
}

fn value_shape(operation: PropertyOperation) -> ValueShape {
    if operation.is_collection() {
        ValueShape::List
    } else if operation == PropertyOperation::IsSet {
        ValueShape::Flag
    } else {
        ValueShape::Single
    }
}

impl Default for PropertyFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterComponent for PropertyFilter {
    fn core(&self) -> &FilterCore {
        &self.core
    }

    fn query_condition(&self) -> Result<Condition, FilterError> {
        let property = self.property.as_ref().ok_or(FilterError::MissingProperty(self.core.id()))?;
        Ok(PropertyCondition::new(
            property.clone(),
            self.operation,
            self.parameter_name.clone(),
            self.value.clone(),
        )
        .into())
    }
}

impl HasCaption for PropertyFilter {
    fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }
}

impl SupportsCaptionPosition for PropertyFilter {
    fn caption_position(&self) -> CaptionPosition {
        self.caption_position
    }

    fn set_caption_position(&mut self, position: CaptionPosition) {
        self.caption_position = position;
    }
}
