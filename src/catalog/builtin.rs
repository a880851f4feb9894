use crate::constants::{FILTER_CATEGORY, GROUP_FILTER_ID, JPQL_FILTER_ID, PROPERTY_FILTER_ID};
use crate::filter::{GroupFilter, JpqlFilter, PropertyFilter};

use super::{ComponentDescriptor, DescribedComponent, PropertyDescriptor, PropertyKind};

const CAPTION_POSITIONS: &[&str] = &["top", "left"];
const PARAMETER_CLASSES: &[&str] = &["string", "integer", "double", "boolean", "date", "date_time", "uuid"];

pub(super) fn descriptors() -> Vec<ComponentDescriptor> {
    vec![
        PropertyFilter::descriptor(),
        JpqlFilter::descriptor(),
        GroupFilter::descriptor(),
    ]
}

fn caption_properties() -> Vec<PropertyDescriptor> {
    vec![
        PropertyDescriptor::new("caption", PropertyKind::String),
        PropertyDescriptor::new("caption_position", PropertyKind::Enumeration)
            .default_value("top")
            .options(CAPTION_POSITIONS),
    ]
}

fn capabilities(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

impl DescribedComponent for PropertyFilter {
    fn descriptor() -> ComponentDescriptor {
        let mut properties = vec![
            PropertyDescriptor::new("property", PropertyKind::PropertyPath).required(),
            PropertyDescriptor::new("operation", PropertyKind::Enumeration)
                .default_value("equal")
                .options(&[
                    "equal",
                    "not_equal",
                    "greater",
                    "greater_or_equal",
                    "less",
                    "less_or_equal",
                    "contains",
                    "not_contains",
                    "starts_with",
                    "ends_with",
                    "is_set",
                    "in_list",
                    "not_in_list",
                ]),
        ];
        properties.extend(caption_properties());

        ComponentDescriptor {
            id: PROPERTY_FILTER_ID.to_string(),
            name: "Property filter".to_string(),
            category: FILTER_CATEGORY.to_string(),
            icon: "icons/property-filter.svg".to_string(),
            capabilities: capabilities(&["has_caption", "supports_caption_position"]),
            properties,
        }
    }
}

impl DescribedComponent for JpqlFilter {
    fn descriptor() -> ComponentDescriptor {
        let mut properties = vec![
            PropertyDescriptor::new("where", PropertyKind::Jpql).required(),
            PropertyDescriptor::new("join", PropertyKind::Jpql),
            PropertyDescriptor::new("parameter_class", PropertyKind::Enumeration).options(PARAMETER_CLASSES),
        ];
        properties.extend(caption_properties());

        ComponentDescriptor {
            id: JPQL_FILTER_ID.to_string(),
            name: "JPQL filter".to_string(),
            category: FILTER_CATEGORY.to_string(),
            icon: "icons/jpql-filter.svg".to_string(),
            capabilities: capabilities(&["has_caption", "supports_caption_position"]),
            properties,
        }
    }
}

impl DescribedComponent for GroupFilter {
    fn descriptor() -> ComponentDescriptor {
        ComponentDescriptor {
            id: GROUP_FILTER_ID.to_string(),
            name: "Group filter".to_string(),
            category: FILTER_CATEGORY.to_string(),
            icon: "icons/group-filter.svg".to_string(),
            capabilities: capabilities(&["has_caption", "collapsible", "supports_columns_count"]),
            properties: vec![
                PropertyDescriptor::new("operation", PropertyKind::Enumeration)
                    .required()
                    .default_value("and")
                    .options(&["and", "or"]),
                PropertyDescriptor::new("caption", PropertyKind::String),
                PropertyDescriptor::new("operation_caption_visible", PropertyKind::Boolean).default_value("true"),
                PropertyDescriptor::new("collapsible", PropertyKind::Boolean).default_value("false"),
                PropertyDescriptor::new("expanded", PropertyKind::Boolean).default_value("true"),
                PropertyDescriptor::new("columns_count", PropertyKind::Integer).default_value("1"),
            ],
        }
    }
}
