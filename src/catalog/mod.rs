//! Design-time component catalog.
//!
//! Every filter component type describes its design-time schema (icon,
//! category, editable properties) as a plain serializable
//! [`ComponentDescriptor`]. Descriptors are collected in a [`Catalog`]; the
//! process-wide instance returned by [`global`] is built once on first use and
//! queried by id.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod builtin;

/// Errors raised by catalog lookups and registration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Component not found in catalog: {0}")]
    NotFound(String),

    #[error("Component '{0}' is already registered")]
    Duplicate(String),
}

/// Value type of an editable component property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    String,
    Boolean,
    Integer,
    Enumeration,
    Jpql,
    PropertyPath,
}

/// Schema of one editable component property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<String>,
}

impl PropertyDescriptor {
    pub fn new(name: &str, kind: PropertyKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default_value: None,
            required: false,
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    #[must_use]
    pub fn options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| (*o).to_string()).collect();
        self
    }
}

/// Design-time schema of a component type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub id: String,
    pub name: String,
    pub category: String,
    pub icon: String,
    /// Capability traits the component implements, e.g. `has_caption`
    pub capabilities: Vec<String>,
    pub properties: Vec<PropertyDescriptor>,
}

impl ComponentDescriptor {
    pub fn property(&self, name: &str) -> Result<&PropertyDescriptor, CatalogError> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| CatalogError::NotFound(format!("{}.{}", self.id, name)))
    }
}

/// Component types that publish a design-time descriptor
pub trait DescribedComponent {
    fn descriptor() -> ComponentDescriptor;
}

/// Registry of component descriptors keyed by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: BTreeMap<String, ComponentDescriptor>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every built-in filter component
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for descriptor in builtin::descriptors() {
            if let Err(e) = catalog.register(descriptor) {
                log::error!("Skipping built-in component: {}", e);
            }
        }
        catalog
    }

    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), CatalogError> {
        if self.components.contains_key(&descriptor.id) {
            return Err(CatalogError::Duplicate(descriptor.id));
        }
        log::debug!("Registered component descriptor '{}'", descriptor.id);
        self.components.insert(descriptor.id.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&ComponentDescriptor, CatalogError> {
        self.components
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Descriptors ordered by id
    pub fn descriptors(&self) -> impl Iterator<Item = &ComponentDescriptor> {
        self.components.values()
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ComponentDescriptor> + 'a {
        self.components.values().filter(move |d| d.category == category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let descriptors: Vec<&ComponentDescriptor> = self.descriptors().collect();
        serde_json::to_string_pretty(&descriptors)
    }
}

static GLOBAL_CATALOG: Lazy<Catalog> = Lazy::new(Catalog::builtin);

/// Process-wide catalog of built-in components
pub fn global() -> &'static Catalog {
    &GLOBAL_CATALOG
}
