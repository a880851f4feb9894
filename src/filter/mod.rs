//! Filter components and the tree that owns them.
//!
//! Leaf filters ([`PropertyFilter`], [`JpqlFilter`]) each produce one
//! [`Condition`]. A [`GroupFilter`] combines its children under AND/OR. Every
//! component lives in a [`FilterTree`], which is the only place attachment and
//! condition propagation happen.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::condition::{Condition, Operation, ParameterClass, PropertyOperation};

pub mod capabilities;
pub mod group;
pub mod jpql;
pub mod property;
pub mod tree;

pub use capabilities::{CaptionPosition, Collapsible, HasCaption, SupportsCaptionPosition, SupportsColumnsCount};
pub use group::{GroupFilter, GroupPresentation};
pub use jpql::JpqlFilter;
pub use property::PropertyFilter;
pub use tree::FilterTree;

/// Errors raised by filter components and the filter tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("Filter component not found: {0}")]
    NotFound(FilterId),

    #[error("Filter component {component} is already attached to {parent}; remove it first")]
    AlreadyAttached { component: FilterId, parent: FilterId },

    #[error("Filter component {0} is not a logical filter")]
    NotLogical(FilterId),

    #[error("Adding {component} to {container} would create a cycle")]
    Cycle { component: FilterId, container: FilterId },

    #[error("Filter component {0} is still attached to a container")]
    StillAttached(FilterId),

    #[error("JPQL filter {0} has no where clause")]
    BlankWhere(FilterId),

    #[error("JPQL filter {id} has {count} parameter placeholders, at most one is allowed")]
    TooManyPlaceholders { id: FilterId, count: usize },

    #[error("JPQL filter {0} uses a parameter placeholder but has no parameter class")]
    MissingParameterClass(FilterId),

    #[error("Filter {id} expects {expected} values, got {actual}")]
    ParameterTypeMismatch {
        id: FilterId,
        expected: ParameterClass,
        actual: String,
    },

    #[error("Property filter {id} with operation {operation:?} cannot take {actual}")]
    UnsupportedValue {
        id: FilterId,
        operation: PropertyOperation,
        actual: &'static str,
    },

    #[error("Property filter {0} has no property")]
    MissingProperty(FilterId),

    #[error("Filter component {id} is not a {expected}")]
    KindMismatch { id: FilterId, expected: &'static str },
}

/// Identity of a filter component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterId(Uuid);

impl FilterId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short form used in generated parameter names
    #[must_use]
    pub fn simple(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for FilterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a filter component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterState {
    /// Created but missing the settings it needs to produce a condition
    #[default]
    Unbound,
    /// Has its condition settings but is not inside a container
    Configured,
    /// Child of a group filter
    Attached,
    /// Removed from the container it was attached to
    Detached,
}

/// Identity, parent back-reference and lifecycle state shared by every component
#[derive(Debug)]
pub struct FilterCore {
    id: FilterId,
    parent: Option<FilterId>,
    state: FilterState,
}

impl FilterCore {
    pub(crate) fn new(state: FilterState) -> Self {
        Self {
            id: FilterId::new(),
            parent: None,
            state,
        }
    }

    #[must_use]
    pub fn id(&self) -> FilterId {
        self.id
    }

    pub(crate) fn mark_configured(&mut self) {
        if self.state == FilterState::Unbound {
            self.state = FilterState::Configured;
        }
    }

    pub(crate) fn attach(&mut self, parent: FilterId) {
        self.parent = Some(parent);
        self.state = FilterState::Attached;
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
        self.state = FilterState::Detached;
    }
}

/// A UI element contributing one condition to a query
pub trait FilterComponent {
    fn core(&self) -> &FilterCore;

    fn query_condition(&self) -> Result<Condition, FilterError>;

    fn id(&self) -> FilterId {
        self.core().id
    }

    /// Container this component is attached to, if any
    fn parent(&self) -> Option<FilterId> {
        self.core().parent
    }

    fn state(&self) -> FilterState {
        self.core().state
    }

    fn is_attached(&self) -> bool {
        self.core().parent.is_some()
    }
}

/// A filter combining child filters under one [`Operation`]
pub trait LogicalFilterComponent: FilterComponent {
    fn operation(&self) -> Operation;

    /// Child ids in insertion order
    fn children(&self) -> &[FilterId];
}

/// Any component stored in a [`FilterTree`]
#[derive(Debug)]
pub enum FilterNode {
    Property(PropertyFilter),
    Jpql(JpqlFilter),
    Group(GroupFilter),
}

impl FilterNode {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            FilterNode::Property(_) => "property filter",
            FilterNode::Jpql(_) => "JPQL filter",
            FilterNode::Group(_) => "group filter",
        }
    }

    pub fn as_property(&self) -> Option<&PropertyFilter> {
        match self {
            FilterNode::Property(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Result<&mut PropertyFilter, FilterError> {
        let id = self.id();
        match self {
            FilterNode::Property(filter) => Ok(filter),
            _ => Err(FilterError::KindMismatch {
                id,
                expected: "property filter",
            }),
        }
    }

    pub fn as_jpql(&self) -> Option<&JpqlFilter> {
        match self {
            FilterNode::Jpql(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn as_jpql_mut(&mut self) -> Result<&mut JpqlFilter, FilterError> {
        let id = self.id();
        match self {
            FilterNode::Jpql(filter) => Ok(filter),
            _ => Err(FilterError::KindMismatch {
                id,
                expected: "JPQL filter",
            }),
        }
    }

    pub fn as_group(&self) -> Option<&GroupFilter> {
        match self {
            FilterNode::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Result<&mut GroupFilter, FilterError> {
        let id = self.id();
        match self {
            FilterNode::Group(group) => Ok(group),
            _ => Err(FilterError::NotLogical(id)),
        }
    }

    pub(crate) fn core_mut(&mut self) -> &mut FilterCore {
        match self {
            FilterNode::Property(filter) => &mut filter.core,
            FilterNode::Jpql(filter) => &mut filter.core,
            FilterNode::Group(group) => &mut group.core,
        }
    }
}

impl FilterComponent for FilterNode {
    fn core(&self) -> &FilterCore {
        match self {
            FilterNode::Property(filter) => filter.core(),
            FilterNode::Jpql(filter) => filter.core(),
            FilterNode::Group(group) => group.core(),
        }
    }

    fn query_condition(&self) -> Result<Condition, FilterError> {
        match self {
            FilterNode::Property(filter) => filter.query_condition(),
            FilterNode::Jpql(filter) => filter.query_condition(),
            FilterNode::Group(group) => group.query_condition(),
        }
    }
}

impl From<PropertyFilter> for FilterNode {
    fn from(filter: PropertyFilter) -> Self {
        FilterNode::Property(filter)
    }
}

impl From<JpqlFilter> for FilterNode {
    fn from(filter: JpqlFilter) -> Self {
        FilterNode::Jpql(filter)
    }
}

impl From<GroupFilter> for FilterNode {
    fn from(group: GroupFilter) -> Self {
        FilterNode::Group(group)
    }
}
