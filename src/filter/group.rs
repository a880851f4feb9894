use crate::condition::{Condition, Operation};

use super::{Collapsible, FilterComponent, FilterCore, FilterError, FilterId, FilterState, HasCaption, LogicalFilterComponent, SupportsColumnsCount};

/// Visual settings of a group filter, kept apart from its condition model
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPresentation {
    pub caption: Option<String>,
    pub operation_caption_visible: bool,
    pub collapsible: bool,
    pub expanded: bool,
    pub columns_count: u16,
}

impl Default for GroupPresentation {
    fn default() -> Self {
        Self {
            caption: None,
            operation_caption_visible: true,
            collapsible: false,
            expanded: true,
            columns_count: 1,
        }
    }
}

/// Composite filter combining its children under AND/OR.
///
/// The children list and the aggregated condition are maintained by the
/// [`FilterTree`](super::FilterTree) that owns the group: every add, remove or
/// operation change rebuilds the condition before the call returns.
#[derive(Debug)]
pub struct GroupFilter {
    pub(crate) core: FilterCore,
    operation: Operation,
    children: Vec<FilterId>,
    condition: Result<Condition, FilterError>,
    presentation: GroupPresentation,
}

impl GroupFilter {
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            core: FilterCore::new(FilterState::Configured),
            operation,
            children: Vec::new(),
            condition: Ok(Condition::logical(operation, Vec::new())),
            presentation: GroupPresentation::default(),
        }
    }

    #[must_use]
    pub fn presentation(&self) -> &GroupPresentation {
        &self.presentation
    }

    pub fn set_operation_caption_visible(&mut self, visible: bool) {
        self.presentation.operation_caption_visible = visible;
    }

    #[must_use]
    pub fn is_operation_caption_visible(&self) -> bool {
        self.presentation.operation_caption_visible
    }

    #[must_use]
    pub fn contains(&self, child: FilterId) -> bool {
        self.children.contains(&child)
    }

    pub(crate) fn set_operation(&mut self, operation: Operation) {
        self.operation = operation;
    }

    pub(crate) fn push_child(&mut self, child: FilterId) {
        self.children.push(child);
    }

    /// Returns false when `child` was not in the group
    pub(crate) fn remove_child(&mut self, child: FilterId) -> bool {
        let before = self.children.len();
        self.children.retain(|id| *id != child);
        before != self.children.len()
    }

    pub(crate) fn take_children(&mut self) -> Vec<FilterId> {
        std::mem::take(&mut self.children)
    }

    pub(crate) fn set_children(&mut self, children: Vec<FilterId>) {
        self.children = children;
    }

    /// Replace the aggregated condition with `operation` over `child_conditions`
    pub(crate) fn rebuild(&mut self, child_conditions: Result<Vec<Condition>, FilterError>) {
        self.condition = child_conditions.map(|conditions| Condition::logical(self.operation, conditions));
    }
}

impl Default for GroupFilter {
    fn default() -> Self {
        Self::new(Operation::default())
    }
}

impl FilterComponent for GroupFilter {
    fn core(&self) -> &FilterCore {
        &self.core
    }

    fn query_condition(&self) -> Result<Condition, FilterError> {
        self.condition.clone()
    }
}

impl LogicalFilterComponent for GroupFilter {
    fn operation(&self) -> Operation {
        self.operation
    }

    fn children(&self) -> &[FilterId] {
        &self.children
    }
}

impl HasCaption for GroupFilter {
    fn caption(&self) -> Option<&str> {
        self.presentation.caption.as_deref()
    }

    fn set_caption(&mut self, caption: Option<String>) {
        self.presentation.caption = caption;
    }
}

impl Collapsible for GroupFilter {
    fn is_collapsible(&self) -> bool {
        self.presentation.collapsible
    }

    fn set_collapsible(&mut self, collapsible: bool) {
        self.presentation.collapsible = collapsible;
        if !collapsible {
            self.presentation.expanded = true;
        }
    }

    fn is_expanded(&self) -> bool {
        self.presentation.expanded
    }

    fn set_expanded(&mut self, expanded: bool) {
        if self.presentation.collapsible {
            self.presentation.expanded = expanded;
        }
    }
}

impl SupportsColumnsCount for GroupFilter {
    fn columns_count(&self) -> u16 {
        self.presentation.columns_count
    }

    fn set_columns_count(&mut self, columns: u16) {
        self.presentation.columns_count = columns.max(1);
    }
}
