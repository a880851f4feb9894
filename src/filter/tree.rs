//! Arena owning every filter component of a screen.
//!
//! Components are addressed by [`FilterId`]. Groups hold the ordered ids of
//! their children and each child keeps the id of its container. All structural
//! changes go through the tree so the aggregated condition of every affected
//! group is rebuilt synchronously, from the changed component up to the root.

use std::collections::HashMap;

use crate::condition::{Condition, Operation};
use crate::config::FilterConfig;
use crate::query::DataLoader;

use super::{FilterComponent, FilterCore, FilterError, FilterId, FilterNode, GroupFilter, LogicalFilterComponent};

pub struct FilterTree {
    nodes: HashMap<FilterId, FilterNode>,
    default_operation: Operation,
}

impl FilterTree {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            default_operation: Operation::default(),
        }
    }

    /// Create a tree whose new groups use the configured default operation
    #[must_use]
    pub fn with_config(config: &FilterConfig) -> Self {
        Self {
            nodes: HashMap::new(),
            default_operation: config.default_operation,
        }
    }

    /// Register a component with the tree, returning its id
    pub fn insert(&mut self, component: impl Into<FilterNode>) -> FilterId {
        let node = component.into();
        let id = node.id();
        log::debug!("Registered {} {}", node.kind_name(), id);
        self.nodes.insert(id, node);
        id
    }

    /// Register an empty group using the tree's default operation
    pub fn new_group(&mut self) -> FilterId {
        self.insert(GroupFilter::new(self.default_operation))
    }

    pub fn get(&self, id: FilterId) -> Result<&FilterNode, FilterError> {
        self.nodes.get(&id).ok_or(FilterError::NotFound(id))
    }

    #[must_use]
    pub fn contains(&self, id: FilterId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent(&self, id: FilterId) -> Result<Option<FilterId>, FilterError> {
        Ok(self.get(id)?.parent())
    }

    pub fn children(&self, container: FilterId) -> Result<&[FilterId], FilterError> {
        Ok(self.group(container)?.children())
    }

    pub fn operation(&self, container: FilterId) -> Result<Operation, FilterError> {
        Ok(self.group(container)?.operation())
    }

    /// Current condition of any component; never stale
    pub fn query_condition(&self, id: FilterId) -> Result<Condition, FilterError> {
        self.get(id)?.query_condition()
    }

    /// Append `component` to the children of `container`.
    ///
    /// Adding a component that is already a child of `container` does nothing.
    /// Fails when the component is attached to another container, when the
    /// container is not a group, or when the component is the container or one
    /// of its ancestors.
    pub fn add(&mut self, container: FilterId, component: FilterId) -> Result<(), FilterError> {
        self.group(container)?;
        let parent = self.get(component)?.parent();

        match parent {
            Some(parent) if parent == container => return Ok(()),
            Some(parent) => {
                log::warn!("Rejected adding {} to {}: already attached to {}", component, container, parent);
                return Err(FilterError::AlreadyAttached { component, parent });
            }
            None => {}
        }

        if self.ancestors_and_self(container).any(|id| id == component) {
            log::warn!("Rejected adding {} to {}: cycle", component, container);
            return Err(FilterError::Cycle { component, container });
        }

        self.group_mut(container)?.push_child(component);
        self.node_mut(component)?.core_mut().attach(container);
        log::debug!("Added {} to group {}", component, container);

        self.refresh(container);
        Ok(())
    }

    /// Remove `component` from `container`; does nothing if it is not a child
    pub fn remove(&mut self, container: FilterId, component: FilterId) -> Result<(), FilterError> {
        if !self.group_mut(container)?.remove_child(component) {
            return Ok(());
        }

        if let Some(node) = self.nodes.get_mut(&component) {
            node.core_mut().detach();
        }
        log::debug!("Removed {} from group {}", component, container);

        self.refresh(container);
        Ok(())
    }

    /// Detach every child of `container`, leaving it with the neutral condition
    pub fn remove_all(&mut self, container: FilterId) -> Result<(), FilterError> {
        let children = self.group_mut(container)?.take_children();
        for child in &children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.core_mut().detach();
            }
        }
        if !children.is_empty() {
            log::debug!("Removed {} children from group {}", children.len(), container);
        }

        self.refresh(container);
        Ok(())
    }

    /// Change the combinator of `container` without touching its children
    pub fn set_operation(&mut self, container: FilterId, operation: Operation) -> Result<(), FilterError> {
        self.group_mut(container)?.set_operation(operation);
        log::debug!("Set operation of group {} to {}", container, operation);
        self.refresh(container);
        Ok(())
    }

    /// Mutate a component's own settings and propagate the change to its ancestors.
    ///
    /// ```
    /// use filterdeck::condition::ParameterValue;
    /// use filterdeck::filter::{FilterTree, PropertyFilter};
    /// use filterdeck::condition::PropertyOperation;
    ///
    /// let mut tree = FilterTree::new();
    /// let root = tree.new_group();
    /// let name = tree.insert(PropertyFilter::for_property("name", PropertyOperation::Contains).unwrap());
    /// tree.add(root, name).unwrap();
    ///
    /// tree.update(name, |node| node.as_property_mut()?.set_value(Some(ParameterValue::from("acme"))))
    ///     .unwrap()
    ///     .unwrap();
    /// assert!(!tree.query_condition(root).unwrap().is_empty());
    /// ```
    ///
    /// If the closure replaces the whole node, the replacement takes over the
    /// identity, container and children of the component it replaced.
    pub fn update<R>(&mut self, id: FilterId, f: impl FnOnce(&mut FilterNode) -> R) -> Result<R, FilterError> {
        let node = self.node_mut(id)?;
        let parent = node.parent();
        let state = node.state();
        let children = node.as_group().map(|group| group.children().to_vec());

        let result = f(&mut *node);
        if node.id() != id {
            self.adopt_replacement(FilterCore { id, parent, state }, children);
        }

        self.refresh(id);
        Ok(result)
    }

    /// Put the identity of a replaced node back onto the node now stored under its id
    fn adopt_replacement(&mut self, core: FilterCore, children: Option<Vec<FilterId>>) {
        let id = core.id;
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        log::warn!("Filter component {} was replaced during update; keeping its identity", id);
        *node.core_mut() = core;

        let orphans = match (node.as_group_mut().ok(), children) {
            (Some(group), Some(children)) => {
                group.set_children(children);
                Vec::new()
            }
            (Some(group), None) => {
                group.take_children();
                Vec::new()
            }
            (None, Some(children)) => children,
            (None, None) => Vec::new(),
        };

        for orphan in orphans {
            if let Some(node) = self.nodes.get_mut(&orphan) {
                node.core_mut().detach();
            }
        }
    }

    /// Drop a component that is not attached to any container, together with
    /// everything nested inside it
    pub fn dispose(&mut self, id: FilterId) -> Result<FilterNode, FilterError> {
        if self.get(id)?.is_attached() {
            return Err(FilterError::StillAttached(id));
        }

        let mut pending = vec![id];
        let mut root = None;
        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.remove(&current) else {
                continue;
            };
            if let Some(group) = node.as_group() {
                pending.extend_from_slice(group.children());
            }
            if current == id {
                root = Some(node);
            }
        }
        log::debug!("Disposed filter component {}", id);

        root.ok_or(FilterError::NotFound(id))
    }

    /// Hand the condition of `root` to a data loader; an empty condition clears its filter
    pub fn apply(&self, root: FilterId, loader: &mut dyn DataLoader) -> Result<(), FilterError> {
        let condition = self.query_condition(root)?;
        if condition.is_empty() {
            loader.set_condition(None);
        } else {
            loader.set_condition(Some(condition));
        }
        Ok(())
    }

    fn group(&self, id: FilterId) -> Result<&GroupFilter, FilterError> {
        self.get(id)?.as_group().ok_or(FilterError::NotLogical(id))
    }

    fn group_mut(&mut self, id: FilterId) -> Result<&mut GroupFilter, FilterError> {
        self.node_mut(id)?.as_group_mut()
    }

    fn node_mut(&mut self, id: FilterId) -> Result<&mut FilterNode, FilterError> {
        self.nodes.get_mut(&id).ok_or(FilterError::NotFound(id))
    }

    fn ancestors_and_self(&self, id: FilterId) -> impl Iterator<Item = FilterId> + '_ {
        std::iter::successors(Some(id), move |current| self.nodes.get(current).and_then(|node| node.parent()))
    }

    /// Rebuild `start` (if it is a group) and every group above it
    fn refresh(&mut self, start: FilterId) {
        let chain: Vec<FilterId> = self.ancestors_and_self(start).collect();
        for id in chain {
            self.rebuild_group(id);
        }
    }

    fn rebuild_group(&mut self, id: FilterId) {
        let Some(group) = self.nodes.get(&id).and_then(FilterNode::as_group) else {
            return;
        };

        let child_conditions: Result<Vec<Condition>, FilterError> = group
            .children()
            .iter()
            .map(|child| self.query_condition(*child))
            .collect();

        if let Some(FilterNode::Group(group)) = self.nodes.get_mut(&id) {
            group.rebuild(child_conditions);
        }
    }
}

impl Default for FilterTree {
    fn default() -> Self {
        Self::new()
    }
}
