//! filterdeck - composite filter components for server-side UI screens
//!
//! This library models the filter components a screen places above a data
//! list: leaf property and JPQL filters, and group filters combining them with
//! AND/OR. Components produce a condition tree that a data loader merges into
//! its query.
//!
//! # Modules
//!
//! * [`condition`] - Condition tree types
//! * [`filter`] - Filter components and the tree that owns them
//! * [`query`] - Data loader seam and JPQL rendering of conditions
//! * [`catalog`] - Design-time component descriptors
//! * [`config`] - Configuration management
//! * [`logger`] - Log setup

/// Design-time component catalog
pub mod catalog;

/// Condition tree produced by filter components
pub mod condition;

/// Configuration module for managing filter and logging settings
pub mod config;

/// Query tokens, generated-name prefixes and catalog ids
pub mod constants;

/// Filter components, capabilities and the filter tree
pub mod filter;

/// Logging setup on top of the `log` facade
pub mod logger;

/// Data loaders and JPQL query building
pub mod query;

pub use condition::{Condition, Operation};
pub use filter::{FilterComponent, FilterError, FilterId, FilterTree, LogicalFilterComponent};
