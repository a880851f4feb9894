//! Constants used throughout the crate
//!
//! This module centralizes query tokens, generated-name prefixes and catalog
//! identifiers so they stay consistent between components and query building.

// Query tokens
pub const ENTITY_ALIAS_TOKEN: &str = "{E}";
pub const PARAMETER_PLACEHOLDER: char = '?';
pub const DEFAULT_ENTITY_ALIAS: &str = "e";

// Generated parameter name prefixes
pub const PROPERTY_PARAMETER_PREFIX: &str = "propertyFilter_";
pub const JPQL_PARAMETER_PREFIX: &str = "jpqlFilter_";

// Catalog identifiers
pub const FILTER_CATEGORY: &str = "Filter components";
pub const PROPERTY_FILTER_ID: &str = "propertyFilter";
pub const JPQL_FILTER_ID: &str = "jpqlFilter";
pub const GROUP_FILTER_ID: &str = "groupFilter";

// Configuration and logging
pub const APP_NAME: &str = "filterdeck";
pub const CONFIG_FILE_NAME: &str = "filterdeck.toml";
pub const LOG_FILE_NAME: &str = "filterdeck.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";
