//! Feature namespaces and their enable flags.
//!
//! Every tool belongs to exactly one [`Feature`]. The [`FeatureRegistry`] is
//! built once at startup from configuration and CLI flags and handed to the
//! server, which mounts the tool router of each enabled feature.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::McpConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Deals,
    /// Notes and the comments attached to them
    Notes,
    Pipelines,
    Users,
}

/// Descriptive metadata shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Deals,
        Feature::Notes,
        Feature::Pipelines,
        Feature::Users,
    ];

    /// Key used in configuration (`[features.<key>]`) and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Feature::Deals => "deals",
            Feature::Notes => "notes",
            Feature::Pipelines => "pipelines",
            Feature::Users => "users",
        }
    }

    pub fn metadata(&self) -> FeatureMetadata {
        match self {
            Feature::Deals => FeatureMetadata {
                name: "Deals",
                description: "Tools for managing deal entities in Pipedrive",
                version: "1.0.0",
            },
            Feature::Notes => FeatureMetadata {
                name: "Notes",
                description: "Tools for managing notes and note comments in Pipedrive (API v1)",
                version: "1.0.0",
            },
            Feature::Pipelines => FeatureMetadata {
                name: "Pipelines",
                description: "Tools for listing pipelines and stages in Pipedrive",
                version: "1.0.0",
            },
            Feature::Users => FeatureMetadata {
                name: "Users",
                description: "Tools for retrieving user information from Pipedrive",
                version: "1.0.0",
            },
        }
    }

    pub fn tool_names(&self) -> &'static [&'static str] {
        match self {
            Feature::Deals => &[
                "deal_create",
                "deal_get",
                "deal_update",
                "deal_delete",
                "deal_list",
                "deal_search",
                "deal_label_list",
                "deal_label_create",
                "deal_product_add",
                "deal_product_update",
                "deal_product_delete",
                "deal_product_list",
            ],
            Feature::Notes => &[
                "note_create",
                "note_get",
                "note_update",
                "note_delete",
                "note_list",
                "comment_add",
                "comment_get",
                "comment_update",
                "comment_delete",
                "comment_list",
            ],
            Feature::Pipelines => &["pipeline_list", "pipeline_get", "stage_list", "stage_get"],
            Feature::Users => &["user_get", "user_list", "user_me"],
        }
    }

    /// Feature owning a tool, if any.
    pub fn for_tool(tool: &str) -> Option<Feature> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.tool_names().contains(&tool))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Feature::ALL
            .into_iter()
            .find(|feature| feature.key() == key)
            .ok_or_else(|| {
                let valid: Vec<&str> = Feature::ALL.iter().map(Feature::key).collect();
                format!("Unknown feature '{s}'. Must be one of: {}", valid.join(", "))
            })
    }
}

/// Enable flag per feature. Features default to enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRegistry {
    flags: BTreeMap<Feature, bool>,
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::all_enabled()
    }
}

impl FeatureRegistry {
    pub fn all_enabled() -> Self {
        Self {
            flags: Feature::ALL.into_iter().map(|f| (f, true)).collect(),
        }
    }

    /// Apply `[features.<name>] enabled = ...` from configuration.
    pub fn from_config(config: &McpConfig) -> Self {
        let mut registry = Self::all_enabled();
        for (key, toggle) in &config.features {
            match key.parse::<Feature>() {
                Ok(feature) => registry.set_enabled(feature, toggle.enabled),
                Err(e) => warn!(feature = %key, error = %e, "Ignoring unknown feature in configuration"),
            }
        }
        registry
    }

    pub fn set_enabled(&mut self, feature: Feature, enabled: bool) {
        self.flags.insert(feature, enabled);
    }

    pub fn disable(&mut self, feature: Feature) {
        self.set_enabled(feature, false);
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.flags.get(&feature).copied().unwrap_or(false)
    }

    pub fn enabled_features(&self) -> Vec<Feature> {
        self.flags
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(feature, _)| *feature)
            .collect()
    }

    /// Names of every tool the server should expose.
    pub fn enabled_tools(&self) -> Vec<&'static str> {
        self.enabled_features()
            .iter()
            .flat_map(|feature| feature.tool_names().iter().copied())
            .collect()
    }

    pub fn is_tool_enabled(&self, tool: &str) -> bool {
        Feature::for_tool(tool).is_some_and(|feature| self.is_enabled(feature))
    }

    pub fn log_summary(&self) {
        for feature in Feature::ALL {
            let metadata = feature.metadata();
            info!(
                feature = feature.key(),
                name = metadata.name,
                version = metadata.version,
                enabled = self.is_enabled(feature),
                tools = feature.tool_names().len(),
                "Feature registered"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureToggle;
    use std::collections::HashSet;

    #[test]
    fn test_all_features_enabled_by_default() {
        let registry = FeatureRegistry::default();
        assert_eq!(registry.enabled_features(), Feature::ALL.to_vec());
        assert_eq!(registry.enabled_tools().len(), 29);
    }

    #[test]
    fn test_tool_names_are_unique_across_features() {
        let mut seen = HashSet::new();
        for feature in Feature::ALL {
            for name in feature.tool_names() {
                assert!(seen.insert(*name), "duplicate tool name {name}");
            }
        }
    }

    #[test]
    fn test_disable_removes_tools() {
        let mut registry = FeatureRegistry::all_enabled();
        registry.disable(Feature::Deals);
        assert!(!registry.is_enabled(Feature::Deals));
        assert!(!registry.is_tool_enabled("deal_create"));
        assert!(registry.is_tool_enabled("note_create"));
        assert!(!registry.enabled_tools().contains(&"deal_list"));
    }

    #[test]
    fn test_comments_belong_to_notes() {
        assert_eq!(Feature::for_tool("comment_add"), Some(Feature::Notes));
        assert_eq!(Feature::for_tool("unknown_tool"), None);
    }

    #[test]
    fn test_parse_feature() {
        assert_eq!("Deals".parse::<Feature>().unwrap(), Feature::Deals);
        assert_eq!(" users ".parse::<Feature>().unwrap(), Feature::Users);
        let err = "leads".parse::<Feature>().unwrap_err();
        assert!(err.contains("deals, notes, pipelines, users"));
    }

    #[test]
    fn test_from_config_ignores_unknown_keys() {
        let mut config = McpConfig::default();
        config
            .features
            .insert("pipelines".to_string(), FeatureToggle { enabled: false });
        config
            .features
            .insert("leads".to_string(), FeatureToggle { enabled: false });

        let registry = FeatureRegistry::from_config(&config);
        assert!(!registry.is_enabled(Feature::Pipelines));
        assert_eq!(
            registry.enabled_features(),
            vec![Feature::Deals, Feature::Notes, Feature::Users]
        );
    }

    #[test]
    fn test_metadata() {
        let deals = Feature::Deals.metadata();
        assert_eq!(deals.name, "Deals");
        assert_eq!(deals.description, "Tools for managing deal entities in Pipedrive");
        assert_eq!(deals.version, "1.0.0");
    }
}
