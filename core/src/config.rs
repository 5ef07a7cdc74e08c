//! Assembly settings.
//!
//! Every field has a default, so an empty document is a valid config.
//! Load with [`AssemblyConfig::from_toml`] or [`AssemblyConfig::from_json`],
//! then call [`AssemblyConfig::validate`] before use.

use serde::{Deserialize, Serialize};

use crate::builder::DanglingEdgePolicy;
use crate::error::ConfigError;
use crate::graph::TraversalDirection;
use crate::report::DEFAULT_COLUMN_GAP;
use crate::traversal::DEFAULT_RADIUS;

/// Hard ceiling for `max_radius`.
pub const RADIUS_LIMIT: u32 = 1024;

/// Widest column gap a report may ask for.
pub const GAP_LIMIT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// What the builder does with an edge whose endpoint is unknown.
    pub dangling_edges: DanglingEdgePolicy,

    /// Radius used when a caller does not pass one.
    pub neighborhood_radius: u32,

    pub neighborhood_direction: TraversalDirection,

    pub path_direction: TraversalDirection,

    /// Spaces after the widest cell of each report column.
    pub report_column_gap: usize,

    /// Upper bound on any requested neighborhood radius.
    pub max_radius: u32,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            dangling_edges: DanglingEdgePolicy::default(),
            neighborhood_radius: DEFAULT_RADIUS,
            neighborhood_direction: TraversalDirection::Both,
            path_direction: TraversalDirection::Outgoing,
            report_column_gap: DEFAULT_COLUMN_GAP,
            max_radius: 100,
        }
    }
}

impl AssemblyConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_radius", self.max_radius as u64, 1, RADIUS_LIMIT as u64)?;
        check_range(
            "neighborhood_radius",
            self.neighborhood_radius as u64,
            0,
            self.max_radius as u64,
        )?;
        check_range("report_column_gap", self.report_column_gap as u64, 0, GAP_LIMIT as u64)?;
        Ok(())
    }

    /// `requested` if given, else the configured default; either way capped
    /// at `max_radius`.
    pub fn effective_radius(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.neighborhood_radius)
            .min(self.max_radius)
    }
}

fn check_range(name: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AssemblyConfig::default();
        assert_eq!(config.dangling_edges, DanglingEdgePolicy::Reject);
        assert_eq!(config.neighborhood_radius, 1);
        assert_eq!(config.neighborhood_direction, TraversalDirection::Both);
        assert_eq!(config.path_direction, TraversalDirection::Outgoing);
        assert_eq!(config.report_column_gap, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_documents_are_default() {
        assert_eq!(AssemblyConfig::from_toml("").unwrap(), AssemblyConfig::default());
        assert_eq!(AssemblyConfig::from_json("{}").unwrap(), AssemblyConfig::default());
    }

    #[test]
    fn test_from_toml() {
        let config = AssemblyConfig::from_toml(
            r#"
            dangling_edges = "skip"
            neighborhood_radius = 2
            neighborhood_direction = "out"
            path_direction = "both"
            report_column_gap = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.dangling_edges, DanglingEdgePolicy::Skip);
        assert_eq!(config.neighborhood_radius, 2);
        assert_eq!(config.neighborhood_direction, TraversalDirection::Outgoing);
        assert_eq!(config.path_direction, TraversalDirection::Both);
        assert_eq!(config.report_column_gap, 1);
        assert_eq!(config.max_radius, 100);
    }

    #[test]
    fn test_from_json() {
        let config =
            AssemblyConfig::from_json(r#"{"neighborhood_direction": "incoming", "max_radius": 8}"#)
                .unwrap();
        assert_eq!(config.neighborhood_direction, TraversalDirection::Incoming);
        assert_eq!(config.max_radius, 8);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            AssemblyConfig::from_toml("neighborhood_direction = \"sideways\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AssemblyConfig::from_json("{\"dangling_edges\": \"ignore\"}"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AssemblyConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_ranges() {
        let config = AssemblyConfig {
            max_radius: 0,
            ..AssemblyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { name: "max_radius", .. })
        ));

        let config = AssemblyConfig {
            neighborhood_radius: 5,
            max_radius: 3,
            ..AssemblyConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { name: "neighborhood_radius", value: 5, .. })
        ));

        let config = AssemblyConfig {
            report_column_gap: 65,
            ..AssemblyConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "report_column_gap must be within 0..=64, got 65");
    }

    #[test]
    fn test_effective_radius() {
        let config = AssemblyConfig {
            neighborhood_radius: 2,
            max_radius: 10,
            ..AssemblyConfig::default()
        };
        assert_eq!(config.effective_radius(None), 2);
        assert_eq!(config.effective_radius(Some(0)), 0);
        assert_eq!(config.effective_radius(Some(50)), 10);
    }
}
