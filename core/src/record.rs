use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Caller-supplied, externally meaningful node key.
pub type Identifier = String;

/// Open-ended property bag. Keys iterate in sorted order.
pub type Properties = BTreeMap<String, serde_json::Value>;

/// A node as handed over by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: Identifier,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub properties: Properties,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A directed edge as handed over by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source_id: Identifier,
    pub target_id: Identifier,
    #[serde(rename = "type")]
    pub edge_type: String,
    #[serde(default)]
    pub properties: Properties,
}

impl EdgeRecord {
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        edge_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            edge_type: edge_type.into(),
            properties: Properties::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Identity used for back-projection. Properties are not part of it.
    pub fn key(&self) -> EdgeKey<'_> {
        EdgeKey {
            source_id: &self.source_id,
            target_id: &self.target_id,
            edge_type: &self.edge_type,
        }
    }
}

/// Borrowed `(source_id, target_id, type)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey<'a> {
    pub source_id: &'a str,
    pub target_id: &'a str,
    pub edge_type: &'a str,
}
