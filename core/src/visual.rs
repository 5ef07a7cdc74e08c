//! Viewer-ready node and edge lists.
//!
//! [`VisualGraph`] carries only what a force-directed front-end needs:
//! labels, hover text, colors, optional fixed coordinates. It serializes
//! to JSON with serde; drawing is somebody else's job.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::export::RecordSource;
use crate::query::render_value;
use crate::record::NodeRecord;

/// Longest rendered property value in a hover.
pub const PROPERTY_HOVER_LIMIT: usize = 120;

/// Longest complete hover text.
pub const HOVER_LIMIT: usize = 1000;

/// Horizontal offset of the pinned source and target.
pub const PIN_OFFSET: f64 = 500.0;

/// Marker size of a pinned node.
pub const PINNED_SIZE: u32 = 20;

#[derive(Debug, Clone, Default)]
pub struct VisualOptions {
    /// Node type to CSS color. Unlisted types get no color.
    pub type_colors: BTreeMap<String, String>,
    /// Identifier pinned on the left (or centered when there is no target).
    pub source: Option<String>,
    /// Identifier pinned on the right (or centered when there is no source).
    pub target: Option<String>,
}

impl VisualOptions {
    pub fn color(mut self, node_type: impl Into<String>, color: impl Into<String>) -> Self {
        self.type_colors.insert(node_type.into(), color.into());
        self
    }

    pub fn endpoints(mut self, source: Option<&str>, target: Option<&str>) -> Self {
        self.source = source.map(str::to_string);
        self.target = target.map(str::to_string);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub hover: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualEdge {
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub edge_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualGraph {
    pub directed: bool,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl VisualGraph {
    pub fn from_source(source: &impl RecordSource, options: &VisualOptions) -> Self {
        let nodes = source
            .node_records()
            .into_iter()
            .map(|record| visual_node(record, options))
            .collect();

        let edges = source
            .edge_records()
            .into_iter()
            .map(|record| VisualEdge {
                source_id: record.source_id.clone(),
                target_id: record.target_id.clone(),
                edge_type: record.edge_type.clone(),
            })
            .collect();

        Self {
            directed: true,
            nodes,
            edges,
        }
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn visual_node(record: &NodeRecord, options: &VisualOptions) -> VisualNode {
    let mut node = VisualNode {
        id: record.id.clone(),
        node_type: record.node_type.clone(),
        hover: hover_text(record),
        color: options.type_colors.get(&record.node_type).cloned(),
        size: None,
        x: record.properties.get("x").and_then(Value::as_f64),
        y: record.properties.get("y").and_then(Value::as_f64),
    };

    let is_source = options.source.as_deref() == Some(record.id.as_str());
    let is_target = options.target.as_deref() == Some(record.id.as_str());
    if is_source {
        node.x = Some(if options.target.is_some() { -PIN_OFFSET } else { 0.0 });
    }
    if is_target {
        node.x = Some(if options.source.is_some() { PIN_OFFSET } else { 0.0 });
    }
    if is_source || is_target {
        node.y = Some(0.0);
        node.size = Some(PINNED_SIZE);
    }
    node
}

/// Values a hover leaves out: nothing to show.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn hover_text(record: &NodeRecord) -> String {
    let lines: Vec<String> = record
        .properties
        .iter()
        .filter(|(_, v)| !is_blank(v))
        .filter_map(|(k, v)| {
            let text = render_value(Some(v));
            text.as_text()
                .map(|t| format!(" <b>{}:</b> {}", k, shorten(t, PROPERTY_HOVER_LIMIT)))
        })
        .collect();

    let hover = format!(
        "<b>id:</b>{}\n<b>type:</b>{}\n<b>properties:</b>\n{}",
        record.id,
        record.node_type,
        lines.join("\n")
    );
    shorten(&hover, HOVER_LIMIT)
}

/// Keep the head and tail of `text`, joined by `" ... "`, when it is longer
/// than `max_chars` characters.
pub fn shorten(text: &str, max_chars: usize) -> String {
    let len = text.chars().count();
    if len <= max_chars {
        return text.to_string();
    }
    let keep = (max_chars / 2).saturating_sub(3);
    let head: String = text.chars().take(keep).collect();
    let tail: String = text.chars().skip(len - keep).collect();
    format!("{} ... {}", head, tail)
}
