//! Substring search over node Identifiers or a reconciled property column.
//!
//! Property schemas are heterogeneous by construction, so the search is
//! lenient: every record is probed into a [`CellText`], and only
//! [`CellText::Text`] can match. Absent and unrenderable values are counted
//! and excluded, never raised.

use std::fmt;

use serde_json::Value;

use crate::attributes::NAME_COLUMN;
use crate::graph::{Graph, NodeIndex};
use crate::report::{Sequence, TableLayout, DEFAULT_COLUMN_GAP};
use crate::subgraph::Subgraph;

/// Outcome of turning one record's value into searchable text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellText {
    Text(String),
    /// The record has no value in this column.
    Absent,
    /// A value exists but has no text form.
    Unrenderable,
}

impl CellText {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellText::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Text form of a reconciled value: strings verbatim, scalars via their
/// JSON spelling, lists and maps as compact JSON.
pub fn render_value(value: Option<&Value>) -> CellText {
    match value {
        None | Some(Value::Null) => CellText::Absent,
        Some(Value::String(s)) => CellText::Text(s.clone()),
        Some(v @ (Value::Bool(_) | Value::Number(_))) => CellText::Text(v.to_string()),
        Some(v) => match serde_json::to_string(v) {
            Ok(s) => CellText::Text(s),
            Err(_) => CellText::Unrenderable,
        },
    }
}

/// Probe node `index` in `column` (None = the Identifier).
pub fn probe(graph: &Graph, index: NodeIndex, column: Option<&str>) -> CellText {
    let column = column.unwrap_or(NAME_COLUMN);
    render_value(graph.node_attributes().get(index as usize, column))
}

/// One matching node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchHit {
    pub id: String,
    pub node_type: String,
    /// Matched column text; None when searching Identifiers.
    pub value: Option<String>,
    pub index: NodeIndex,
}

/// Sorted search result with its display settings.
#[derive(Debug, Clone)]
pub struct SearchReport {
    substring: String,
    property: Option<String>,
    hits: Vec<SearchHit>,
    absent: usize,
    unrenderable: usize,
    gap: usize,
}

/// Case-insensitive substring search over all nodes of `graph`.
///
/// `property` names a reconciled node column (`type`, `name`, `_type`, any
/// property key); None searches Identifiers. A column nobody has yields an
/// empty report.
pub fn search(graph: &Graph, substring: &str, property: Option<&str>) -> SearchReport {
    search_nodes(graph, graph.node_indices(), substring, property)
}

/// Like [`search`], restricted to the nodes of a subgraph.
pub fn search_subgraph(sub: &Subgraph<'_>, substring: &str, property: Option<&str>) -> SearchReport {
    search_nodes(
        sub.parent(),
        sub.node_indices().iter().copied(),
        substring,
        property,
    )
}

fn search_nodes(
    graph: &Graph,
    candidates: impl IntoIterator<Item = NodeIndex>,
    substring: &str,
    property: Option<&str>,
) -> SearchReport {
    let needle = substring.to_lowercase();
    let mut report = SearchReport {
        substring: substring.to_string(),
        property: property.map(str::to_string),
        hits: Vec::new(),
        absent: 0,
        unrenderable: 0,
        gap: DEFAULT_COLUMN_GAP,
    };

    for index in candidates {
        let text = match probe(graph, index, property) {
            CellText::Text(text) => text,
            CellText::Absent => {
                report.absent += 1;
                continue;
            }
            CellText::Unrenderable => {
                report.unrenderable += 1;
                continue;
            }
        };
        if !text.to_lowercase().contains(&needle) {
            continue;
        }
        let (Some(id), Some(node)) = (graph.identifier(index), graph.node(index)) else {
            continue;
        };
        report.hits.push(SearchHit {
            id: id.to_string(),
            node_type: node.node_type.clone(),
            value: property.map(|_| text),
            index,
        });
    }

    report.hits.sort();
    report
}

impl SearchReport {
    pub fn with_gap(mut self, gap: usize) -> Self {
        self.gap = gap;
        self
    }

    pub fn substring(&self) -> &str {
        &self.substring
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Hits sorted by Identifier, then type, then matched value.
    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Records skipped because the column had no value for them.
    pub fn absent_count(&self) -> usize {
        self.absent
    }

    /// Records skipped because their value could not be rendered as text.
    pub fn unrenderable_count(&self) -> usize {
        self.unrenderable
    }

    /// The matching nodes as a node-induced view of `graph`.
    pub fn to_subgraph<'g>(&self, graph: &'g Graph) -> Subgraph<'g> {
        Subgraph::induced(graph, self.hits.iter().map(|h| h.index))
    }

    fn layout(&self) -> TableLayout {
        let mut headers = vec!["id".to_string(), "type".to_string()];
        if let Some(property) = &self.property {
            headers.push(property.clone());
        }
        let mut table = TableLayout::new(headers, self.gap);
        for hit in &self.hits {
            let mut row = vec![hit.id.clone(), hit.node_type.clone()];
            if let Some(value) = &hit.value {
                row.push(value.clone());
            }
            table.push_row(row);
        }
        table
    }

    /// Render with a leading running-number column drawn from `sequence`.
    pub fn render_numbered(&self, sequence: &mut Sequence) -> String {
        self.layout().render(Some(sequence))
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.layout().render(None))
    }
}

/// Nodes matching `substring` as a node-induced subgraph.
pub fn matching_subgraph<'g>(graph: &'g Graph, substring: &str, property: Option<&str>) -> Subgraph<'g> {
    search(graph, substring, property).to_subgraph(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EdgeRecord, NodeRecord};
    use serde_json::json;

    fn sample() -> Graph {
        Graph::build(
            vec![
                NodeRecord::new("MONDO:0005148", "Disease").with_property("label", "type 2 diabetes"),
                NodeRecord::new("HGNC:1100", "Gene")
                    .with_property("label", "BRCA1")
                    .with_property("aliases", json!(["RNF53", "PPP1R53"])),
                NodeRecord::new("CHEBI:6801", "Drug").with_property("label", "Metformin"),
                NodeRecord::new("HGNC:11998", "Gene").with_property("score", 0.75),
                NodeRecord::new("MONDO:0007254", "Disease").with_property("label", "breast cancer"),
            ],
            vec![
                EdgeRecord::new("CHEBI:6801", "MONDO:0005148", "treats"),
                EdgeRecord::new("HGNC:1100", "MONDO:0007254", "associated_with"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_search_identifier_case_insensitive() {
        let g = sample();
        let report = search(&g, "mondo", None);
        let ids: Vec<&str> = report.hits().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["MONDO:0005148", "MONDO:0007254"]);
        assert!(report.hits().iter().all(|h| h.value.is_none()));
    }

    #[test]
    fn test_search_property_excludes_absent() {
        let g = sample();
        let report = search(&g, "BR", Some("label"));
        let ids: Vec<&str> = report.hits().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["HGNC:1100", "MONDO:0007254"]);
        assert_eq!(report.hits()[1].value.as_deref(), Some("breast cancer"));
        // HGNC:11998 has no label
        assert_eq!(report.absent_count(), 1);
        assert_eq!(report.unrenderable_count(), 0);
    }

    #[test]
    fn test_search_non_string_values() {
        let g = sample();
        let report = search(&g, "0.7", Some("score"));
        assert_eq!(report.len(), 1);
        assert_eq!(report.hits()[0].value.as_deref(), Some("0.75"));

        let report = search(&g, "rnf53", Some("aliases"));
        assert_eq!(report.len(), 1);
        assert_eq!(report.hits()[0].id, "HGNC:1100");
    }

    #[test]
    fn test_search_unknown_column_is_empty() {
        let g = sample();
        let report = search(&g, "x", Some("nonexistent"));
        assert!(report.is_empty());
        assert_eq!(report.absent_count(), 5);
    }

    #[test]
    fn test_search_type_column() {
        let g = sample();
        let report = search(&g, "gene", Some("type"));
        assert_eq!(report.len(), 2);
        assert_eq!(report.hits()[0].value.as_deref(), Some("Gene"));
    }

    #[test]
    fn test_search_empty_substring_matches_all() {
        let g = sample();
        assert_eq!(search(&g, "", None).len(), 5);
    }

    #[test]
    fn test_render_value_outcomes() {
        assert_eq!(render_value(None), CellText::Absent);
        assert_eq!(render_value(Some(&Value::Null)), CellText::Absent);
        assert_eq!(render_value(Some(&json!("a"))), CellText::Text("a".into()));
        assert_eq!(render_value(Some(&json!(3))), CellText::Text("3".into()));
        assert_eq!(render_value(Some(&json!(false))), CellText::Text("false".into()));
        assert_eq!(
            render_value(Some(&json!({"k": [1, 2]}))),
            CellText::Text(r#"{"k":[1,2]}"#.into())
        );
        assert_eq!(CellText::Unrenderable.as_text(), None);
    }

    #[test]
    fn test_probe_identifier() {
        let g = sample();
        assert_eq!(probe(&g, 2, None).as_text(), Some("CHEBI:6801"));
        assert_eq!(probe(&g, 3, Some("label")), CellText::Absent);
    }

    #[test]
    fn test_report_display() {
        let g = sample();
        let report = search(&g, "hgnc", None);
        let expected = "\
id            type
======================
HGNC:1100     Gene
HGNC:11998    Gene
";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_report_display_with_property() {
        let g = sample();
        let report = search(&g, "in", Some("label")).with_gap(1);
        let expected = "\
id         type label
==========================
CHEBI:6801 Drug Metformin
";
        assert_eq!(report.to_string(), expected);
    }

    #[test]
    fn test_render_numbered_across_reports() {
        let g = sample();
        let mut seq = Sequence::default();
        let first = search(&g, "mondo", None).render_numbered(&mut seq);
        let second = search(&g, "chebi", None).render_numbered(&mut seq);
        assert!(first.lines().nth(3).unwrap().starts_with("2 "));
        assert!(second.lines().nth(2).unwrap().starts_with("3 "));
    }

    #[test]
    fn test_matching_subgraph() {
        let g = sample();
        let sub = matching_subgraph(&g, "6801", None);
        assert_eq!(sub.node_count(), 1);
        let sub = matching_subgraph(&g, "", Some("label"));
        assert_eq!(sub.node_count(), 4);
        assert_eq!(sub.edge_count(), 2);
    }

    #[test]
    fn test_search_within_subgraph() {
        let g = sample();
        let view = crate::traversal::neighborhood(&g, "CHEBI:6801").unwrap();
        let report = search_subgraph(&view, "mondo", None);
        assert_eq!(report.len(), 1);
        assert_eq!(report.hits()[0].id, "MONDO:0005148");
    }
}
