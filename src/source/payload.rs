use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{NodeKind, normalize_relation};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub line_count: Option<u32>,
}

impl RawNode {
    pub fn node_kind(&self) -> NodeKind {
        NodeKind::from_tag(&self.kind)
    }

    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or(&self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    #[serde(default)]
    pub total_nodes: usize,
    #[serde(default)]
    pub total_edges: usize,
    #[serde(default)]
    pub files: usize,
    #[serde(default)]
    pub functions: usize,
    #[serde(default)]
    pub classes: usize,
    #[serde(default)]
    pub imports: usize,
    #[serde(default)]
    pub external_nodes: usize,
    #[serde(default)]
    pub truncated: bool,
    #[serde(default, deserialize_with = "edge_type_counts")]
    pub edge_types: BTreeMap<String, usize>,
}

impl GraphStats {
    pub fn from_raw(nodes: &[RawNode], edges: &[RawEdge]) -> Self {
        let mut stats = Self {
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            ..Self::default()
        };

        for node in nodes {
            match node.node_kind() {
                NodeKind::File => stats.files += 1,
                NodeKind::Function | NodeKind::Method => stats.functions += 1,
                NodeKind::Class => stats.classes += 1,
                NodeKind::Import => stats.imports += 1,
                NodeKind::ExternalModule => stats.external_nodes += 1,
                _ => {}
            }
        }

        for edge in edges {
            *stats
                .edge_types
                .entry(normalize_relation(&edge.kind))
                .or_default() += 1;
        }

        stats
    }
}

// Older analysis backends send a plain list of relation names instead of counts.
fn edge_type_counts<'de, D>(deserializer: D) -> Result<BTreeMap<String, usize>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum EdgeTypes {
        Counts(BTreeMap<String, usize>),
        Names(Vec<String>),
    }

    Ok(match EdgeTypes::deserialize(deserializer)? {
        EdgeTypes::Counts(counts) => counts
            .into_iter()
            .map(|(name, count)| (normalize_relation(&name), count))
            .collect(),
        EdgeTypes::Names(names) => names
            .into_iter()
            .map(|name| (normalize_relation(&name), 0))
            .collect(),
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    #[serde(default)]
    pub entities_in_project: u64,
    #[serde(default)]
    pub entities_in_graph: u64,
    #[serde(default)]
    pub relationships_in_project: u64,
    #[serde(default)]
    pub relationships_in_graph: u64,
}

impl Coverage {
    pub fn entity_ratio(&self) -> Option<f32> {
        ratio(self.entities_in_graph, self.entities_in_project)
    }

    pub fn relationship_ratio(&self) -> Option<f32> {
        ratio(self.relationships_in_graph, self.relationships_in_project)
    }
}

fn ratio(part: u64, whole: u64) -> Option<f32> {
    if whole == 0 {
        None
    } else {
        Some((part as f64 / whole as f64).clamp(0.0, 1.0) as f32)
    }
}

/// A raw entity graph as handed over by the analysis backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphPayload {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    pub stats: GraphStats,
    pub coverage: Option<Coverage>,
}

impl GraphPayload {
    pub fn new(nodes: Vec<RawNode>, edges: Vec<RawEdge>) -> Self {
        let stats = GraphStats::from_raw(&nodes, &edges);
        Self {
            nodes,
            edges,
            stats,
            coverage: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: &str) -> RawNode {
        RawNode {
            id: id.to_owned(),
            label: None,
            kind: kind.to_owned(),
            file_path: None,
            language: None,
            line_count: None,
        }
    }

    #[test]
    fn stats_count_kinds_and_relations() {
        let nodes = vec![
            node("a", "file"),
            node("b", "file"),
            node("f", "function"),
            node("m", "method"),
            node("react", "external_module"),
        ];
        let edges = vec![
            RawEdge {
                source: "a".into(),
                target: "b".into(),
                kind: "imports".into(),
            },
            RawEdge {
                source: "a".into(),
                target: "react".into(),
                kind: "IMPORTS".into(),
            },
            RawEdge {
                source: "f".into(),
                target: "m".into(),
                kind: "calls".into(),
            },
        ];

        let stats = GraphStats::from_raw(&nodes, &edges);
        assert_eq!(stats.total_nodes, 5);
        assert_eq!(stats.files, 2);
        assert_eq!(stats.functions, 2);
        assert_eq!(stats.external_nodes, 1);
        assert_eq!(stats.edge_types.get("IMPORTS"), Some(&2));
        assert_eq!(stats.edge_types.get("CALLS"), Some(&1));
        assert!(!stats.truncated);
    }

    #[test]
    fn label_falls_back_to_id() {
        let mut raw = node("src/lib.rs", "file");
        assert_eq!(raw.display_label(), "src/lib.rs");
        raw.label = Some("  ".into());
        assert_eq!(raw.display_label(), "src/lib.rs");
        raw.label = Some("lib.rs".into());
        assert_eq!(raw.display_label(), "lib.rs");
    }

    #[test]
    fn coverage_ratio_handles_empty_project() {
        let coverage = Coverage {
            entities_in_project: 0,
            entities_in_graph: 3,
            relationships_in_project: 10,
            relationships_in_graph: 5,
        };
        assert_eq!(coverage.entity_ratio(), None);
        assert_eq!(coverage.relationship_ratio(), Some(0.5));
    }
}
