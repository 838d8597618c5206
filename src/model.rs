use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Node vocabulary shared by the file view and the symbol view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Function,
    Class,
    Variable,
    Import,
    Module,
    Method,
    ExternalModule,
    Unknown,
}

impl NodeKind {
    pub const ALL: [NodeKind; 8] = [
        NodeKind::File,
        NodeKind::Function,
        NodeKind::Class,
        NodeKind::Variable,
        NodeKind::Import,
        NodeKind::Module,
        NodeKind::Method,
        NodeKind::ExternalModule,
    ];

    /// Every kind a node-type filter can keep, including the unknown-tag fallback.
    pub const FILTERABLE: [NodeKind; 9] = [
        NodeKind::File,
        NodeKind::Function,
        NodeKind::Class,
        NodeKind::Variable,
        NodeKind::Import,
        NodeKind::Module,
        NodeKind::Method,
        NodeKind::ExternalModule,
        NodeKind::Unknown,
    ];

    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "file" => Self::File,
            "function" | "func" => Self::Function,
            "class" => Self::Class,
            "variable" | "var" | "constant" => Self::Variable,
            "import" => Self::Import,
            "module" => Self::Module,
            "method" => Self::Method,
            "external_module" | "externalmodule" | "external" => Self::ExternalModule,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Function => "function",
            Self::Class => "class",
            Self::Variable => "variable",
            Self::Import => "import",
            Self::Module => "module",
            Self::Method => "method",
            Self::ExternalModule => "external module",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeKind {
    Imports,
    Calls,
    Extends,
    Uses,
    Other,
}

impl EdgeKind {
    /// Classifies an already normalized relation tag.
    pub fn from_relation(relation: &str) -> Self {
        match relation {
            "IMPORTS" | "IMPORT" => Self::Imports,
            "CALLS" | "CALL" => Self::Calls,
            "EXTENDS" | "INHERITS" | "IMPLEMENTS" => Self::Extends,
            "USES" | "REFERENCES" => Self::Uses,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::Calls => "calls",
            Self::Extends => "extends",
            Self::Uses => "uses",
            Self::Other => "other",
        }
    }
}

/// Upper-cases a relationship tag so `imports`, `Imports` and `IMPORTS` compare equal.
pub fn normalize_relation(tag: &str) -> String {
    tag.trim().to_ascii_uppercase().replace([' ', '-'], "_")
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub file_path: Option<String>,
    pub language: Option<String>,
    pub line_count: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub metadata: NodeMetadata,
    /// Ids this node points to. Derived from the edge set, never edited directly.
    pub dependencies: BTreeSet<String>,
    /// Ids pointing at this node. Derived from the edge set, never edited directly.
    pub dependents: BTreeSet<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            metadata: NodeMetadata::default(),
            dependencies: BTreeSet::new(),
            dependents: BTreeSet::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
    pub kind: EdgeKind,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, relation: &str) -> Self {
        let relation = normalize_relation(relation);
        let kind = EdgeKind::from_relation(&relation);
        Self {
            source: source.into(),
            target: target.into(),
            relation,
            kind,
        }
    }
}

/// Dense node storage with stable indices.
///
/// Positions live outside the graph, in a vector indexed in parallel with
/// [`DependencyGraph::nodes`]. The `dependencies`/`dependents` mirror on every
/// node is rebuilt from the edge set on construction.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    links: Vec<(usize, usize)>,
    index_by_id: HashMap<String, usize>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl DependencyGraph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        let mut unique = Vec::with_capacity(nodes.len());
        for node in nodes {
            if index_by_id.contains_key(&node.id) {
                continue;
            }
            index_by_id.insert(node.id.clone(), unique.len());
            unique.push(node);
        }

        let mut graph = Self {
            nodes: unique,
            edges,
            links: Vec::new(),
            index_by_id,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        };
        graph.rebuild_links();
        graph
    }

    fn rebuild_links(&mut self) {
        for node in &mut self.nodes {
            node.dependencies.clear();
            node.dependents.clear();
        }

        let index_by_id = &self.index_by_id;
        self.edges.retain(|edge| {
            index_by_id.contains_key(&edge.source) && index_by_id.contains_key(&edge.target)
        });

        self.links.clear();
        self.outgoing = vec![Vec::new(); self.nodes.len()];
        self.incoming = vec![Vec::new(); self.nodes.len()];

        for edge in &self.edges {
            let (Some(&source), Some(&target)) = (
                self.index_by_id.get(&edge.source),
                self.index_by_id.get(&edge.target),
            ) else {
                continue;
            };

            self.links.push((source, target));
            self.nodes[source].dependencies.insert(edge.target.clone());
            self.nodes[target].dependents.insert(edge.source.clone());
            self.outgoing[source].push(target);
            self.incoming[target].push(source);
        }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Edges as `(source, target)` index pairs, parallel to [`Self::edges`].
    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn outgoing(&self, index: usize) -> &[usize] {
        self.outgoing.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming(&self, index: usize) -> &[usize] {
        self.incoming.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DependencyGraph {
        let nodes = vec![
            GraphNode::new("a", "a.rs", NodeKind::File),
            GraphNode::new("b", "b.rs", NodeKind::File),
            GraphNode::new("c", "c.rs", NodeKind::File),
        ];
        let edges = vec![
            GraphEdge::new("a", "b", "imports"),
            GraphEdge::new("a", "c", "imports"),
            GraphEdge::new("b", "c", "calls"),
            GraphEdge::new("c", "missing", "imports"),
        ];
        DependencyGraph::new(nodes, edges)
    }

    #[test]
    fn mirror_matches_edges_exactly() {
        let graph = sample();

        for edge in graph.edges() {
            let source = &graph.nodes()[graph.index_of(&edge.source).unwrap()];
            let target = &graph.nodes()[graph.index_of(&edge.target).unwrap()];
            assert!(source.dependencies.contains(&edge.target));
            assert!(target.dependents.contains(&edge.source));
        }

        for node in graph.nodes() {
            for dependency in &node.dependencies {
                assert!(
                    graph
                        .edges()
                        .iter()
                        .any(|edge| edge.source == node.id && &edge.target == dependency)
                );
            }
            for dependent in &node.dependents {
                assert!(
                    graph
                        .edges()
                        .iter()
                        .any(|edge| &edge.source == dependent && edge.target == node.id)
                );
            }
        }
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let graph = sample();
        assert_eq!(graph.edges().len(), 3);
        assert_eq!(graph.links().len(), 3);
        assert!(graph.nodes()[2].dependencies.is_empty());
    }

    #[test]
    fn stale_mirror_on_input_nodes_is_rebuilt() {
        let mut stale = GraphNode::new("b", "b.rs", NodeKind::File);
        stale.dependencies.insert("gone".to_owned());
        stale.dependents.insert("a".to_owned());

        let graph = DependencyGraph::new(
            vec![
                GraphNode::new("a", "a.rs", NodeKind::File),
                stale,
                GraphNode::new("c", "c.rs", NodeKind::File),
            ],
            vec![GraphEdge::new("c", "a", "uses")],
        );

        assert!(graph.nodes()[1].dependencies.is_empty());
        assert!(graph.nodes()[1].dependents.is_empty());
        assert_eq!(graph.nodes()[2].dependencies.len(), 1);
        assert!(graph.nodes()[0].dependents.contains("c"));
        assert_eq!(graph.outgoing(2), &[0]);
        assert_eq!(graph.incoming(0), &[2]);
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let graph = DependencyGraph::new(
            vec![
                GraphNode::new("x", "first", NodeKind::Class),
                GraphNode::new("x", "second", NodeKind::Function),
            ],
            Vec::new(),
        );
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.nodes()[0].label, "first");
    }

    #[test]
    fn relation_tags_are_normalized() {
        let edge = GraphEdge::new("a", "b", " imports ");
        assert_eq!(edge.relation, "IMPORTS");
        assert_eq!(edge.kind, EdgeKind::Imports);
        assert_eq!(GraphEdge::new("a", "b", "Inherits").kind, EdgeKind::Extends);
        assert_eq!(GraphEdge::new("a", "b", "defines").kind, EdgeKind::Other);
    }

    #[test]
    fn node_kind_tags() {
        assert_eq!(NodeKind::from_tag("External Module"), NodeKind::ExternalModule);
        assert_eq!(NodeKind::from_tag("external_module"), NodeKind::ExternalModule);
        assert_eq!(NodeKind::from_tag("FILE"), NodeKind::File);
        assert_eq!(NodeKind::from_tag("lambda"), NodeKind::Unknown);
    }
}
