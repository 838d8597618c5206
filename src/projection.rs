use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use tracing::debug;

use crate::model::{EdgeKind, GraphEdge, GraphNode, NodeKind, NodeMetadata};
use crate::source::{GraphPayload, RawNode};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum ViewMode {
    /// One node per file, import edges only.
    #[default]
    File,
    /// Every entity the analyzer reported.
    Symbol,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "Files",
            Self::Symbol => "Symbols",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProjectionOptions {
    pub view_mode: ViewMode,
    pub include_external: bool,
    pub include_isolated: bool,
}

/// Display graph produced by [`project`]. Every edge references two nodes of
/// `nodes`; order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectedGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl ProjectedGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub fn project(payload: &GraphPayload, options: &ProjectionOptions) -> ProjectedGraph {
    let keep_kind = |kind: NodeKind| match options.view_mode {
        ViewMode::File => {
            kind == NodeKind::File || (options.include_external && kind == NodeKind::ExternalModule)
        }
        ViewMode::Symbol => options.include_external || kind != NodeKind::ExternalModule,
    };

    let mut seen = HashSet::new();
    let mut nodes = payload
        .nodes
        .iter()
        .filter(|node| keep_kind(node.node_kind()) && seen.insert(node.id.as_str()))
        .collect::<Vec<_>>();

    let kind_by_id = nodes
        .iter()
        .map(|node| (node.id.as_str(), node.node_kind()))
        .collect::<HashMap<_, _>>();

    let mut edges = payload
        .edges
        .iter()
        .filter_map(|raw| {
            let source_kind = *kind_by_id.get(raw.source.as_str())?;
            let target_kind = *kind_by_id.get(raw.target.as_str())?;
            let edge = GraphEdge::new(raw.source.as_str(), raw.target.as_str(), &raw.kind);

            if options.view_mode == ViewMode::File {
                let target_allowed = target_kind == NodeKind::File
                    || (options.include_external && target_kind == NodeKind::ExternalModule);
                if edge.kind != EdgeKind::Imports
                    || source_kind != NodeKind::File
                    || !target_allowed
                {
                    return None;
                }
            }

            Some(edge)
        })
        .collect::<Vec<_>>();

    if !options.include_isolated {
        let connected = edges
            .iter()
            .flat_map(|edge| [edge.source.as_str(), edge.target.as_str()])
            .collect::<HashSet<_>>();
        nodes.retain(|node| connected.contains(node.id.as_str()));

        let surviving = nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<HashSet<_>>();
        edges.retain(|edge| {
            surviving.contains(edge.source.as_str()) && surviving.contains(edge.target.as_str())
        });
    }

    debug!(
        mode = ?options.view_mode,
        nodes = nodes.len(),
        edges = edges.len(),
        "projected graph"
    );

    ProjectedGraph {
        nodes: nodes.into_iter().map(to_graph_node).collect(),
        edges,
    }
}

fn to_graph_node(raw: &RawNode) -> GraphNode {
    GraphNode::new(raw.id.as_str(), raw.display_label(), raw.node_kind()).with_metadata(
        NodeMetadata {
            file_path: raw.file_path.clone(),
            language: raw.language.clone(),
            line_count: raw.line_count,
        },
    )
}
