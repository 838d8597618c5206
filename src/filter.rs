use std::collections::{BTreeSet, HashMap, HashSet};

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use tracing::debug;

use crate::model::{GraphEdge, GraphNode, NodeKind, normalize_relation};
use crate::projection::ProjectedGraph;
use crate::util::matches_path_pattern;

pub const DEFAULT_VISIBLE_NODES: usize = 150;
pub const DEFAULT_VISIBLE_STEP: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterOptions {
    pub search: String,
    pub path_pattern: String,
    /// Node kinds to keep. Empty keeps every kind.
    pub kinds: BTreeSet<NodeKind>,
    /// Normalized relation tags to keep. Empty keeps every relation.
    pub relations: BTreeSet<String>,
    pub visible_limit: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            search: String::new(),
            path_pattern: String::new(),
            kinds: BTreeSet::new(),
            relations: BTreeSet::new(),
            visible_limit: DEFAULT_VISIBLE_NODES,
        }
    }
}

impl FilterOptions {
    pub fn show_more(&mut self, step: usize) {
        self.visible_limit = self.visible_limit.saturating_add(step.max(1));
    }

    /// Keeps or hides one node kind. An empty set means "every kind", so the
    /// first hide seeds it from [`NodeKind::FILTERABLE`] and a set holding every
    /// kind collapses back to empty.
    pub fn set_kind_kept(&mut self, kind: NodeKind, keep: bool) {
        if self.kinds.is_empty() {
            if keep {
                return;
            }
            self.kinds.extend(NodeKind::FILTERABLE);
        }
        if keep {
            self.kinds.insert(kind);
        } else {
            self.kinds.remove(&kind);
        }
        if NodeKind::FILTERABLE.iter().all(|kind| self.kinds.contains(kind)) {
            self.kinds.clear();
        }
    }

    pub fn keeps_kind(&self, kind: NodeKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    pub fn toggle_relation(&mut self, relation: &str) {
        let relation = normalize_relation(relation);
        if !self.relations.remove(&relation) {
            self.relations.insert(relation);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilteredGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Nodes that passed every filter, before the visible cap.
    pub matched_nodes: usize,
    /// Matched nodes held back by the visible cap.
    pub hidden_nodes: usize,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

fn node_matches_search(matcher: &SkimMatcherV2, node: &GraphNode, query: &str) -> bool {
    fuzzy_match_score(matcher, &node.label, query).is_some()
        || fuzzy_match_score(matcher, &node.id, query).is_some()
        || node
            .metadata
            .file_path
            .as_deref()
            .is_some_and(|path| fuzzy_match_score(matcher, path, query).is_some())
}

fn node_matches_path(node: &GraphNode, pattern: &str) -> bool {
    let path = node.metadata.file_path.as_deref().unwrap_or(&node.id);
    matches_path_pattern(path, pattern)
}

fn retain_edges_between(edges: &mut Vec<GraphEdge>, nodes: &[GraphNode]) {
    let ids = nodes
        .iter()
        .map(|node| node.id.as_str())
        .collect::<HashSet<_>>();
    edges.retain(|edge| ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str()));
}

/// Reduces a projected graph to what the layout engine should see.
///
/// Order of application: edge-type reduction, node kind/path/search filters,
/// dangling-edge removal, then the visible cap. The cap keeps the most
/// connected nodes and preserves their input order, so raising the cap only
/// ever adds nodes.
pub fn apply_filters(graph: ProjectedGraph, options: &FilterOptions) -> FilteredGraph {
    let ProjectedGraph {
        mut nodes,
        mut edges,
    } = graph;

    if !options.relations.is_empty() {
        edges.retain(|edge| options.relations.contains(&edge.relation));
    }

    if !options.kinds.is_empty() {
        nodes.retain(|node| options.kinds.contains(&node.kind));
    }

    let pattern = options.path_pattern.trim();
    if !pattern.is_empty() {
        nodes.retain(|node| node_matches_path(node, pattern));
    }

    let query = options.search.trim();
    if !query.is_empty() {
        let matcher = SkimMatcherV2::default();
        nodes.retain(|node| node_matches_search(&matcher, node, query));
    }

    retain_edges_between(&mut edges, &nodes);
    let matched_nodes = nodes.len();

    let limit = options.visible_limit.max(1);
    let hidden_nodes = matched_nodes.saturating_sub(limit);
    if hidden_nodes > 0 {
        let mut degree: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for edge in &edges {
            *degree.entry(edge.source.as_str()).or_default() += 1;
            *degree.entry(edge.target.as_str()).or_default() += 1;
        }

        let mut ranked = (0..nodes.len()).collect::<Vec<_>>();
        ranked.sort_by(|&a, &b| {
            let degree_a = degree.get(nodes[a].id.as_str()).copied().unwrap_or(0);
            let degree_b = degree.get(nodes[b].id.as_str()).copied().unwrap_or(0);
            degree_b.cmp(&degree_a).then(a.cmp(&b))
        });

        let mut keep = vec![false; nodes.len()];
        for &index in ranked.iter().take(limit) {
            keep[index] = true;
        }

        let mut flags = keep.into_iter();
        nodes.retain(|_| flags.next().unwrap_or(false));
        retain_edges_between(&mut edges, &nodes);
    }

    debug!(
        matched = matched_nodes,
        visible = nodes.len(),
        hidden = hidden_nodes,
        edges = edges.len(),
        "filtered graph"
    );

    FilteredGraph {
        nodes,
        edges,
        matched_nodes,
        hidden_nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeMetadata;

    fn node(id: &str, kind: NodeKind) -> GraphNode {
        GraphNode::new(id, crate::util::short_name(id), kind).with_metadata(NodeMetadata {
            file_path: Some(id.to_owned()),
            ..NodeMetadata::default()
        })
    }

    fn sample() -> ProjectedGraph {
        ProjectedGraph {
            nodes: vec![
                node("src/app/mod.rs", NodeKind::File),
                node("src/app/view.rs", NodeKind::File),
                node("src/layout.rs", NodeKind::File),
                node("src/util.rs", NodeKind::File),
                node("src/layout.rs::force_layout", NodeKind::Function),
            ],
            edges: vec![
                GraphEdge::new("src/app/mod.rs", "src/app/view.rs", "imports"),
                GraphEdge::new("src/app/mod.rs", "src/layout.rs", "imports"),
                GraphEdge::new("src/app/view.rs", "src/layout.rs", "imports"),
                GraphEdge::new("src/app/view.rs", "src/util.rs", "uses"),
                GraphEdge::new("src/layout.rs", "src/layout.rs::force_layout", "contains"),
            ],
        }
    }

    #[test]
    fn default_options_keep_everything() {
        let filtered = apply_filters(sample(), &FilterOptions::default());
        assert_eq!(filtered.nodes.len(), 5);
        assert_eq!(filtered.edges.len(), 5);
        assert_eq!(filtered.hidden_nodes, 0);
    }

    #[test]
    fn kind_filter_drops_edges_to_removed_nodes() {
        let options = FilterOptions {
            kinds: BTreeSet::from([NodeKind::File]),
            ..FilterOptions::default()
        };
        let filtered = apply_filters(sample(), &options);
        assert_eq!(filtered.nodes.len(), 4);
        assert!(filtered.edges.iter().all(|edge| edge.relation != "CONTAINS"));
    }

    #[test]
    fn hiding_one_kind_keeps_unknown_nodes() {
        let graph = ProjectedGraph {
            nodes: vec![
                node("src/a.rs", NodeKind::File),
                node("src/a.rs::use_b", NodeKind::Import),
                node("src/a.rs::mystery", NodeKind::Unknown),
            ],
            edges: Vec::new(),
        };
        let mut options = FilterOptions::default();
        options.set_kind_kept(NodeKind::Import, false);

        assert!(options.keeps_kind(NodeKind::Unknown));
        assert!(!options.keeps_kind(NodeKind::Import));
        let ids = apply_filters(graph, &options)
            .nodes
            .into_iter()
            .map(|node| node.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["src/a.rs", "src/a.rs::mystery"]);

        options.set_kind_kept(NodeKind::Unknown, false);
        assert!(!options.keeps_kind(NodeKind::Unknown));
        options.set_kind_kept(NodeKind::Unknown, true);
        options.set_kind_kept(NodeKind::Import, true);
        assert!(options.kinds.is_empty());
    }

    #[test]
    fn path_pattern_filters_by_file_path() {
        let options = FilterOptions {
            path_pattern: "src/app/*".into(),
            ..FilterOptions::default()
        };
        let filtered = apply_filters(sample(), &options);
        assert_eq!(filtered.nodes.len(), 2);
        assert_eq!(filtered.edges.len(), 1);
    }

    #[test]
    fn search_is_fuzzy() {
        let options = FilterOptions {
            search: "frclay".into(),
            ..FilterOptions::default()
        };
        let filtered = apply_filters(sample(), &options);
        assert_eq!(filtered.nodes.len(), 1);
        assert_eq!(filtered.nodes[0].id, "src/layout.rs::force_layout");
    }

    #[test]
    fn relation_reduction() {
        let mut options = FilterOptions::default();
        options.toggle_relation("imports");
        let filtered = apply_filters(sample(), &options);
        assert_eq!(filtered.edges.len(), 3);
        assert_eq!(filtered.nodes.len(), 5);

        options.toggle_relation("IMPORTS");
        assert!(options.relations.is_empty());
    }

    #[test]
    fn visible_cap_keeps_most_connected_in_input_order() {
        let options = FilterOptions {
            visible_limit: 2,
            ..FilterOptions::default()
        };
        let filtered = apply_filters(sample(), &options);

        assert_eq!(filtered.matched_nodes, 5);
        assert_eq!(filtered.hidden_nodes, 3);
        let ids = filtered
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["src/app/view.rs", "src/layout.rs"]);
        assert_eq!(filtered.edges.len(), 1);
    }

    #[test]
    fn show_more_grows_the_cap() {
        let mut options = FilterOptions {
            visible_limit: 2,
            ..FilterOptions::default()
        };
        options.show_more(DEFAULT_VISIBLE_STEP);
        assert_eq!(options.visible_limit, 102);
        let filtered = apply_filters(sample(), &options);
        assert_eq!(filtered.hidden_nodes, 0);
    }
}
