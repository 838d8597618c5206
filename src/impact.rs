use std::collections::{HashSet, VecDeque};

use crate::model::DependencyGraph;

pub const DEFAULT_IMPACT_DEPTH: usize = 3;
const IMPACT_NODE_LIMIT: usize = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ImpactMode {
    #[default]
    Off,
    /// Nodes that depend on the start node, directly or transitively.
    Dependents,
    /// Nodes the start node relies on.
    Dependencies,
    Both,
}

impl ImpactMode {
    pub const ALL: [ImpactMode; 4] = [
        ImpactMode::Off,
        ImpactMode::Dependents,
        ImpactMode::Dependencies,
        ImpactMode::Both,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Dependents => "Dependents",
            Self::Dependencies => "Dependencies",
            Self::Both => "Both",
        }
    }
}

fn collect_reachable(
    graph: &DependencyGraph,
    start: usize,
    forward: bool,
    max_depth: usize,
    reached: &mut HashSet<usize>,
) {
    let mut queue = VecDeque::from([(start, 0usize)]);
    let mut visited = HashSet::from([start]);

    while let Some((index, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        let neighbors = if forward {
            graph.outgoing(index)
        } else {
            graph.incoming(index)
        };

        for &next in neighbors {
            reached.insert(next);
            if reached.len() >= IMPACT_NODE_LIMIT {
                return;
            }

            if visited.insert(next) {
                queue.push_back((next, depth + 1));
            }
        }
    }
}

/// Highlight set for `start`: the node itself plus everything reachable
/// within `depth` hops in the direction(s) `mode` selects.
///
/// Returns an empty set for [`ImpactMode::Off`] or an out-of-range start.
pub fn impact_set(
    graph: &DependencyGraph,
    start: usize,
    mode: ImpactMode,
    depth: usize,
) -> HashSet<usize> {
    let mut reached = HashSet::new();
    if mode == ImpactMode::Off || start >= graph.len() {
        return reached;
    }

    reached.insert(start);
    if matches!(mode, ImpactMode::Dependencies | ImpactMode::Both) {
        collect_reachable(graph, start, true, depth, &mut reached);
    }
    if matches!(mode, ImpactMode::Dependents | ImpactMode::Both) {
        collect_reachable(graph, start, false, depth, &mut reached);
    }

    reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphEdge, GraphNode, NodeKind};

    // a -> b -> c -> d, e -> b
    fn chain() -> DependencyGraph {
        let nodes = ["a", "b", "c", "d", "e"]
            .into_iter()
            .map(|id| GraphNode::new(id, id, NodeKind::File))
            .collect();
        let edges = vec![
            GraphEdge::new("a", "b", "imports"),
            GraphEdge::new("b", "c", "imports"),
            GraphEdge::new("c", "d", "imports"),
            GraphEdge::new("e", "b", "imports"),
        ];
        DependencyGraph::new(nodes, edges)
    }

    #[test]
    fn off_is_empty() {
        assert!(impact_set(&chain(), 1, ImpactMode::Off, 3).is_empty());
    }

    #[test]
    fn dependencies_follow_outgoing_edges() {
        let set = impact_set(&chain(), 1, ImpactMode::Dependencies, 3);
        assert_eq!(set, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn dependents_follow_incoming_edges() {
        let set = impact_set(&chain(), 2, ImpactMode::Dependents, 3);
        assert_eq!(set, HashSet::from([2, 1, 0, 4]));
    }

    #[test]
    fn depth_bounds_the_walk() {
        let set = impact_set(&chain(), 0, ImpactMode::Dependencies, 1);
        assert_eq!(set, HashSet::from([0, 1]));
    }

    #[test]
    fn both_directions_and_bad_start() {
        let graph = chain();
        let set = impact_set(&graph, 1, ImpactMode::Both, 1);
        assert_eq!(set, HashSet::from([0, 1, 2, 4]));
        assert!(impact_set(&graph, 99, ImpactMode::Both, 3).is_empty());
    }
}
