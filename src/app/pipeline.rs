use std::collections::HashSet;
use std::time::Instant;

use tracing::info;

use depscope::filter::apply_filters;
use depscope::impact::impact_set;
use depscope::model::DependencyGraph;
use depscope::projection::project;

use super::{HighlightKey, PipelineSummary, ViewModel};

impl ViewModel {
    /// Projection, filters and indexing, then hands the result to the canvas.
    pub(in crate::app) fn rebuild_graph(&mut self) {
        let started = Instant::now();

        let projected = project(&self.payload, &self.projection);
        let projected_nodes = projected.nodes.len();
        let projected_edges = projected.edges.len();
        self.relations = projected
            .edges
            .iter()
            .map(|edge| edge.relation.clone())
            .collect();

        let filtered = apply_filters(projected, &self.filters);
        let matched_nodes = filtered.matched_nodes;
        let hidden_nodes = filtered.hidden_nodes;
        let graph = DependencyGraph::new(filtered.nodes, filtered.edges);

        self.summary = PipelineSummary {
            projected_nodes,
            projected_edges,
            matched_nodes,
            hidden_nodes,
            visible_nodes: graph.len(),
            visible_edges: graph.edges().len(),
            highlighted: 0,
        };
        self.canvas.set_graph(graph);
        self.hovered = None;
        self.highlight_key = None;
        self.graph_dirty = false;

        info!(
            view_mode = self.projection.view_mode.label(),
            projected_nodes,
            visible_nodes = self.summary.visible_nodes,
            visible_edges = self.summary.visible_edges,
            hidden_nodes,
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "graph rebuilt"
        );
    }

    /// Recomputes the impact highlight when the selection or the impact settings moved.
    pub(in crate::app) fn refresh_highlight(&mut self) {
        let key = HighlightKey {
            selected: self.canvas.selected_index(),
            mode: self.impact_mode,
            depth: self.impact_depth,
        };
        if self.highlight_key == Some(key) {
            return;
        }

        let highlighted = match key.selected {
            Some(index) => impact_set(self.canvas.graph(), index, key.mode, key.depth),
            None => HashSet::new(),
        };
        self.set_highlighted(highlighted);
        self.highlight_key = Some(key);
    }
}
