use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Key, Pos2, Rect, Sense, Ui, Vec2, vec2};
use tracing::debug;

use crate::interaction::{InteractionController, InteractionOutcome, PointerEvent};
use crate::layout::{Viewport, force_layout};
use crate::model::{DependencyGraph, GraphNode};
use crate::render::{Palette, build_scene, paint};
use crate::view_state::ViewState;

/// What changed on the canvas during one frame, for the surrounding UI.
#[derive(Clone, Debug, Default)]
pub struct CanvasResponse {
    /// Full record of a node picked by click this frame.
    pub clicked: Option<GraphNode>,
    /// `Some` when the hovered node changed; the inner value is the new hover.
    pub hover_changed: Option<Option<GraphNode>>,
}

/// Interactive graph widget: owns positions, camera, hover and selection.
///
/// Layout is recomputed synchronously whenever the graph is replaced or the
/// widget size changes; every other frame only repaints.
pub struct GraphCanvas {
    graph: DependencyGraph,
    positions: Vec<Pos2>,
    layout_viewport: Option<Viewport>,
    state: ViewState,
    controller: InteractionController,
    palette: Palette,
}

impl GraphCanvas {
    pub fn new(palette: Palette) -> Self {
        Self {
            graph: DependencyGraph::default(),
            positions: Vec::new(),
            layout_viewport: None,
            state: ViewState::default(),
            controller: InteractionController::default(),
            palette,
        }
    }

    /// Replaces the graph, keeping the camera and carrying the selection over by id.
    pub fn set_graph(&mut self, graph: DependencyGraph) {
        let selected_id = self.selected_node().map(|node| node.id.clone());

        self.state.forget_nodes();
        self.controller = InteractionController::default();
        self.state.selected = selected_id.and_then(|id| graph.index_of(&id));
        self.graph = graph;
        self.positions.clear();
        self.layout_viewport = None;
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn set_highlighted(&mut self, highlighted: HashSet<usize>) {
        self.state.highlighted = highlighted;
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn positions(&self) -> &[Pos2] {
        &self.positions
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected
    }

    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.state.selected.and_then(|index| self.graph.node(index))
    }

    pub fn select_by_id(&mut self, id: &str) -> Option<&GraphNode> {
        let index = self.graph.index_of(id)?;
        self.state.selected = Some(index);
        self.graph.node(index)
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    pub fn reset_camera(&mut self) {
        self.state.camera.reset();
    }

    /// Lays the graph out for `viewport` unless it already is.
    pub fn ensure_layout(&mut self, viewport: Viewport) {
        if self.layout_viewport == Some(viewport) && self.positions.len() == self.graph.len() {
            return;
        }

        self.positions = force_layout(self.graph.len(), self.graph.links(), viewport);
        self.layout_viewport = Some(viewport);
        debug!(
            nodes = self.graph.len(),
            width = viewport.width(),
            height = viewport.height(),
            "canvas relayout"
        );
    }

    /// Feeds one canvas-local pointer event through the controller.
    pub fn handle_event(&mut self, event: PointerEvent) -> InteractionOutcome {
        self.controller.handle(event, &mut self.state, &self.positions)
    }

    fn cursor_icon(&self) -> Option<egui::CursorIcon> {
        if self.controller.is_panning() {
            Some(egui::CursorIcon::Grabbing)
        } else if self.state.hovered.is_some() || self.controller.pressed_node().is_some() {
            Some(egui::CursorIcon::PointingHand)
        } else {
            None
        }
    }

    pub fn show(&mut self, ui: &mut Ui) -> CanvasResponse {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.ensure_layout(Viewport::from_size(rect.size()));

        let previous_hover = self.state.hovered;
        let mut clicked = None;
        let mut redraw = false;

        for event in pointer_events(
            ui,
            rect,
            &response,
            self.controller.is_panning(),
            self.state.hovered.is_some(),
        ) {
            let outcome = self.handle_event(event);
            if outcome.consume_scroll {
                ui.ctx().input_mut(|input| {
                    input.smooth_scroll_delta = Vec2::ZERO;
                    input.raw_scroll_delta = Vec2::ZERO;
                });
            }
            if outcome.selected.is_some() {
                clicked = outcome.selected;
            }
            redraw |= outcome.needs_redraw();
        }

        if !ui.ctx().wants_keyboard_input() {
            let (escape, reset) =
                ui.input(|input| (input.key_pressed(Key::Escape), input.key_pressed(Key::R)));
            if escape && self.state.selected.is_some() {
                self.state.clear_selection();
                redraw = true;
            }
            if reset {
                self.state.camera.reset();
                redraw = true;
            }
        }

        if let Some(cursor) = self.cursor_icon() {
            ui.output_mut(|output| {
                output.cursor_icon = cursor;
            });
        }

        let painter = ui.painter_at(rect);
        let scene = build_scene(&self.graph, &self.positions, &self.state, &self.palette);
        paint(&painter, rect, &scene, &self.state.camera, &self.palette);

        if self.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No nodes match the current filters.",
                FontId::proportional(15.0),
                Color32::from_gray(190),
            );
        } else if let Some(node) = self.state.hovered.and_then(|index| self.graph.node(index)) {
            let summary = format!(
                "{}  |  {}  |  deps {}  |  dependents {}",
                node.label,
                node.kind.label(),
                node.dependencies.len(),
                node.dependents.len()
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                summary,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if redraw {
            ui.ctx().request_repaint();
        }

        let hover_changed = (self.state.hovered != previous_hover)
            .then(|| self.state.hovered.and_then(|index| self.graph.node(index)).cloned());

        CanvasResponse {
            clicked: clicked.and_then(|index| self.graph.node(index)).cloned(),
            hover_changed,
        }
    }
}

/// Translates this frame's egui pointer state into canvas-local events.
fn pointer_events(
    ui: &Ui,
    rect: Rect,
    response: &egui::Response,
    panning: bool,
    hovered_node: bool,
) -> Vec<PointerEvent> {
    let local = |pos: Pos2| (pos - rect.min).to_pos2();
    let mut events = Vec::new();

    let (hover_pos, press_origin, scroll) = ui.input(|input| {
        (
            input.pointer.hover_pos(),
            input.pointer.press_origin(),
            input.raw_scroll_delta.y,
        )
    });
    let inside = hover_pos.filter(|pos| rect.contains(*pos));

    if let Some(pos) = inside
        && response.hovered()
        && scroll.abs() > f32::EPSILON
    {
        // egui reports wheel-up as positive; the controller expects the DOM sign.
        events.push(PointerEvent::Wheel {
            pos: local(pos),
            delta_y: -scroll,
        });
    }

    if response.drag_started()
        && let Some(origin) = press_origin
    {
        events.push(PointerEvent::Pressed(local(origin)));
    }

    match inside {
        Some(pos) => events.push(PointerEvent::Moved(local(pos))),
        None if panning || hovered_node => events.push(PointerEvent::Left),
        None => {}
    }

    if response.clicked()
        && let Some(pos) = response.interact_pointer_pos()
    {
        events.push(PointerEvent::Clicked(local(pos)));
    }

    if response.drag_stopped()
        && let Some(pos) = inside
    {
        events.push(PointerEvent::Released(local(pos)));
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraphEdge, NodeKind};

    fn graph(ids: &[&str]) -> DependencyGraph {
        let nodes = ids
            .iter()
            .map(|id| GraphNode::new(*id, *id, NodeKind::File))
            .collect();
        let edges = ids
            .windows(2)
            .map(|pair| GraphEdge::new(pair[0], pair[1], "imports"))
            .collect();
        DependencyGraph::new(nodes, edges)
    }

    #[test]
    fn selection_follows_id_across_graph_swaps() {
        let mut canvas = GraphCanvas::new(Palette::dependency());
        canvas.set_graph(graph(&["a", "b", "c"]));
        assert!(canvas.select_by_id("c").is_some());

        canvas.set_graph(graph(&["c", "d"]));
        assert_eq!(canvas.selected_index(), Some(0));

        canvas.set_graph(graph(&["d"]));
        assert_eq!(canvas.selected_index(), None);
    }

    #[test]
    fn layout_runs_once_per_viewport() {
        let mut canvas = GraphCanvas::new(Palette::dependency());
        canvas.set_graph(graph(&["a", "b", "c"]));

        canvas.ensure_layout(Viewport::new(800.0, 600.0));
        let first = canvas.positions().to_vec();
        assert_eq!(first.len(), 3);

        canvas.ensure_layout(Viewport::new(800.0, 600.0));
        assert_eq!(canvas.positions(), first.as_slice());

        canvas.ensure_layout(Viewport::new(1200.0, 600.0));
        assert_ne!(canvas.positions(), first.as_slice());
    }

    #[test]
    fn clicking_a_laid_out_node_selects_it() {
        let mut canvas = GraphCanvas::new(Palette::rag());
        canvas.set_graph(graph(&["a", "b"]));
        canvas.ensure_layout(Viewport::new(800.0, 600.0));

        let target = canvas.positions()[1];
        let outcome = canvas.handle_event(PointerEvent::Clicked(target));
        assert_eq!(outcome.selected, Some(1));
        assert_eq!(canvas.selected_node().map(|node| node.id.as_str()), Some("b"));

        canvas.clear_selection();
        assert_eq!(canvas.selected_index(), None);
    }

    #[test]
    fn cursor_tracks_the_gesture() {
        let mut canvas = GraphCanvas::new(Palette::dependency());
        canvas.set_graph(graph(&["a", "b"]));
        canvas.ensure_layout(Viewport::new(800.0, 600.0));
        assert_eq!(canvas.cursor_icon(), None);

        let node = canvas.positions()[0];
        canvas.handle_event(PointerEvent::Pressed(node));
        assert_eq!(canvas.cursor_icon(), Some(egui::CursorIcon::PointingHand));
        canvas.handle_event(PointerEvent::Released(node));

        canvas.handle_event(PointerEvent::Pressed(Pos2::new(-500.0, -500.0)));
        assert_eq!(canvas.cursor_icon(), Some(egui::CursorIcon::Grabbing));
        canvas.handle_event(PointerEvent::Left);
        assert_eq!(canvas.cursor_icon(), None);
    }
}
