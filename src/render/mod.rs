mod palette;
mod utils;

use eframe::egui::epaint::CircleShape;
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};

use crate::camera::Camera;
use crate::model::DependencyGraph;
use crate::util::truncate_label;
use crate::view_state::ViewState;

pub use palette::{NodeColors, Palette, PaletteKind};

use self::utils::{
    arrowhead, blend_color, dim_color, draw_background, edge_end, glow_mesh, self_loop, with_alpha,
};

pub const NODE_RADIUS: f32 = 20.0;
pub const ENLARGED_NODE_RADIUS: f32 = 25.0;
pub const GLOW_RADIUS_RATIO: f32 = 1.8;
pub const ARROW_SIZE: f32 = 8.0;
const LABEL_FONT_SIZE: f32 = 11.0;
const MIN_LABEL_FONT_SIZE: f32 = 4.0;

const EDGE_WIDTH: f32 = 1.5;
const EMPHASIZED_EDGE_WIDTH: f32 = 2.5;
const EDGE_ALPHA: f32 = 0.6;
const DIMMED_EDGE_ALPHA: f32 = 0.25;

/// Text drawn centered on a node, in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeLabel {
    pub text: String,
    pub position: Pos2,
    pub color: Color32,
}

/// One frame of the graph in world coordinates, ready to be painted under any camera.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Line and arrowhead for every drawable edge, painted first.
    pub edges: Vec<Shape>,
    /// Glow halos and node circles, painted over the edges.
    pub nodes: Vec<Shape>,
    pub labels: Vec<NodeLabel>,
}

impl Scene {
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.nodes.is_empty() && self.labels.is_empty()
    }
}

pub fn node_radius(state: &ViewState, index: usize) -> f32 {
    if state.is_enlarged(index) {
        ENLARGED_NODE_RADIUS
    } else {
        NODE_RADIUS
    }
}

/// Builds the frame for `graph` at `positions` (parallel to the node list).
///
/// Nodes without a position are skipped along with their edges. When a
/// selection or highlight set exists, edges outside it are dimmed and nodes
/// outside it are faded; nothing is hidden.
pub fn build_scene(
    graph: &DependencyGraph,
    positions: &[Pos2],
    state: &ViewState,
    palette: &Palette,
) -> Scene {
    let mut scene = Scene::default();
    let focus = state.has_focus();

    for (edge, &(source, target)) in graph.edges().iter().zip(graph.links()) {
        let (Some(&start), Some(&end)) = (positions.get(source), positions.get(target)) else {
            continue;
        };
        let base = palette.edge_color(edge.kind);
        let (width, color) = if state.is_edge_emphasized(source, target) {
            (EMPHASIZED_EDGE_WIDTH, base)
        } else if focus {
            (EDGE_WIDTH, with_alpha(base, DIMMED_EDGE_ALPHA))
        } else {
            (EDGE_WIDTH, with_alpha(base, EDGE_ALPHA))
        };

        let target_radius = node_radius(state, target);
        if source == target {
            let (points, head) = self_loop(start, target_radius, ARROW_SIZE);
            scene.edges.push(Shape::line(points, Stroke::new(width, color)));
            scene
                .edges
                .push(Shape::convex_polygon(head.to_vec(), color, Stroke::NONE));
            continue;
        }

        scene.edges.push(Shape::line_segment(
            [start, edge_end(start, end, target_radius, ARROW_SIZE)],
            Stroke::new(width, color),
        ));
        if let Some(points) = arrowhead(start, end, target_radius, ARROW_SIZE) {
            scene
                .edges
                .push(Shape::convex_polygon(points.to_vec(), color, Stroke::NONE));
        }
    }

    for (index, node) in graph.nodes().iter().enumerate() {
        let Some(&position) = positions.get(index) else {
            continue;
        };

        let colors = palette.node_colors(node.kind);
        let hovered_or_selected = state.is_enlarged(index);
        let highlighted = state.is_highlighted(index);
        let radius = node_radius(state, index);

        if hovered_or_selected || highlighted {
            let glow = blend_color(colors.fill, Color32::WHITE, 0.15);
            scene.nodes.push(Shape::mesh(glow_mesh(
                position,
                radius * GLOW_RADIUS_RATIO,
                with_alpha(glow, 0.55),
            )));
        }

        let (fill, stroke) = if hovered_or_selected {
            (colors.fill, Stroke::new(3.0, palette.focus_stroke))
        } else if highlighted || !focus {
            (colors.fill, Stroke::new(2.0, colors.stroke))
        } else {
            (dim_color(colors.fill, 0.55), Stroke::new(2.0, dim_color(colors.stroke, 0.55)))
        };

        let mut circle = CircleShape::filled(position, radius, fill);
        circle.stroke = stroke;
        scene.nodes.push(Shape::Circle(circle));

        scene.labels.push(NodeLabel {
            text: truncate_label(&node.label).into_owned(),
            position,
            color: palette.label,
        });
    }

    scene
}

/// Paints `scene` into `rect` under `camera`, background grid first.
///
/// The camera transform is applied to copies of the shapes, so the painter
/// itself is left untouched for whatever is drawn after the canvas.
pub fn paint(painter: &Painter, rect: Rect, scene: &Scene, camera: &Camera, palette: &Palette) {
    let transform = camera.to_transform(rect.min);
    draw_background(
        painter,
        rect,
        transform * Pos2::ZERO,
        camera.scale,
        palette.background,
        palette.grid,
    );

    let shapes = scene.edges.iter().chain(&scene.nodes).cloned().map(|mut shape| {
        shape.transform(transform);
        shape
    });
    painter.extend(shapes);

    let font_size = LABEL_FONT_SIZE * camera.scale;
    if font_size < MIN_LABEL_FONT_SIZE {
        return;
    }
    for label in &scene.labels {
        painter.text(
            transform * label.position,
            Align2::CENTER_CENTER,
            &label.text,
            FontId::proportional(font_size),
            label.color,
        );
    }
}
