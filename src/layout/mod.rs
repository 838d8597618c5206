mod forces;

use std::f32::consts::TAU;
use std::time::Instant;

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use tracing::debug;

use forces::{apply_attraction, apply_centering, apply_repulsion, clamp_to_bounds};

pub const MIN_VIEWPORT: Vec2 = vec2(400.0, 300.0);

/// Tunables of the simulation. [`LayoutParams::default`] is the canonical set
/// every view uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub min_distance: f32,
    pub ideal_edge_length: f32,
    pub spring_stiffness: f32,
    pub center_pull: f32,
    pub padding: f32,
    pub initial_radius_ratio: f32,
    pub base_iterations: usize,
    pub iterations_per_node: usize,
    pub max_iterations: usize,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            min_distance: 80.0,
            ideal_edge_length: 120.0,
            spring_stiffness: 0.05,
            center_pull: 0.02,
            padding: 50.0,
            initial_radius_ratio: 0.35,
            base_iterations: 20,
            iterations_per_node: 5,
            max_iterations: 100,
        }
    }
}

impl LayoutParams {
    pub fn iterations_for(&self, node_count: usize) -> usize {
        self.base_iterations
            .saturating_add(self.iterations_per_node.saturating_mul(node_count))
            .min(self.max_iterations)
    }
}

/// Canvas size the layout is computed for, floored to [`MIN_VIEWPORT`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        let width = if width.is_finite() { width } else { 0.0 };
        let height = if height.is_finite() { height } else { 0.0 };
        Self {
            width: width.max(MIN_VIEWPORT.x),
            height: height.max(MIN_VIEWPORT.y),
        }
    }

    pub fn from_size(size: Vec2) -> Self {
        Self::new(size.x, size.y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn center(&self) -> Pos2 {
        pos2(self.width * 0.5, self.height * 0.5)
    }

    /// Region node centers are clamped into.
    pub fn bounds(&self, padding: f32) -> Rect {
        let padding = padding.min(self.width * 0.5).min(self.height * 0.5);
        Rect::from_min_max(
            pos2(padding, padding),
            pos2(self.width - padding, self.height - padding),
        )
    }
}

/// Node `i` of `n` on a circle around the viewport center, starting at angle 0.
pub fn initial_positions(node_count: usize, viewport: Viewport, params: &LayoutParams) -> Vec<Pos2> {
    let center = viewport.center();
    let radius = params.initial_radius_ratio * viewport.width().min(viewport.height());

    (0..node_count)
        .map(|index| {
            let angle = (index as f32 / node_count as f32) * TAU;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

pub fn force_layout(node_count: usize, links: &[(usize, usize)], viewport: Viewport) -> Vec<Pos2> {
    force_layout_with(&LayoutParams::default(), node_count, links, viewport)
}

/// Runs the simulation to completion and returns one position per node.
///
/// Output depends only on `node_count`, the order of `links` and the
/// viewport: there is no randomness. Each iteration applies repulsion,
/// spring attraction and centering scaled by a linearly decaying `alpha`, then
/// clamps every node into the padded viewport.
pub fn force_layout_with(
    params: &LayoutParams,
    node_count: usize,
    links: &[(usize, usize)],
    viewport: Viewport,
) -> Vec<Pos2> {
    let mut positions = initial_positions(node_count, viewport, params);
    if node_count == 0 {
        return positions;
    }

    let started = Instant::now();
    let iterations = params.iterations_for(node_count);
    let center = viewport.center();
    let bounds = viewport.bounds(params.padding);

    for iteration in 0..iterations {
        let alpha = 1.0 - (iteration as f32 / iterations as f32);

        apply_repulsion(&mut positions, params.min_distance, alpha);
        apply_attraction(
            &mut positions,
            links,
            params.ideal_edge_length,
            params.spring_stiffness,
            alpha,
        );
        apply_centering(&mut positions, center, params.center_pull, alpha);
        clamp_to_bounds(&mut positions, bounds);
    }

    debug!(
        nodes = node_count,
        links = links.len(),
        iterations,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "force layout finished"
    );

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_count_scales_then_caps() {
        let params = LayoutParams::default();
        assert_eq!(params.iterations_for(0), 20);
        assert_eq!(params.iterations_for(5), 45);
        assert_eq!(params.iterations_for(16), 100);
        assert_eq!(params.iterations_for(5_000), 100);
    }

    #[test]
    fn viewport_is_floored() {
        let viewport = Viewport::new(120.0, f32::NAN);
        assert_eq!(viewport.width(), 400.0);
        assert_eq!(viewport.height(), 300.0);
        assert_eq!(viewport.center(), pos2(200.0, 150.0));
    }

    #[test]
    fn initial_placement_is_a_circle() {
        let viewport = Viewport::new(800.0, 600.0);
        let positions = initial_positions(4, viewport, &LayoutParams::default());
        let radius = 0.35 * 600.0;

        assert!((positions[0].x - (400.0 + radius)).abs() < 1e-3);
        assert!((positions[0].y - 300.0).abs() < 1e-3);
        assert!((positions[1].y - (300.0 + radius)).abs() < 1e-3);
        for position in positions {
            assert!((position.distance(viewport.center()) - radius).abs() < 1e-3);
        }
    }

    #[test]
    fn empty_graph_has_no_positions() {
        assert!(force_layout(0, &[], Viewport::new(800.0, 600.0)).is_empty());
    }

    #[test]
    fn single_node_drifts_toward_center() {
        let viewport = Viewport::new(800.0, 600.0);
        let start = initial_positions(1, viewport, &LayoutParams::default())[0];
        let end = force_layout(1, &[], viewport)[0];
        assert!(end.distance(viewport.center()) < start.distance(viewport.center()));
    }
}
