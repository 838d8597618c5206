use std::f32::consts::TAU;

use eframe::egui::{Pos2, Rect, Vec2, vec2};

const COINCIDENT_EPSILON: f32 = 0.0001;

// Direction used when two nodes sit on the same point. Derived from the pair
// indices so the simulation stays reproducible.
fn fallback_direction(i: usize, j: usize) -> Vec2 {
    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin())
}

/// Unit direction from `from` to `to` and the distance floored to 1.
fn direction_and_distance(from: Pos2, to: Pos2, i: usize, j: usize) -> (Vec2, f32) {
    let delta = to - from;
    let raw = delta.length();
    let direction = if raw > COINCIDENT_EPSILON {
        delta / raw
    } else {
        fallback_direction(i, j)
    };
    (direction, raw.max(1.0))
}

/// Pushes every pair closer than `3 * min_distance` apart.
pub(super) fn apply_repulsion(positions: &mut [Pos2], min_distance: f32, alpha: f32) {
    let cutoff = min_distance * 3.0;
    let min_distance_sq = min_distance * min_distance;

    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let (direction, distance) = direction_and_distance(positions[i], positions[j], i, j);
            if distance >= cutoff {
                continue;
            }

            let force = (min_distance_sq / (distance * distance)) * alpha * 2.0;
            let push = direction * force;
            positions[i] -= push;
            positions[j] += push;
        }
    }
}

/// Linear spring toward `ideal_length` along every link.
pub(super) fn apply_attraction(
    positions: &mut [Pos2],
    links: &[(usize, usize)],
    ideal_length: f32,
    stiffness: f32,
    alpha: f32,
) {
    let node_count = positions.len();
    for &(source, target) in links {
        if source >= node_count || target >= node_count || source == target {
            continue;
        }

        let (direction, distance) =
            direction_and_distance(positions[source], positions[target], source, target);
        let force = (distance - ideal_length) * stiffness * alpha;
        let pull = direction * force;
        positions[source] += pull;
        positions[target] -= pull;
    }
}

pub(super) fn apply_centering(positions: &mut [Pos2], center: Pos2, strength: f32, alpha: f32) {
    let factor = strength * alpha;
    for position in positions.iter_mut() {
        *position += (center - *position) * factor;
    }
}

pub(super) fn clamp_to_bounds(positions: &mut [Pos2], bounds: Rect) {
    for position in positions.iter_mut() {
        position.x = position.x.clamp(bounds.min.x, bounds.max.x);
        position.y = position.y.clamp(bounds.min.y, bounds.max.y);
    }
}
