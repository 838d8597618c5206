use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::epaint::Mesh;
use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

const GLOW_SEGMENTS: u32 = 32;
const LOOP_SEGMENTS: u32 = 24;
const LOOP_RADIUS_RATIO: f32 = 0.6;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Grid that pans and scales with the camera. `origin` is the screen position
/// of the world origin.
pub(super) fn draw_background(
    painter: &Painter,
    rect: Rect,
    origin: Pos2,
    zoom: f32,
    fill: Color32,
    line: Color32,
) {
    painter.rect_filled(rect, 0.0, fill);

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let stroke = Stroke::new(1.0, line);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

/// Triangle pointing at `target`, its tip pulled back by `target_radius` so it
/// sits on the rim of the target glyph. `None` for zero-length edges.
pub(super) fn arrowhead(source: Pos2, target: Pos2, target_radius: f32, size: f32) -> Option<[Pos2; 3]> {
    let delta = target - source;
    let length = delta.length();
    if length <= target_radius + f32::EPSILON {
        return None;
    }

    let direction = delta / length;
    let normal = vec2(-direction.y, direction.x) * (size * 0.5);
    let tip = target - direction * target_radius;
    let back = tip - direction * size;
    Some([tip, back + normal, back - normal])
}

/// End of the edge line, stopping at the base of the arrowhead.
pub(super) fn edge_end(source: Pos2, target: Pos2, target_radius: f32, size: f32) -> Pos2 {
    let delta: Vec2 = target - source;
    let length = delta.length();
    if length <= f32::EPSILON {
        return target;
    }
    let inset = (target_radius + size).min(length);
    target - delta / length * inset
}

/// Arc for an edge from a node to itself: a small circle sitting on top of the
/// node, drawn only outside the node's rim. Returns the arc polyline and an
/// arrowhead whose tip lands on the rim where the arc re-enters.
pub(super) fn self_loop(center: Pos2, node_radius: f32, size: f32) -> (Vec<Pos2>, [Pos2; 3]) {
    let loop_radius = node_radius * LOOP_RADIUS_RATIO;
    let loop_center = center - vec2(0.0, node_radius);
    // Angle at the loop center between "straight down" and either rim crossing.
    let crossing = (loop_radius / (2.0 * node_radius)).clamp(-1.0, 1.0).acos();
    let start = FRAC_PI_2 + crossing;
    let sweep = TAU - 2.0 * crossing;

    let point = |angle: f32| loop_center + vec2(angle.cos(), angle.sin()) * loop_radius;
    let points = (0..=LOOP_SEGMENTS)
        .map(|step| point(start + sweep * step as f32 / LOOP_SEGMENTS as f32))
        .collect::<Vec<_>>();

    let end = start + sweep;
    let tip = point(end);
    let direction = vec2(-end.sin(), end.cos());
    let normal = vec2(-direction.y, direction.x) * (size * 0.5);
    let back = tip - direction * size;

    (points, [tip, back + normal, back - normal])
}

/// Radial gradient disc fading from `color` at the center to transparent at `radius`.
pub(super) fn glow_mesh(center: Pos2, radius: f32, color: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);

    let rim = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 0);
    for segment in 0..GLOW_SEGMENTS {
        let angle = segment as f32 / GLOW_SEGMENTS as f32 * TAU;
        mesh.colored_vertex(center + vec2(angle.cos(), angle.sin()) * radius, rim);
    }

    for segment in 0..GLOW_SEGMENTS {
        let current = 1 + segment;
        let next = 1 + (segment + 1) % GLOW_SEGMENTS;
        mesh.add_triangle(0, current, next);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn arrowhead_sits_on_target_rim() {
        let [tip, left, right] =
            arrowhead(pos2(0.0, 0.0), pos2(100.0, 0.0), 20.0, 8.0).unwrap_or_default();
        assert!((tip - pos2(80.0, 0.0)).length() < 1e-4);
        assert!((left.x - 72.0).abs() < 1e-4);
        assert!((left.y.abs() - 4.0).abs() < 1e-4);
        assert!((right.y + left.y).abs() < 1e-4);
    }

    #[test]
    fn arrowhead_skips_overlapping_nodes() {
        assert!(arrowhead(pos2(5.0, 5.0), pos2(5.0, 5.0), 20.0, 8.0).is_none());
        assert!(arrowhead(pos2(0.0, 0.0), pos2(10.0, 0.0), 20.0, 8.0).is_none());
    }

    #[test]
    fn edge_end_never_overshoots_source() {
        assert_eq!(edge_end(pos2(0.0, 0.0), pos2(100.0, 0.0), 20.0, 8.0), pos2(72.0, 0.0));
        assert_eq!(edge_end(pos2(0.0, 0.0), pos2(10.0, 0.0), 20.0, 8.0), pos2(0.0, 0.0));
    }

    #[test]
    fn self_loop_stays_outside_the_node() {
        let center = pos2(50.0, 50.0);
        let (points, [tip, left, right]) = self_loop(center, 20.0, 8.0);

        assert_eq!(points.len(), LOOP_SEGMENTS as usize + 1);
        assert!(points.iter().all(|point| (*point - center).length() >= 20.0 - 1e-3));
        assert!(points.iter().any(|point| point.y < center.y - 20.0));
        assert!(((tip - center).length() - 20.0).abs() < 1e-3);
        assert!((left - tip).length() > 0.0 && (right - tip).length() > 0.0);
        assert!(((left - right).length() - 8.0).abs() < 1e-3);
    }

    #[test]
    fn glow_fades_to_transparent() {
        let mesh = glow_mesh(pos2(0.0, 0.0), 36.0, Color32::from_rgb(10, 20, 30));
        assert_eq!(mesh.vertices.len(), GLOW_SEGMENTS as usize + 1);
        assert_eq!(mesh.indices.len(), GLOW_SEGMENTS as usize * 3);
        assert_eq!(mesh.vertices[1].color.a(), 0);
        assert_eq!(mesh.vertices[0].color.a(), 255);
    }

    #[test]
    fn color_helpers() {
        let white = Color32::WHITE;
        assert_eq!(blend_color(white, Color32::BLACK, 1.0), Color32::BLACK);
        assert_eq!(with_alpha(white, 0.0).a(), 0);
        assert!(dim_color(white, 0.5).r() < 255);
    }
}
