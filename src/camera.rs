use eframe::egui::emath::TSTransform;
use eframe::egui::{Pos2, Vec2};

pub const MIN_SCALE: f32 = 0.3;
pub const MAX_SCALE: f32 = 3.0;
pub const WHEEL_ZOOM_IN: f32 = 1.1;
pub const WHEEL_ZOOM_OUT: f32 = 0.9;
/// World-space pick radius. Matches the enlarged node radius and ignores
/// hover growth, so the edge of a hovered node can still miss.
pub const HIT_RADIUS: f32 = 25.0;

/// Pan/zoom state mapping world (layout) coordinates to canvas-local screen
/// coordinates: `screen = world * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub scale: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    pub fn screen_to_world(&self, screen: Pos2) -> Pos2 {
        ((screen - self.offset.to_pos2()) / self.scale).to_pos2()
    }

    pub fn world_to_screen(&self, world: Pos2) -> Pos2 {
        (world.to_vec2() * self.scale + self.offset).to_pos2()
    }

    /// Scales by `factor` while keeping the world point under `screen` fixed.
    pub fn zoom_at(&mut self, screen: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }

        let old_scale = self.scale;
        let new_scale = (old_scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / old_scale;
        let anchor = screen.to_vec2();

        self.offset = anchor - (anchor - self.offset) * ratio;
        self.scale = new_scale;
    }

    /// Wheel notches zoom by a fixed factor; positive `delta_y` scrolls toward the user.
    pub fn zoom_for_wheel(&mut self, screen: Pos2, delta_y: f32) -> bool {
        if delta_y.abs() <= f32::EPSILON {
            return false;
        }

        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        let before = *self;
        self.zoom_at(screen, factor);
        *self != before
    }

    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Transform for painting world-space shapes into a canvas whose top-left
    /// corner sits at `origin` in window coordinates.
    pub fn to_transform(&self, origin: Pos2) -> TSTransform {
        TSTransform::new(origin.to_vec2() + self.offset, self.scale)
    }
}

/// First node, in slice order, whose center lies within [`HIT_RADIUS`] of the
/// world point under `screen`.
pub fn hit_test(camera: &Camera, positions: &[Pos2], screen: Pos2) -> Option<usize> {
    let world = camera.screen_to_world(screen);
    let radius_sq = HIT_RADIUS * HIT_RADIUS;
    positions
        .iter()
        .position(|position| (*position - world).length_sq() < radius_sq)
}
