use eframe::egui::{Pos2, Vec2};

use crate::camera::hit_test;
use crate::view_state::ViewState;

/// Canvas-local pointer input, already stripped of toolkit specifics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Pressed(Pos2),
    Moved(Pos2),
    Released(Pos2),
    /// Press and release without a drag in between.
    Clicked(Pos2),
    Left,
    Wheel { pos: Pos2, delta_y: f32 },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionOutcome {
    pub hover_changed: bool,
    /// Node picked by a click during this event.
    pub selected: Option<usize>,
    pub camera_changed: bool,
    /// The event must not scroll the surrounding page.
    pub consume_scroll: bool,
}

impl InteractionOutcome {
    pub fn needs_redraw(&self) -> bool {
        self.hover_changed || self.selected.is_some() || self.camera_changed
    }
}

/// Gesture state machine driving camera and selection.
///
/// Pressing on empty space starts a pan; pressing on a node does not (the
/// press is reserved, the click decides). Moving while not panning only
/// re-hit-tests hover. Releasing or leaving the canvas ends a pan.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    pan_anchor: Option<Vec2>,
    pressed_node: Option<usize>,
}

impl InteractionController {
    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    pub fn pressed_node(&self) -> Option<usize> {
        self.pressed_node
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        state: &mut ViewState,
        positions: &[Pos2],
    ) -> InteractionOutcome {
        let mut outcome = InteractionOutcome::default();

        match event {
            PointerEvent::Pressed(pos) => match hit_test(&state.camera, positions, pos) {
                Some(index) => {
                    self.pressed_node = Some(index);
                    self.pan_anchor = None;
                }
                None => {
                    self.pressed_node = None;
                    self.pan_anchor = Some(pos.to_vec2() - state.camera.offset);
                }
            },
            PointerEvent::Moved(pos) => {
                if let Some(anchor) = self.pan_anchor {
                    let offset = pos.to_vec2() - anchor;
                    if offset != state.camera.offset {
                        state.camera.offset = offset;
                        outcome.camera_changed = true;
                    }
                } else {
                    let hovered = hit_test(&state.camera, positions, pos);
                    if hovered != state.hovered {
                        state.hovered = hovered;
                        outcome.hover_changed = true;
                    }
                }
            }
            PointerEvent::Released(_) => self.end_gesture(),
            PointerEvent::Left => {
                self.end_gesture();
                if state.hovered.take().is_some() {
                    outcome.hover_changed = true;
                }
            }
            PointerEvent::Clicked(pos) => {
                if let Some(index) = hit_test(&state.camera, positions, pos) {
                    state.selected = Some(index);
                    outcome.selected = Some(index);
                }
                self.end_gesture();
            }
            PointerEvent::Wheel { pos, delta_y } => {
                outcome.camera_changed = state.camera.zoom_for_wheel(pos, delta_y);
                outcome.consume_scroll = true;
            }
        }

        outcome
    }

    fn end_gesture(&mut self) {
        self.pan_anchor = None;
        self.pressed_node = None;
    }
}
