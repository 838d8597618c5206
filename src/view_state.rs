use std::collections::HashSet;

use crate::camera::Camera;

/// Everything the renderer and hit-testing need beyond the graph itself.
///
/// Indices refer to the node order of the graph currently on the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub camera: Camera,
    pub hovered: Option<usize>,
    pub selected: Option<usize>,
    /// Supplied from outside (impact analysis); emphasis only.
    pub highlighted: HashSet<usize>,
}

impl ViewState {
    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered == Some(index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    pub fn is_highlighted(&self, index: usize) -> bool {
        self.highlighted.contains(&index)
    }

    pub fn is_enlarged(&self, index: usize) -> bool {
        self.is_hovered(index) || self.is_selected(index)
    }

    pub fn has_focus(&self) -> bool {
        self.selected.is_some() || !self.highlighted.is_empty()
    }

    /// Edges touching the selection, or joining two highlighted nodes, are drawn at full strength.
    pub fn is_edge_emphasized(&self, source: usize, target: usize) -> bool {
        self.is_selected(source)
            || self.is_selected(target)
            || (self.is_highlighted(source) && self.is_highlighted(target))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.highlighted.clear();
    }

    /// Drops every index-based field; the camera survives graph swaps.
    pub fn forget_nodes(&mut self) {
        self.hovered = None;
        self.selected = None;
        self.highlighted.clear();
    }
}
