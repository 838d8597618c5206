use eframe::egui::Color32;

use crate::model::{EdgeKind, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeColors {
    pub fill: Color32,
    pub stroke: Color32,
}

impl NodeColors {
    const fn new(fill: Color32, stroke: Color32) -> Self {
        Self { fill, stroke }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PaletteKind {
    /// File, function, class, variable and import colors.
    #[default]
    Dependency,
    /// Adds module, method and external module colors.
    Rag,
}

impl PaletteKind {
    pub const ALL: [PaletteKind; 2] = [PaletteKind::Dependency, PaletteKind::Rag];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dependency => "Dependency",
            Self::Rag => "RAG",
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Self::Dependency => Palette::dependency(),
            Self::Rag => Palette::rag(),
        }
    }
}

/// Color tables for one view. Kinds without an entry use the default pair.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    nodes: Vec<(NodeKind, NodeColors)>,
    edges: Vec<(EdgeKind, Color32)>,
    pub default_node: NodeColors,
    pub default_edge: Color32,
    pub background: Color32,
    pub grid: Color32,
    /// Stroke of hovered and selected nodes.
    pub focus_stroke: Color32,
    pub label: Color32,
}

impl Palette {
    pub fn dependency() -> Self {
        Self {
            nodes: vec![
                (
                    NodeKind::File,
                    NodeColors::new(Color32::from_rgb(59, 130, 246), Color32::from_rgb(29, 78, 216)),
                ),
                (
                    NodeKind::Function,
                    NodeColors::new(Color32::from_rgb(16, 185, 129), Color32::from_rgb(4, 120, 87)),
                ),
                (
                    NodeKind::Class,
                    NodeColors::new(Color32::from_rgb(245, 158, 11), Color32::from_rgb(180, 83, 9)),
                ),
                (
                    NodeKind::Variable,
                    NodeColors::new(Color32::from_rgb(139, 92, 246), Color32::from_rgb(109, 40, 217)),
                ),
                (
                    NodeKind::Import,
                    NodeColors::new(Color32::from_rgb(236, 72, 153), Color32::from_rgb(190, 24, 93)),
                ),
            ],
            edges: vec![
                (EdgeKind::Imports, Color32::from_rgb(96, 165, 250)),
                (EdgeKind::Calls, Color32::from_rgb(52, 211, 153)),
                (EdgeKind::Extends, Color32::from_rgb(251, 191, 36)),
                (EdgeKind::Uses, Color32::from_rgb(167, 139, 250)),
            ],
            default_node: NodeColors::new(Color32::from_rgb(107, 114, 128), Color32::from_rgb(75, 85, 99)),
            default_edge: Color32::from_rgb(148, 163, 184),
            background: Color32::from_rgb(19, 23, 29),
            grid: Color32::from_rgba_unmultiplied(60, 70, 80, 70),
            focus_stroke: Color32::from_rgb(245, 245, 245),
            label: Color32::from_gray(238),
        }
    }

    pub fn rag() -> Self {
        let mut palette = Self::dependency();
        palette.nodes.extend([
            (
                NodeKind::Module,
                NodeColors::new(Color32::from_rgb(6, 182, 212), Color32::from_rgb(14, 116, 144)),
            ),
            (
                NodeKind::Method,
                NodeColors::new(Color32::from_rgb(132, 204, 22), Color32::from_rgb(77, 124, 15)),
            ),
            (
                NodeKind::ExternalModule,
                NodeColors::new(Color32::from_rgb(239, 68, 68), Color32::from_rgb(185, 28, 28)),
            ),
        ]);
        palette.background = Color32::from_rgb(26, 26, 46);
        palette
    }

    pub fn node_colors(&self, kind: NodeKind) -> NodeColors {
        self.nodes
            .iter()
            .find(|(entry, _)| *entry == kind)
            .map(|(_, colors)| *colors)
            .unwrap_or(self.default_node)
    }

    pub fn edge_color(&self, kind: EdgeKind) -> Color32 {
        self.edges
            .iter()
            .find(|(entry, _)| *entry == kind)
            .map(|(_, color)| *color)
            .unwrap_or(self.default_edge)
    }

    /// Kinds with a dedicated color, for the legend.
    pub fn legend(&self) -> impl Iterator<Item = (NodeKind, NodeColors)> + '_ {
        self.nodes.iter().copied()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::dependency()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kinds_use_default_pair() {
        let palette = Palette::dependency();
        assert_eq!(palette.node_colors(NodeKind::Unknown), palette.default_node);
        assert_eq!(palette.node_colors(NodeKind::Method), palette.default_node);
        assert_eq!(palette.edge_color(EdgeKind::Other), palette.default_edge);
    }

    #[test]
    fn rag_extends_dependency_colors() {
        let dependency = Palette::dependency();
        let rag = Palette::rag();
        assert_eq!(rag.node_colors(NodeKind::File), dependency.node_colors(NodeKind::File));
        assert_ne!(rag.node_colors(NodeKind::Method), rag.default_node);
        assert_eq!(rag.legend().count(), NodeKind::ALL.len());
    }
}
