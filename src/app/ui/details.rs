use std::collections::BTreeSet;

use eframe::egui::{self, RichText, Ui};

use depscope::impact::ImpactMode;
use depscope::util::short_name;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(node) = self.canvas.selected_node().cloned() else {
            ui.label("Click a node in the graph to inspect it.");
            ui.small("Drag empty space to pan, scroll to zoom, Escape clears the selection.");
            return;
        };

        ui.label(RichText::new(node.label.as_str()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);

        ui.label(format!("Type: {}", node.kind.label()));
        if let Some(path) = &node.metadata.file_path {
            ui.label(format!("File: {path}"));
        }
        if let Some(language) = &node.metadata.language {
            ui.label(format!("Language: {language}"));
        }
        if let Some(lines) = node.metadata.line_count {
            ui.label(format!("Lines: {lines}"));
        }
        ui.label(format!("Dependencies: {}", node.dependencies.len()));
        ui.label(format!("Dependents: {}", node.dependents.len()));

        if self.impact_mode != ImpactMode::Off {
            ui.label(format!(
                "Impact ({}, depth {}): {} nodes",
                self.impact_mode.label(),
                self.impact_depth,
                self.summary.highlighted.saturating_sub(1)
            ));
        }

        if ui.button("Clear selection").clicked() {
            self.canvas.clear_selection();
            return;
        }

        let mut next_selection = None;

        ui.separator();
        ui.label(RichText::new("Depends on").strong());
        self.draw_node_links(ui, "dependencies_scroll", &node.dependencies, &mut next_selection);

        ui.separator();
        ui.label(RichText::new("Used by").strong());
        self.draw_node_links(ui, "dependents_scroll", &node.dependents, &mut next_selection);

        if let Some(id) = next_selection {
            self.canvas.select_by_id(&id);
        }
    }

    fn draw_node_links(
        &self,
        ui: &mut Ui,
        salt: &str,
        ids: &BTreeSet<String>,
        next_selection: &mut Option<String>,
    ) {
        if ids.is_empty() {
            ui.label("None.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt(salt)
            .max_height(240.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for id in ids {
                    let label = self
                        .canvas
                        .graph()
                        .index_of(id)
                        .and_then(|index| self.canvas.graph().node(index))
                        .map(|node| node.label.as_str())
                        .unwrap_or_else(|| short_name(id));

                    if ui.link(label).on_hover_text(id.as_str()).clicked() {
                        *next_selection = Some(id.clone());
                    }
                }
            });
    }
}
