use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};

use super::super::ViewModel;

const WARNING_COLOR: Color32 = Color32::from_rgb(246, 206, 104);
const ERROR_COLOR: Color32 = Color32::from_rgb(241, 106, 94);

fn percent(ratio: Option<f32>) -> String {
    ratio.map_or_else(|| "n/a".to_owned(), |ratio| format!("{:.0}%", ratio * 100.0))
}

impl ViewModel {
    pub(in crate::app) fn draw_top_bar(
        &mut self,
        ui: &mut Ui,
        source: &str,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        let stats = &self.payload.stats;

        ui.horizontal(|ui| {
            ui.heading("depscope");
            ui.separator();
            ui.label(format!("source: {source}"));
            ui.label(format!("nodes: {}", stats.total_nodes));
            ui.label(format!("edges: {}", stats.total_edges));
            ui.label(format!(
                "files {}  functions {}  classes {}  imports {}  external {}",
                stats.files, stats.functions, stats.classes, stats.imports, stats.external_nodes
            ))
            .on_hover_text(
                stats
                    .edge_types
                    .iter()
                    .map(|(relation, count)| format!("{relation}: {count}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );

            let reload_button = ui.add_enabled(!is_reloading, egui::Button::new("Reload"));
            if reload_button.clicked() {
                *reload_requested = true;
            }
            if is_reloading {
                ui.spinner();
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if let Some(node) = &self.hovered {
                    ui.label(format!("hover: {} ({})", node.label, node.kind.label()))
                        .on_hover_text(node.id.as_str());
                    ui.separator();
                }
                ui.label(format!(
                    "visible: {} nodes / {} edges",
                    self.summary.visible_nodes, self.summary.visible_edges
                ))
                .on_hover_text(format!(
                    "projected: {} nodes / {} edges",
                    self.summary.projected_nodes, self.summary.projected_edges
                ));
                if let Some(coverage) = self.payload.coverage {
                    ui.label(format!(
                        "coverage: entities {}  relationships {}",
                        percent(coverage.entity_ratio()),
                        percent(coverage.relationship_ratio())
                    ));
                }
            });
        });

        if stats.truncated {
            ui.label(
                RichText::new("Graph truncated by the analysis backend: showing a partial graph.")
                    .color(WARNING_COLOR),
            );
        }

        let mut dismiss = false;
        if let Some(error) = &self.reload_error {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("Reload failed, showing the previous graph: {error}"))
                        .color(ERROR_COLOR),
                );
                dismiss = ui.small_button("Dismiss").clicked();
            });
        }
        if dismiss {
            self.reload_error = None;
        }
    }
}
