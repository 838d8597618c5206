use std::collections::BTreeSet;

use eframe::egui::{self, RichText, Ui};

use depscope::impact::ImpactMode;
use depscope::model::{EdgeKind, NodeKind};
use depscope::projection::ViewMode;
use depscope::render::PaletteKind;

use super::super::ViewModel;

const MAX_IMPACT_DEPTH: usize = 10;

/// Checkbox over a "keep these" set where an empty set means "keep all".
fn toggle_in_keep_set<T: Ord + Clone>(set: &mut BTreeSet<T>, all: &[T], item: &T, keep: bool) {
    if set.is_empty() {
        set.extend(all.iter().cloned());
    }
    if keep {
        set.insert(item.clone());
    } else {
        set.remove(item);
    }
    if all.iter().all(|entry| set.contains(entry)) {
        set.clear();
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        egui::ScrollArea::vertical()
            .id_salt("controls_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let mut changed = false;

                changed |= self.draw_projection_controls(ui);
                ui.separator();
                changed |= self.draw_filter_controls(ui);
                ui.separator();
                changed |= self.draw_visible_controls(ui);
                ui.separator();
                self.draw_view_controls(ui);

                if changed {
                    self.graph_dirty = true;
                }
            });
    }

    fn draw_projection_controls(&mut self, ui: &mut Ui) -> bool {
        let mut changed = false;

        ui.label(RichText::new("Projection").strong());
        ui.horizontal(|ui| {
            for mode in [ViewMode::File, ViewMode::Symbol] {
                changed |= ui
                    .selectable_value(&mut self.projection.view_mode, mode, mode.label())
                    .changed();
            }
        });

        changed |= ui
            .checkbox(&mut self.projection.include_external, "Include external modules")
            .on_hover_text("Keep third-party modules and the edges into them.")
            .changed();
        changed |= ui
            .checkbox(&mut self.projection.include_isolated, "Include isolated nodes")
            .on_hover_text("Keep nodes that have no remaining edges.")
            .changed();

        changed
    }

    fn draw_filter_controls(&mut self, ui: &mut Ui) -> bool {
        let mut changed = false;

        ui.label(RichText::new("Filters").strong());
        ui.label("Search");
        changed |= ui
            .text_edit_singleline(&mut self.filters.search)
            .on_hover_text("Fuzzy match on label, id and file path.")
            .changed();

        ui.label("File path pattern");
        changed |= ui
            .text_edit_singleline(&mut self.filters.path_pattern)
            .on_hover_text("Substring, or a whole-path pattern using * and ?.")
            .changed();

        ui.collapsing("Node types", |ui| {
            for kind in NodeKind::FILTERABLE {
                let mut keep = self.filters.keeps_kind(kind);
                if ui.checkbox(&mut keep, kind.label()).changed() {
                    self.filters.set_kind_kept(kind, keep);
                    changed = true;
                }
            }
        });

        ui.collapsing("Edge types", |ui| {
            if self.relations.is_empty() {
                ui.label("No edges in the current projection.");
                return;
            }

            let all = self.relations.iter().cloned().collect::<Vec<_>>();
            for relation in &all {
                let mut keep =
                    self.filters.relations.is_empty() || self.filters.relations.contains(relation);
                let text = format!("{} ({})", relation, EdgeKind::from_relation(relation).label());
                if ui.checkbox(&mut keep, text).changed() {
                    toggle_in_keep_set(&mut self.filters.relations, &all, relation, keep);
                    changed = true;
                }
            }
        });

        changed
    }

    fn draw_visible_controls(&mut self, ui: &mut Ui) -> bool {
        let mut changed = false;

        ui.label(RichText::new("Visible nodes").strong());
        ui.label(format!(
            "Showing {} of {} matching nodes",
            self.summary.visible_nodes, self.summary.matched_nodes
        ));

        ui.horizontal(|ui| {
            let more = ui.add_enabled(
                self.summary.hidden_nodes > 0,
                egui::Button::new(format!("Show more (+{})", self.visible_step)),
            );
            if more.clicked() {
                self.filters.show_more(self.visible_step);
                changed = true;
            }
            if ui.button("Show all").clicked() && self.summary.hidden_nodes > 0 {
                self.filters.visible_limit = self.summary.matched_nodes;
                changed = true;
            }
        });

        changed
    }

    fn draw_view_controls(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("View").strong());

        let previous_palette = self.palette_kind;
        egui::ComboBox::from_label("Palette")
            .selected_text(self.palette_kind.label())
            .show_ui(ui, |ui| {
                for kind in PaletteKind::ALL {
                    ui.selectable_value(&mut self.palette_kind, kind, kind.label());
                }
            });
        if self.palette_kind != previous_palette {
            self.canvas.set_palette(self.palette_kind.palette());
        }

        egui::ComboBox::from_label("Impact")
            .selected_text(self.impact_mode.label())
            .show_ui(ui, |ui| {
                for mode in ImpactMode::ALL {
                    ui.selectable_value(&mut self.impact_mode, mode, mode.label());
                }
            })
            .response
            .on_hover_text("Highlight what the selected node reaches, or what reaches it.");
        ui.add_enabled(
            self.impact_mode != ImpactMode::Off,
            egui::Slider::new(&mut self.impact_depth, 1..=MAX_IMPACT_DEPTH).text("Impact depth"),
        );

        ui.horizontal(|ui| {
            if ui.button("Reset camera").on_hover_text("Shortcut: R").clicked() {
                self.canvas.reset_camera();
            }
            ui.label(format!("zoom {:.0}%", self.canvas.view_state().camera.scale * 100.0));
        });

        ui.add_space(6.0);
        ui.label(RichText::new("Legend").strong());
        let palette = self.palette_kind.palette();
        for (kind, colors) in palette.legend() {
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(colors.fill));
                ui.label(kind.label());
            });
        }
        ui.horizontal(|ui| {
            ui.label(RichText::new("●").color(palette.default_node.fill));
            ui.label("other");
        });
    }
}
