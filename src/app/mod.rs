use std::collections::{BTreeSet, HashSet};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{debug, info, warn};

use depscope::canvas::{CanvasResponse, GraphCanvas};
use depscope::config::GraphOptions;
use depscope::filter::FilterOptions;
use depscope::impact::{DEFAULT_IMPACT_DEPTH, ImpactMode};
use depscope::model::GraphNode;
use depscope::projection::ProjectionOptions;
use depscope::render::PaletteKind;
use depscope::source::{GraphPayload, LoadRequest, load_graph};

mod pipeline;
mod ui;

type LoadResult = Result<GraphPayload, String>;

pub struct ExplorerApp {
    options: GraphOptions,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    payload: GraphPayload,
    projection: ProjectionOptions,
    filters: FilterOptions,
    visible_step: usize,
    palette_kind: PaletteKind,
    impact_mode: ImpactMode,
    impact_depth: usize,
    canvas: GraphCanvas,
    graph_dirty: bool,
    highlight_key: Option<HighlightKey>,
    summary: PipelineSummary,
    /// Relation tags present after projection, offered as edge-type filters.
    relations: BTreeSet<String>,
    /// Node under the pointer as last reported by the canvas.
    hovered: Option<GraphNode>,
    reload_error: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HighlightKey {
    selected: Option<usize>,
    mode: ImpactMode,
    depth: usize,
}

#[derive(Clone, Copy, Debug, Default)]
struct PipelineSummary {
    projected_nodes: usize,
    projected_edges: usize,
    matched_nodes: usize,
    hidden_nodes: usize,
    visible_nodes: usize,
    visible_edges: usize,
    highlighted: usize,
}

impl ExplorerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: GraphOptions) -> Self {
        let state = Self::start_load(options.load_request());
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(request: LoadRequest) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_graph(&request).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(request: LoadRequest) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(request),
        }
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(payload)) => {
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            payload,
                            &self.options,
                        ))));
                    }
                    Ok(Err(error)) => {
                        warn!(%error, "graph load failed");
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading dependency graph from {}...", self.options.input));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load dependency graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.options.load_request()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                let source = self.options.input.to_string();
                model.show(ctx, &source, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    info!(input = %self.options.input, "reloading graph payload");
                    self.reload_rx = Some(Self::spawn_load(self.options.load_request()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => model.apply_reload(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => model.apply_reload(Err(
                            "Background load worker disconnected".to_owned(),
                        )),
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(payload: GraphPayload, options: &GraphOptions) -> Self {
        Self {
            payload,
            projection: options.projection(),
            filters: options.filters(),
            visible_step: options.visible_step.max(1),
            palette_kind: options.palette,
            impact_mode: ImpactMode::Off,
            impact_depth: DEFAULT_IMPACT_DEPTH,
            canvas: GraphCanvas::new(options.palette.palette()),
            graph_dirty: true,
            highlight_key: None,
            summary: PipelineSummary::default(),
            relations: BTreeSet::new(),
            hovered: None,
            reload_error: None,
        }
    }

    /// Takes a finished reload. A new payload replaces the old one and keeps
    /// every view option; a failure leaves the current graph on screen.
    fn apply_reload(&mut self, result: LoadResult) {
        match result {
            Ok(payload) => {
                info!(nodes = payload.nodes.len(), "reloaded graph payload");
                self.payload = payload;
                self.reload_error = None;
                self.graph_dirty = true;
            }
            Err(error) => {
                warn!(%error, "reload failed, keeping previous graph");
                self.reload_error = Some(error);
            }
        }
    }

    fn show(&mut self, ctx: &Context, source: &str, reload_requested: &mut bool, is_reloading: bool) {
        if self.graph_dirty {
            self.rebuild_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, source, reload_requested, is_reloading));

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = self.canvas.show(ui);
            self.note_canvas_response(response);
        });

        // Selection can change inside the canvas or the details panel.
        self.refresh_highlight();
    }

    fn note_canvas_response(&mut self, response: CanvasResponse) {
        if let Some(node) = response.clicked {
            debug!(id = %node.id, kind = node.kind.label(), "node selected");
        }
        if let Some(hovered) = response.hover_changed {
            self.hovered = hovered;
        }
    }

    fn set_highlighted(&mut self, highlighted: HashSet<usize>) {
        self.summary.highlighted = highlighted.len();
        self.canvas.set_highlighted(highlighted);
    }
}
