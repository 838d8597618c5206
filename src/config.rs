use std::collections::BTreeSet;

use clap::Args;

use crate::filter::{DEFAULT_VISIBLE_NODES, DEFAULT_VISIBLE_STEP, FilterOptions};
use crate::projection::{ProjectionOptions, ViewMode};
use crate::render::PaletteKind;
use crate::source::{InputSource, LoadRequest};

/// Options recognized by the explorer. Everything except the input and the
/// server-side caps can be changed again from the controls panel.
#[derive(Clone, Debug, Args)]
pub struct GraphOptions {
    /// Graph payload as JSON, or `-` for stdin.
    #[arg(long, short, default_value = "graph.json")]
    pub input: InputSource,

    #[arg(long, value_enum, default_value_t = ViewMode::File)]
    pub view_mode: ViewMode,

    /// Keep external-module nodes and the edges that touch them.
    #[arg(long)]
    pub include_external: bool,

    /// Keep nodes left without any edge after projection.
    #[arg(long)]
    pub include_isolated: bool,

    /// Truncate the payload to this many nodes before projection.
    #[arg(long)]
    pub max_nodes: Option<usize>,

    /// Truncate the payload to this many edges before projection.
    #[arg(long)]
    pub max_edges: Option<usize>,

    #[arg(long, default_value = "")]
    pub search: String,

    /// Case-insensitive path filter; `*` and `?` wildcards match the whole path.
    #[arg(long, default_value = "")]
    pub path_pattern: String,

    /// Initial cap on nodes handed to the layout.
    #[arg(long, default_value_t = DEFAULT_VISIBLE_NODES)]
    pub visible_nodes: usize,

    /// How many more nodes "Show more" reveals.
    #[arg(long, default_value_t = DEFAULT_VISIBLE_STEP)]
    pub visible_step: usize,

    #[arg(long, value_enum, default_value_t = PaletteKind::Dependency)]
    pub palette: PaletteKind,
}

impl GraphOptions {
    pub fn load_request(&self) -> LoadRequest {
        LoadRequest {
            input: self.input.clone(),
            max_nodes: self.max_nodes,
            max_edges: self.max_edges,
        }
    }

    pub fn projection(&self) -> ProjectionOptions {
        ProjectionOptions {
            view_mode: self.view_mode,
            include_external: self.include_external,
            include_isolated: self.include_isolated,
        }
    }

    pub fn filters(&self) -> FilterOptions {
        FilterOptions {
            search: self.search.clone(),
            path_pattern: self.path_pattern.clone(),
            kinds: BTreeSet::new(),
            relations: BTreeSet::new(),
            visible_limit: self.visible_nodes.max(1),
        }
    }
}
