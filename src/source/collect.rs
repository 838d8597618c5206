use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::error::SourceError;

use super::parse::parse_payload;
use super::payload::GraphPayload;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    Path(PathBuf),
    Stdin,
}

impl FromStr for InputSource {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Ok(if value == "-" {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(value))
        })
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// What to fetch and the server-side caps to apply while fetching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    pub input: InputSource,
    pub max_nodes: Option<usize>,
    pub max_edges: Option<usize>,
}

pub fn load_graph(request: &LoadRequest) -> Result<GraphPayload> {
    info!(input = %request.input, "loading graph payload");

    let raw = read_input(&request.input)
        .with_context(|| format!("failed to read graph payload from {}", request.input))?;
    let mut payload = parse_payload(&raw)
        .with_context(|| format!("failed to parse graph payload from {}", request.input))?;

    if apply_caps(&mut payload, request.max_nodes, request.max_edges) {
        info!(
            max_nodes = ?request.max_nodes,
            max_edges = ?request.max_edges,
            "graph payload truncated by server-side caps"
        );
    }

    info!(
        nodes = payload.nodes.len(),
        edges = payload.edges.len(),
        truncated = payload.stats.truncated,
        "graph payload loaded"
    );
    Ok(payload)
}

fn read_input(input: &InputSource) -> std::result::Result<String, SourceError> {
    match input {
        InputSource::Path(path) => Ok(std::fs::read_to_string(path)?),
        InputSource::Stdin => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}

/// Truncates the payload the way the analysis backend does.
///
/// Edges that end up pointing at dropped nodes are kept; projection discards
/// them later. Returns `true` when anything was cut, which also marks the
/// payload as truncated.
pub fn apply_caps(
    payload: &mut GraphPayload,
    max_nodes: Option<usize>,
    max_edges: Option<usize>,
) -> bool {
    let mut truncated = false;

    if let Some(limit) = max_nodes
        && payload.nodes.len() > limit
    {
        debug!(from = payload.nodes.len(), to = limit, "capping nodes");
        payload.nodes.truncate(limit);
        truncated = true;
    }

    if let Some(limit) = max_edges
        && payload.edges.len() > limit
    {
        debug!(from = payload.edges.len(), to = limit, "capping edges");
        payload.edges.truncate(limit);
        truncated = true;
    }

    if truncated {
        payload.stats.truncated = true;
    }
    truncated
}
