use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;

use super::payload::{Coverage, GraphPayload, GraphStats, RawEdge, RawNode};

#[derive(Deserialize)]
struct RawPayload {
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
    #[serde(default)]
    stats: Option<GraphStats>,
    #[serde(default)]
    coverage: Option<Coverage>,
}

/// Parses a backend graph response.
///
/// Accepts either the bare `{ nodes, edges, stats?, coverage? }` object or the
/// same object wrapped under a `graph` key. Missing stats are computed from the
/// node and edge lists.
pub fn parse_payload(raw: &str) -> Result<GraphPayload, SourceError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let body = parsed
        .get("graph")
        .filter(|value| value.is_object())
        .unwrap_or(&parsed);

    if !body.get("nodes").is_some_and(Value::is_array) {
        return Err(SourceError::MissingNodes);
    }

    let raw = RawPayload::deserialize(body)?;
    let stats = match raw.stats {
        Some(stats) => stats,
        None => GraphStats::from_raw(&raw.nodes, &raw.edges),
    };

    Ok(GraphPayload {
        nodes: raw.nodes,
        edges: raw.edges,
        stats,
        coverage: raw.coverage,
    })
}
