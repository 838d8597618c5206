use thiserror::Error;

/// Failures at the boundary with the code-analysis collaborator.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read graph payload: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("graph payload has no `nodes` array")]
    MissingNodes,
}
