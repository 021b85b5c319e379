//! Result pipeline error types.

/// Errors surfaced by a search session's result pipeline.
///
/// Errors are local to one session and kept in its `Error` state, so they
/// are cloneable and carry messages rather than sources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The upstream flight search failed
    #[error("failed to fetch flights: {0}")]
    Fetch(String),

    /// A page backend failed to supply a page
    #[error("failed to load page at offset {offset}: {message}")]
    Page { offset: usize, message: String },
}

impl PipelineError {
    /// Whether this error came from the upstream fetch rather than paging.
    pub fn is_fetch(&self) -> bool {
        matches!(self, PipelineError::Fetch(_))
    }
}
