//! Configuration for the result pipeline.

use super::pager::CursorPolicy;

/// Default number of flights per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration parameters for paging flight results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Number of flights per "load more" page.
    pub page_size: usize,

    /// How the next-page cursor is derived.
    pub cursor: CursorPolicy,
}

impl PipelineConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(page_size: usize, cursor: CursorPolicy) -> Self {
        Self { page_size, cursor }
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the cursor policy.
    pub fn with_cursor(mut self, cursor: CursorPolicy) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            cursor: CursorPolicy::LengthHeuristic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.cursor, CursorPolicy::LengthHeuristic);
    }

    #[test]
    fn custom_config() {
        let config = PipelineConfig::default()
            .with_page_size(25)
            .with_cursor(CursorPolicy::Exact);
        assert_eq!(config, PipelineConfig::new(25, CursorPolicy::Exact));
    }
}
