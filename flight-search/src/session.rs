//! One user's flight search: a provider plus the result pipeline.
//!
//! The session performs the fetches the pipeline asks for. A new search
//! loads the first page as soon as its flights arrive; later pages are
//! loaded on demand.

use tracing::debug;

use crate::domain::{FilterCriteria, Flight, SortSpec};
use crate::provider::FlightProvider;
use crate::results::{FetchTicket, LoadState, PipelineConfig, PipelineError, ResultPipeline};

/// Drives a [`ResultPipeline`] from a [`FlightProvider`].
pub struct SearchSession<P> {
    provider: P,
    pipeline: ResultPipeline,
}

impl<P: FlightProvider> SearchSession<P> {
    pub fn new(provider: P, config: PipelineConfig) -> Self {
        Self::with_pipeline(provider, ResultPipeline::new(config))
    }

    /// Use a preconfigured pipeline (clock, page backend).
    pub fn with_pipeline(provider: P, pipeline: ResultPipeline) -> Self {
        Self { provider, pipeline }
    }

    /// Search with new criteria and load the first page.
    ///
    /// Unchanged criteria keep the current results.
    pub async fn search(&mut self, criteria: FilterCriteria) -> Result<(), PipelineError> {
        let Some(ticket) = self.pipeline.set_filter_criteria(criteria) else {
            debug!("criteria unchanged, keeping results");
            return Ok(());
        };
        self.fetch(ticket).await?;
        self.pipeline.load_more().await?;
        Ok(())
    }

    /// Load the next page.
    ///
    /// After a failed fetch this re-runs the search instead. Returns whether
    /// anything changed.
    pub async fn load_more(&mut self) -> Result<bool, PipelineError> {
        if let Some(ticket) = self.pipeline.retry_fetch() {
            self.fetch(ticket).await?;
            self.pipeline.load_more().await?;
            return Ok(true);
        }
        self.pipeline.load_more().await
    }

    /// Change the sort and load the first page of the new order.
    pub async fn set_sort(&mut self, sort: SortSpec) -> Result<bool, PipelineError> {
        if !self.pipeline.set_sort(sort) {
            return Ok(false);
        }
        self.pipeline.load_more().await?;
        Ok(true)
    }

    /// Change the page size and reload from the first page.
    pub async fn set_page_size(&mut self, page_size: usize) -> Result<bool, PipelineError> {
        if !self.pipeline.set_page_size(page_size) {
            return Ok(false);
        }
        self.pipeline.load_more().await?;
        Ok(true)
    }

    async fn fetch(&mut self, ticket: FetchTicket) -> Result<(), PipelineError> {
        let result = self
            .provider
            .search_flights(ticket.criteria())
            .await
            .map_err(PipelineError::from);
        let failure = result.as_ref().err().cloned();

        if !self.pipeline.complete_fetch(ticket, result) {
            return Ok(());
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn visible_items(&self) -> &[Flight] {
        self.pipeline.visible_items()
    }

    pub fn state(&self) -> &LoadState {
        self.pipeline.state()
    }

    pub fn has_more(&self) -> bool {
        self.pipeline.has_more()
    }

    pub fn pipeline(&self) -> &ResultPipeline {
        &self.pipeline
    }

    /// Mutable access, e.g. to register scroll hooks.
    pub fn pipeline_mut(&mut self) -> &mut ResultPipeline {
        &mut self.pipeline
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
