//! Caching layer for flight searches.
//!
//! Offers for the same criteria rarely change within a few minutes, and a
//! user re-sorting or paging never needs a second upstream request. Results
//! are cached per [`FilterCriteria`]; failures are not cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{FilterCriteria, Flight};
use crate::provider::{FlightProvider, ProviderError};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 500,
        }
    }
}

/// Flight provider with caching.
///
/// Wraps any [`FlightProvider`] and caches successful searches.
pub struct CachedFlightProvider<P> {
    inner: P,
    searches: MokaCache<FilterCriteria, Arc<Vec<Flight>>>,
}

impl<P> CachedFlightProvider<P> {
    /// Create a new cached provider.
    pub fn new(inner: P, config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, searches }
    }

    /// Access the underlying provider for requests that bypass the cache.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.searches.invalidate_all();
    }
}

impl<P: FlightProvider> FlightProvider for CachedFlightProvider<P> {
    async fn search_flights(&self, criteria: &FilterCriteria) -> Result<Vec<Flight>, ProviderError> {
        if let Some(cached) = self.searches.get(criteria).await {
            debug!(origin = %criteria.origin(), destination = %criteria.destination(), "search cache hit");
            return Ok(cached.as_ref().clone());
        }

        let flights = self.inner.search_flights(criteria).await?;
        self.searches
            .insert(criteria.clone(), Arc::new(flights.clone()))
            .await;

        Ok(flights)
    }
}
