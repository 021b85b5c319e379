//! Amadeus Self-Service flight-offers client.
//!
//! Authenticates with the OAuth client-credentials grant and keeps the
//! access token until shortly before it expires. A request rejected with
//! 401 drops the token and is retried once with a fresh one.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::FilterCriteria;
use crate::domain::Flight;

use super::FlightProvider;
use super::convert::convert_offers;
use super::error::ProviderError;
use super::types::{FlightOffersResponse, TokenResponse};

/// Default base URL for the Amadeus test environment.
const DEFAULT_BASE_URL: &str = "https://test.api.amadeus.com";

/// Default OAuth token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://test.api.amadeus.com/v1/security/oauth2/token";

/// Upper bound on offers per search.
const DEFAULT_MAX_RESULTS: u32 = 250;

/// Tokens are refreshed this long before they expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Longest lifetime honoured from a token response.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the Amadeus client.
#[derive(Debug, Clone)]
pub struct AmadeusConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Base URL for the API (defaults to the test environment)
    pub base_url: String,
    /// OAuth token endpoint
    pub token_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum offers requested per search
    pub max_results: u32,
}

impl AmadeusConfig {
    /// Create a new config with the given credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout_secs: 30,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom token endpoint.
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the maximum number of offers per search.
    pub fn with_max_results(mut self, n: u32) -> Self {
        self.max_results = n;
        self
    }
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    /// A token issued at `now` that lives `expires_in` seconds, capped at
    /// [`MAX_TOKEN_LIFETIME`].
    fn new(value: String, expires_in: u64, now: Instant) -> Self {
        let lifetime = Duration::from_secs(expires_in).min(MAX_TOKEN_LIFETIME);
        Self {
            value,
            expires_at: now.checked_add(lifetime).unwrap_or(now),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now.checked_add(TOKEN_EXPIRY_MARGIN)
            .is_some_and(|deadline| deadline < self.expires_at)
    }
}

/// Amadeus flight-offers client.
#[derive(Debug, Clone)]
pub struct AmadeusClient {
    http: reqwest::Client,
    config: AmadeusConfig,
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl AmadeusClient {
    /// Create a new client with the given configuration.
    pub fn new(config: AmadeusConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            token: Arc::new(Mutex::new(None)),
        })
    }

    /// Current access token, requesting a new one if needed.
    ///
    /// The lock is held across the token request so concurrent searches
    /// share one refresh.
    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut guard = self.token.lock().await;

        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Drop the cached token if it is still the one that was `rejected`.
    ///
    /// Another search may already have replaced it with a fresh token.
    async fn invalidate_token(&self, rejected: &str) {
        let mut guard = self.token.lock().await;
        if guard.as_ref().is_some_and(|t| t.value == rejected) {
            guard.take();
        }
    }

    async fn request_token(&self) -> Result<AccessToken, ProviderError> {
        if self.config.client_id.is_empty() {
            return Err(ProviderError::NotConfigured(
                "FLIGHTS_API_CLIENT_ID is not set".to_string(),
            ));
        }

        debug!(url = %self.config.token_url, "requesting access token");
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Json {
                message: e.to_string(),
            })?;

        info!(expires_in = token.expires_in, "obtained access token");
        Ok(AccessToken::new(
            token.access_token,
            token.expires_in,
            Instant::now(),
        ))
    }

    async fn request_offers(
        &self,
        criteria: &FilterCriteria,
        token: &str,
    ) -> Result<FlightOffersResponse, ProviderError> {
        let url = format!("{}/v2/shopping/flight-offers", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&offer_query(criteria, self.config.max_results))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Json {
            message: e.to_string(),
        })
    }
}

impl FlightProvider for AmadeusClient {
    async fn search_flights(&self, criteria: &FilterCriteria) -> Result<Vec<Flight>, ProviderError> {
        let token = self.access_token().await?;

        let response = match self.request_offers(criteria, &token).await {
            Err(ProviderError::Unauthorized) => {
                warn!("access token rejected, retrying with a new one");
                self.invalidate_token(&token).await;
                let token = self.access_token().await?;
                self.request_offers(criteria, &token).await?
            }
            other => other?,
        };

        let flights = convert_offers(&response);
        info!(
            origin = %criteria.origin(),
            destination = %criteria.destination(),
            offers = response.data.len(),
            flights = flights.len(),
            "fetched flight offers"
        );
        Ok(flights)
    }
}

/// Query parameters for a flight-offers search.
fn offer_query(criteria: &FilterCriteria, max_results: u32) -> Vec<(&'static str, String)> {
    let passengers = criteria.passengers();

    let mut query = vec![
        ("originLocationCode", criteria.origin().to_string()),
        ("destinationLocationCode", criteria.destination().to_string()),
        ("departureDate", criteria.departure_date().to_string()),
        ("adults", passengers.adults().to_string()),
    ];
    if let Some(date) = criteria.return_date() {
        query.push(("returnDate", date.to_string()));
    }
    if passengers.children() > 0 {
        query.push(("children", passengers.children().to_string()));
    }
    if passengers.infants() > 0 {
        query.push(("infants", passengers.infants().to_string()));
    }
    query.push(("nonStop", "false".to_string()));
    query.push(("max", max_results.to_string()));
    query
}
