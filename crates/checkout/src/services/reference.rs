//! Reference data for the checkout form.
//!
//! Card expiry months and years are computed locally; countries and regions
//! come from the backend's Spring Data REST endpoints and are cached with
//! `moka` because they practically never change.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use checkout_core::{Country, Region};
use chrono::Datelike;
use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::clock::Clock;
use crate::config::{CheckoutConfig, OrderApiConfig};
use crate::services::{authorize, body_excerpt};

const COUNTRIES_PATH: &str = "countries";
const REGIONS_SEARCH_PATH: &str = "states/search/findByCountryCode";
const CACHE_CAPACITY: u64 = 500;

/// Errors that can occur when fetching reference data.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Requested a month range starting outside 1..=12.
    #[error("Invalid start month: {0}")]
    InvalidMonth(u32),
}

/// Source of the reference lists the checkout form offers.
#[async_trait]
pub trait ReferenceData: Send + Sync {
    /// Valid card expiry months, from `start_month` through December.
    async fn credit_card_months(&self, start_month: u32) -> Result<Vec<u32>, ReferenceDataError>;

    /// Valid card expiry years, starting at the current year.
    async fn credit_card_years(&self) -> Result<Vec<i32>, ReferenceDataError>;

    /// All countries the store ships to.
    async fn countries(&self) -> Result<Vec<Country>, ReferenceDataError>;

    /// Regions belonging to the country with `country_code`.
    async fn regions(&self, country_code: &str) -> Result<Vec<Region>, ReferenceDataError>;
}

/// Months from `start_month` through December.
///
/// # Errors
///
/// Returns [`ReferenceDataError::InvalidMonth`] if `start_month` is not 1..=12.
pub fn months_from(start_month: u32) -> Result<Vec<u32>, ReferenceDataError> {
    if !(1..=12).contains(&start_month) {
        return Err(ReferenceDataError::InvalidMonth(start_month));
    }
    Ok((start_month..=12).collect())
}

/// `window` consecutive years starting at `current_year`.
#[must_use]
pub fn years_from(current_year: i32, window: u32) -> Vec<i32> {
    let window = i32::try_from(window).unwrap_or(i32::MAX);
    (0..window)
        .map_while(|offset| current_year.checked_add(offset))
        .collect()
}

// =============================================================================
// HttpReferenceDataClient
// =============================================================================

/// Cache key for reference lists.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Countries,
    Regions(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Countries(Vec<Country>),
    Regions(Vec<Region>),
}

/// Spring Data REST collection envelope: `{"_embedded": {"<resource>": [...]}}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Embedded<T> {
    #[serde(rename = "_embedded", default)]
    embedded: HashMap<String, Vec<T>>,
}

impl<T> Embedded<T> {
    /// The collection's items. Empty collections may omit the resource key
    /// or the whole envelope.
    fn into_items(self) -> Vec<T> {
        self.embedded.into_values().next().unwrap_or_default()
    }
}

/// Reference data client backed by the order backend.
#[derive(Clone)]
pub struct HttpReferenceDataClient {
    inner: Arc<HttpReferenceDataClientInner>,
}

struct HttpReferenceDataClientInner {
    client: reqwest::Client,
    api: OrderApiConfig,
    clock: Arc<dyn Clock>,
    card_year_window: u32,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl HttpReferenceDataClient {
    /// Create a new reference data client.
    #[must_use]
    pub fn new(config: &CheckoutConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = (config.reference_cache_ttl > Duration::ZERO).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.reference_cache_ttl)
                .build()
        });

        Self {
            inner: Arc::new(HttpReferenceDataClientInner {
                client: reqwest::Client::new(),
                api: config.api.clone(),
                clock,
                card_year_window: config.card_year_window,
                cache,
            }),
        }
    }

    /// Fetch a Spring Data REST collection and unwrap its envelope.
    async fn fetch_collection<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, ReferenceDataError> {
        let mut url = self
            .inner
            .api
            .endpoint(path)
            .map_err(|e| ReferenceDataError::Parse(format!("Invalid endpoint URL: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let request = authorize(self.inner.client.get(url), &self.inner.api);
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body_excerpt(&body, 500),
                "Reference data API returned non-success status"
            );
            return Err(ReferenceDataError::Api {
                status: status.as_u16(),
                message: body_excerpt(&body, 200),
            });
        }

        let envelope: Embedded<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body_excerpt(&body, 500),
                "Failed to parse reference data response"
            );
            ReferenceDataError::Parse(e.to_string())
        })?;

        Ok(envelope.into_items())
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }
}

#[async_trait]
impl ReferenceData for HttpReferenceDataClient {
    async fn credit_card_months(&self, start_month: u32) -> Result<Vec<u32>, ReferenceDataError> {
        months_from(start_month)
    }

    async fn credit_card_years(&self) -> Result<Vec<i32>, ReferenceDataError> {
        Ok(years_from(
            self.inner.clock.today().year(),
            self.inner.card_year_window,
        ))
    }

    #[instrument(skip(self))]
    async fn countries(&self) -> Result<Vec<Country>, ReferenceDataError> {
        if let Some(CacheValue::Countries(countries)) = self.cached(&CacheKey::Countries).await {
            debug!("Cache hit for countries");
            return Ok(countries);
        }

        let countries: Vec<Country> = self.fetch_collection(COUNTRIES_PATH, &[]).await?;
        self.store(CacheKey::Countries, CacheValue::Countries(countries.clone()))
            .await;
        Ok(countries)
    }

    #[instrument(skip(self), fields(country_code = %country_code))]
    async fn regions(&self, country_code: &str) -> Result<Vec<Region>, ReferenceDataError> {
        let key = CacheKey::Regions(country_code.to_string());
        if let Some(CacheValue::Regions(regions)) = self.cached(&key).await {
            debug!("Cache hit for regions");
            return Ok(regions);
        }

        let regions: Vec<Region> = self
            .fetch_collection(REGIONS_SEARCH_PATH, &[("code", country_code)])
            .await?;
        self.store(key, CacheValue::Regions(regions.clone())).await;
        Ok(regions)
    }
}
