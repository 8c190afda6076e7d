//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for geocoding.
//! Usage policy requires an identifying User-Agent on every request.

use crate::config::NominatimConfig;
use crate::error::{Error, Result};
use crate::geo::{GeoBackend, GeocodeResult};
use std::time::Duration;
use tracing::{debug, info};

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
    limit: usize,
}

impl NominatimBackend {
    /// Create a backend from configuration
    pub fn new(config: &NominatimConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }

    /// Create a backend against a specific base URL with default settings
    ///
    /// Useful for pointing at a mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let config = NominatimConfig {
            base_url: base_url.to_string(),
            ..NominatimConfig::default()
        };
        Self::new(&config)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?format=json&addressdetails=1&limit={}&q={}",
            self.base_url,
            self.limit,
            urlencoding::encode(query)
        )
    }

    fn reverse_url(&self, lat: f64, lng: f64) -> String {
        format!(
            "{}/reverse?format=json&lat={}&lon={}&addressdetails=1",
            self.base_url, lat, lng
        )
    }

    /// Send a GET and return the body of a successful response
    async fn get_body(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Provider(status));
        }

        Ok(response.text().await?)
    }
}

impl GeoBackend for NominatimBackend {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeResult>> {
        let url = self.search_url(query);
        info!(query, "Nominatim search");

        let body = self.get_body(&url).await?;
        let results: Vec<GeocodeResult> = serde_json::from_str(&body)?;

        debug!(query, count = results.len(), "Nominatim search returned");
        Ok(results)
    }

    async fn reverse(&self, lat: f64, lng: f64) -> Result<GeocodeResult> {
        let url = self.reverse_url(lat, lng);
        info!(lat, lng, "Nominatim reverse");

        let body = self.get_body(&url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
