//! Device positioning
//!
//! A single-shot "where am I" operation over a pluggable [`PositionSource`].
//! The bundled source approximates the position from the public IP address
//! (ip-api.com) and keeps a small file cache so that repeated calls within the
//! accepted maximum age do not hit the network.

use crate::config::LocationConfig;
use crate::constants::api::IP_API_URL;
use crate::constants::position::{CACHE_FILE, MAXIMUM_AGE_SECS, TIMEOUT_SECS};
use crate::coord::Coordinates;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Why a positioning request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum PositionErrorKind {
    #[error("Location permission denied. Please enable location permissions and try again")]
    PermissionDenied,
    #[error("Location information is unavailable. Check your connection and try again")]
    PositionUnavailable,
    #[error("Location request timed out. Please try again")]
    Timeout,
}

/// Options for a single positioning request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    /// Ask the source for its most precise fix
    pub enable_high_accuracy: bool,
    /// Give up after this long
    pub timeout: Duration,
    /// A cached position at most this old is acceptable
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(TIMEOUT_SECS),
            maximum_age: Duration::from_secs(MAXIMUM_AGE_SECS),
        }
    }
}

impl From<&LocationConfig> for PositionOptions {
    fn from(config: &LocationConfig) -> Self {
        Self {
            enable_high_accuracy: config.high_accuracy,
            timeout: Duration::from_secs(config.timeout_secs),
            maximum_age: Duration::from_secs(config.maximum_age_secs),
        }
    }
}

/// A position fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub coords: Coordinates,
    /// Accuracy radius in meters, when the source knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn new(coords: Coordinates) -> Self {
        Self {
            coords,
            accuracy: None,
            timestamp: Utc::now(),
        }
    }

    /// Whether the fix is no older than `maximum_age`
    pub fn is_fresh(&self, maximum_age: Duration) -> bool {
        let Ok(max) = chrono::Duration::from_std(maximum_age) else {
            return true;
        };
        Utc::now().signed_duration_since(self.timestamp) <= max
    }
}

/// Trait for position sources
pub trait PositionSource: Send + Sync {
    /// Acquire one position fix
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl std::future::Future<Output = std::result::Result<Position, PositionErrorKind>> + Send;
}

/// Resolve the current location once
///
/// The timeout in `options` is enforced here regardless of how the source
/// behaves. A fix with out-of-range coordinates counts as unavailable.
pub async fn get_current_location<S: PositionSource>(
    source: &S,
    options: &PositionOptions,
) -> Result<Coordinates> {
    debug!(
        high_accuracy = options.enable_high_accuracy,
        timeout_ms = options.timeout.as_millis() as u64,
        "Requesting current position"
    );

    let position = match tokio::time::timeout(options.timeout, source.current_position(options)).await {
        Ok(Ok(position)) => position,
        Ok(Err(kind)) => {
            warn!(?kind, "Positioning failed");
            return Err(kind.into());
        }
        Err(_) => {
            warn!("Positioning timed out after {:?}", options.timeout);
            return Err(PositionErrorKind::Timeout.into());
        }
    };

    if position.coords.validate().is_err() {
        warn!(coords = %position.coords, "Source returned invalid coordinates");
        return Err(PositionErrorKind::PositionUnavailable.into());
    }

    Ok(position.coords)
}

/// A source that always reports the same coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedPositionSource {
    coords: Coordinates,
}

impl FixedPositionSource {
    pub fn new(coords: Coordinates) -> Self {
        Self { coords }
    }
}

impl PositionSource for FixedPositionSource {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> std::result::Result<Position, PositionErrorKind> {
        Ok(Position::new(self.coords))
    }
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// IP-based position source with file caching
#[derive(Debug)]
pub struct IpPositionSource {
    client: reqwest::Client,
    url: String,
    enabled: bool,
    cache_path: Option<PathBuf>,
}

impl IpPositionSource {
    /// Create a source with the default cache path
    pub fn new(enabled: bool) -> Self {
        let cache_path = dirs::cache_dir()
            .map(|p| p.join(crate::config::defaults::APP_DIR_NAME).join(CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            url: IP_API_URL.to_string(),
            enabled,
            cache_path,
        }
    }

    /// Create a source without caching
    pub fn without_cache(enabled: bool) -> Self {
        Self {
            cache_path: None,
            ..Self::new(enabled)
        }
    }

    /// Use a specific cache file
    pub fn with_cache_path(mut self, cache_path: PathBuf) -> Self {
        self.cache_path = Some(cache_path);
        self
    }

    /// Query a different lookup endpoint
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Fetch position from the lookup API
    async fn fetch_position(&self) -> std::result::Result<Position, PositionErrorKind> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            warn!("IP position request failed: {}", e);
            PositionErrorKind::PositionUnavailable
        })?;

        if !response.status().is_success() {
            warn!("IP position API returned status: {}", response.status());
            return Err(PositionErrorKind::PositionUnavailable);
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse IP position response: {}", e);
            PositionErrorKind::PositionUnavailable
        })?;

        if data.status != "success" {
            warn!(status = %data.status, "IP position lookup failed");
            return Err(PositionErrorKind::PositionUnavailable);
        }

        match (data.lat, data.lon) {
            (Some(lat), Some(lng)) => Ok(Position::new(Coordinates::new(lat, lng))),
            _ => Err(PositionErrorKind::PositionUnavailable),
        }
    }

    /// Load the cached position if it is recent enough
    fn load_cache(&self, maximum_age: Duration) -> Option<Position> {
        let cache_path = self.cache_path.as_ref()?;
        let content = fs::read_to_string(cache_path).ok()?;
        let cached: Position = serde_json::from_str(&content).ok()?;

        cached.is_fresh(maximum_age).then_some(cached)
    }

    /// Save position to cache
    fn save_cache(&self, position: &Position) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        if let Ok(content) = serde_json::to_string_pretty(position) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}

impl PositionSource for IpPositionSource {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<Position, PositionErrorKind> {
        if !self.enabled {
            return Err(PositionErrorKind::PermissionDenied);
        }

        if let Some(cached) = self.load_cache(options.maximum_age) {
            debug!("Using cached position from {}", cached.timestamp);
            return Ok(cached);
        }

        if options.enable_high_accuracy {
            debug!("IP positioning cannot honour high accuracy; result is approximate");
        }

        let position = self.fetch_position().await?;
        self.save_cache(&position);
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::TempDir;

    struct SlowSource;

    impl PositionSource for SlowSource {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> std::result::Result<Position, PositionErrorKind> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Position::new(Coordinates::new(0.0, 0.0)))
        }
    }

    struct FailingSource(PositionErrorKind);

    impl PositionSource for FailingSource {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> std::result::Result<Position, PositionErrorKind> {
            Err(self.0)
        }
    }

    #[test]
    fn test_default_options() {
        let options = PositionOptions::default();
        assert!(options.enable_high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(15));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_fixed_source() {
        let source = FixedPositionSource::new(Coordinates::new(14.5995, 121.0008));
        let coords = get_current_location(&source, &PositionOptions::default()).await.unwrap();
        assert_eq!(coords, Coordinates::new(14.5995, 121.0008));
    }

    #[tokio::test]
    async fn test_invalid_fix_is_unavailable() {
        let source = FixedPositionSource::new(Coordinates::new(200.0, 0.0));
        let err = get_current_location(&source, &PositionOptions::default()).await.unwrap_err();
        assert!(matches!(err, Error::Positioning(PositionErrorKind::PositionUnavailable)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_enforced() {
        let err = get_current_location(&SlowSource, &PositionOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Positioning(PositionErrorKind::Timeout)));
    }

    #[tokio::test]
    async fn test_source_errors_map_to_kinds() {
        for kind in [
            PositionErrorKind::PermissionDenied,
            PositionErrorKind::PositionUnavailable,
            PositionErrorKind::Timeout,
        ] {
            let err = get_current_location(&FailingSource(kind), &PositionOptions::default())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Positioning(k) if k == kind));
        }
    }

    #[tokio::test]
    async fn test_disabled_ip_source_is_denied() {
        let source = IpPositionSource::without_cache(false);
        let err = get_current_location(&source, &PositionOptions::default()).await.unwrap_err();
        assert!(matches!(err, Error::Positioning(PositionErrorKind::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_fresh_cache_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let source = IpPositionSource::without_cache(true)
            .with_cache_path(temp_dir.path().join("position.json"))
            .with_url("http://127.0.0.1:9/unreachable");

        source.save_cache(&Position::new(Coordinates::new(14.5995, 121.0008)));

        let coords = get_current_location(&source, &PositionOptions::default()).await.unwrap();
        assert_eq!(coords, Coordinates::new(14.5995, 121.0008));
    }

    #[test]
    fn test_stale_cache_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let source = IpPositionSource::without_cache(true)
            .with_cache_path(temp_dir.path().join("position.json"));

        let mut stale = Position::new(Coordinates::new(1.0, 2.0));
        stale.timestamp = Utc::now() - chrono::Duration::seconds(120);
        source.save_cache(&stale);

        assert!(source.load_cache(Duration::from_secs(60)).is_none());
        assert!(source.load_cache(Duration::from_secs(300)).is_some());

        source.clear_cache();
        assert!(source.load_cache(Duration::from_secs(300)).is_none());
    }

    #[test]
    fn test_position_serialization() {
        let position = Position {
            coords: Coordinates::new(14.5995, 121.0008),
            accuracy: Some(25.0),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&position).unwrap();
        let parsed: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, position);
    }
}
