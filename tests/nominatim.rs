//! Integration tests for the Nominatim client and the search selector using
//! wiremock HTTP mocks.

use civic_locate::config::NominatimConfig;
use civic_locate::geo::nominatim::NominatimBackend;
use civic_locate::geo::position::{
    get_current_location, IpPositionSource, PositionErrorKind, PositionOptions,
};
use civic_locate::geo::{fetch_address_from_coordinates, to_search_options, GeoBackend};
use civic_locate::search::{LocationSelector, SearchSettings, SearchState};
use civic_locate::{Coordinates, Error, LocationType};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_AGENT: &str = "civic-locate-test/1.0";

fn test_backend(base_url: &str) -> NominatimBackend {
    let config = NominatimConfig {
        base_url: base_url.to_string(),
        user_agent: TEST_AGENT.to_string(),
        timeout_secs: 5,
        ..NominatimConfig::default()
    };
    NominatimBackend::new(&config).expect("client construction should not fail")
}

fn fast_settings() -> SearchSettings {
    SearchSettings {
        debounce: Duration::from_millis(20),
        ..SearchSettings::default()
    }
}

/// Captures formatted log output for assertions
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn pasig_results() -> serde_json::Value {
    serde_json::json!([
        {
            "place_id": 298405411,
            "lat": "14.5763768",
            "lon": "121.0851097",
            "display_name": "Pasig, Eastern Manila District, Metro Manila, Philippines",
            "importance": 0.68,
            "address": {
                "city": "Pasig",
                "state": "Metro Manila",
                "country": "Philippines",
                "postcode": "1600"
            }
        },
        {
            "place_id": 1234,
            "lat": "14.55",
            "lon": "121.06",
            "display_name": "Pasig River, Philippines",
            "address": { "country": "Philippines" }
        }
    ])
}

#[tokio::test]
async fn search_sends_expected_request_and_parses_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "json"))
        .and(query_param("addressdetails", "1"))
        .and(query_param("limit", "10"))
        .and(query_param("q", "Pasig City"))
        .and(header("user-agent", TEST_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(pasig_results()))
        .expect(1)
        .mount(&server)
        .await;

    let backend = test_backend(&server.uri());
    let results = backend.search("Pasig City").await.expect("search should succeed");
    assert_eq!(results.len(), 2);

    let options = to_search_options(&results);
    assert_eq!(options[0].label, "Pasig, Metro Manila, Philippines");
    assert_eq!(options[0].location_type, LocationType::City);
    assert_eq!(options[1].label, "Philippines");
    assert_eq!(options[1].location_type, LocationType::Location);
}

#[tokio::test]
async fn search_empty_array_is_ok() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let results = test_backend(&server.uri()).search("Nowhere").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_server_error_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = test_backend(&server.uri()).search("Manila").await.unwrap_err();
    assert!(matches!(err, Error::Provider(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn search_malformed_json_is_json_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = test_backend(&server.uri()).search("Manila").await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn search_unreachable_server_is_network_error() {
    let backend = test_backend("http://127.0.0.1:9");
    let err = backend.search("Manila").await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn reverse_lookup_formats_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "14.5995"))
        .and(query_param("lon", "120.9842"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", TEST_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "place_id": 42,
            "lat": "14.5995",
            "lon": "120.9842",
            "display_name": "Ermita, Manila, Metro Manila, Philippines",
            "address": {
                "city": "Manila",
                "state": "Metro Manila",
                "country": "Philippines"
            }
        })))
        .mount(&server)
        .await;

    let backend = test_backend(&server.uri());
    let address = fetch_address_from_coordinates(&backend, 14.5995, 120.9842)
        .await
        .expect("reverse lookup should succeed");
    assert_eq!(address, "Manila, Metro Manila, Philippines");
}

#[tokio::test]
async fn reverse_lookup_without_display_name_is_no_address() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "Unable to geocode" })),
        )
        .mount(&server)
        .await;

    let err = fetch_address_from_coordinates(&test_backend(&server.uri()), 0.0, -160.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoAddressFound));
}

#[tokio::test]
async fn reverse_lookup_status_error_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = fetch_address_from_coordinates(&test_backend(&server.uri()), 10.0, 10.0)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provider(status) if status.as_u16() == 503));
}

#[tokio::test]
async fn selector_degrades_to_empty_results_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    // The current-thread test runtime polls the spawned search on this
    // thread, so a thread-local subscriber sees its events.
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let backend = Arc::new(test_backend(&server.uri()));
    let mut selector = LocationSelector::new(backend, fast_settings(), |_| {});
    let mut updates = selector.subscribe();

    selector.set_query("Quezon City");
    tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|v| v.state == SearchState::Results),
    )
    .await
    .expect("search should finish")
    .expect("selector alive");

    let view = selector.snapshot();
    assert!(view.results.is_empty());
    assert_eq!(view.query, "Quezon City");

    let output = logs.contents();
    assert!(output.contains("Location search failed"), "logs: {output}");
    assert!(output.contains("500"), "logs: {output}");
}

#[tokio::test]
async fn selector_reports_selection_from_live_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Pasig"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pasig_results()))
        .mount(&server)
        .await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let coords_tx = tx.clone();

    let backend = Arc::new(test_backend(&server.uri()));
    let mut selector = LocationSelector::new(backend, fast_settings(), move |value| {
        let _ = tx.send(format!("value:{}", value));
    })
    .on_coordinates_change(move |c: Coordinates| {
        let _ = coords_tx.send(format!("coords:{},{}", c.latitude, c.longitude));
    });

    let mut updates = selector.subscribe();
    selector.set_query("Pasig");
    tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|v| v.state == SearchState::Results),
    )
    .await
    .expect("search should finish")
    .expect("selector alive");

    assert_eq!(selector.snapshot().results.len(), 2);
    selector.select(0).expect("first result exists");

    assert_eq!(rx.recv().await.unwrap(), "value:Pasig, Metro Manila, Philippines");
    assert_eq!(rx.recv().await.unwrap(), "coords:14.5763768,121.0851097");
    assert!(rx.try_recv().is_err());
    assert_eq!(selector.snapshot().state, SearchState::Closed);
}

#[tokio::test]
async fn ip_position_source_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 14.5995,
            "lon": 120.9842,
            "city": "Manila"
        })))
        .mount(&server)
        .await;

    let source = IpPositionSource::without_cache(true).with_url(format!("{}/json", server.uri()));
    let coords = get_current_location(&source, &PositionOptions::default())
        .await
        .unwrap();
    assert_eq!(coords, Coordinates::new(14.5995, 120.9842));
}

#[tokio::test]
async fn ip_position_source_failure_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "fail", "message": "private range" })),
        )
        .mount(&server)
        .await;

    let source = IpPositionSource::without_cache(true).with_url(format!("{}/json", server.uri()));
    let err = get_current_location(&source, &PositionOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Positioning(PositionErrorKind::PositionUnavailable)
    ));
}
