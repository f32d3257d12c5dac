//! Integration tests for WeatherClient using wiremock.

use std::time::Duration;

use daybook_core::HttpFetcher;
use daybook_weather::{WeatherClient, WeatherQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_report() -> serde_json::Value {
    serde_json::json!({
        "location": {
            "name": "London",
            "region": "City of London, Greater London",
            "country": "United Kingdom",
            "localtime": "2026-10-16 14:05"
        },
        "current": {
            "temp_c": 14.0,
            "feelslike_c": 12.6,
            "condition": {
                "text": "Partly cloudy",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            },
            "wind_kph": 19.1,
            "wind_dir": "WSW",
            "humidity": 72,
            "vis_km": 10.0,
            "uv": 3.0
        }
    })
}

fn client(base_url: &str) -> WeatherClient {
    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    WeatherClient::new(fetcher, base_url, "test-key")
}

#[tokio::test]
async fn test_city_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("key", "test-key"))
        .and(query_param("q", "London"))
        .and(query_param("aqi", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_report()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let query = WeatherQuery::city("London").unwrap();
    let result = client(&mock_server.uri()).current(&query).await;

    assert!(result.is_success(), "unexpected error: {:?}", result.error);
    let report = result.data.unwrap();
    assert_eq!(report.location.name, "London");
    assert_eq!(report.current.humidity, 72);
    assert_eq!(report.current.wind_dir, "WSW");
    assert_eq!(
        report.current.condition.icon_url(),
        "https://cdn.weatherapi.com/weather/64x64/day/116.png"
    );
}

#[tokio::test]
async fn test_coordinate_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "51.52,-0.11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_report()))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server.uri())
        .current(&WeatherQuery::coordinates(51.52, -0.11))
        .await;

    assert!(result.is_success());
}

#[tokio::test]
async fn test_unknown_city_surfaces_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"code": 1006, "message": "No matching location found."}
        })))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server.uri())
        .current(&WeatherQuery::City("Atlantis".into()))
        .await;

    assert!(result.data.is_none());
    assert!(!result.loading);
    assert_eq!(
        result.error.as_deref(),
        Some("Location not found: No matching location found.")
    );
}

#[tokio::test]
async fn test_rejected_key_surfaces_api_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"code": 2006, "message": "API key is invalid."}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client(&mock_server.uri())
        .current(&WeatherQuery::City("London".into()))
        .await;

    assert!(result.data.is_none());
    assert!(!result.loading);
    assert_eq!(result.error.as_deref(), Some("Weather API error: API key is invalid."));
}

#[tokio::test]
async fn test_status_without_error_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server.uri())
        .current(&WeatherQuery::City("London".into()))
        .await;

    assert!(result.data.is_none());
    assert_eq!(result.error.as_deref(), Some("Request failed with status 503"));
}

#[tokio::test]
async fn test_unexpected_body_surfaces_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"location": {}})))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server.uri())
        .current(&WeatherQuery::City("London".into()))
        .await;

    assert!(result.data.is_none());
    assert!(result.error.is_some());
}
