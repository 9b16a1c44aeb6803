//! Weather screen behaviour end to end against a mock HTTP server

mod common;

use common::*;
use skycast::config::ProviderKind;
use skycast::{ConfiguredSensor, DisplayUnit, Notice, WeatherScreen};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{any, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn screen_for(server: &MockServer, sensor: ConfiguredSensor) -> WeatherScreen {
    WeatherScreen::new(
        provider_for(server, ProviderKind::OpenMeteo),
        Arc::new(sensor),
        "Kolkata",
        DisplayUnit::Celsius,
    )
}

async fn mount_search(server: &MockServer, name: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", name))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(open_meteo_search(name, KOLKATA.0, KOLKATA.1))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn test_open_shows_default_city() {
    let server = MockServer::start().await;
    mount_search(&server, "Kolkata", Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_meteo_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = screen_for(&server, ConfiguredSensor::default());
    screen.open();
    assert!(screen.state().loading);

    screen.settled().await;
    let state = screen.state();
    assert!(!state.loading);
    assert_eq!(state.city, "Kolkata");
    assert!(state.notice.is_none());
    assert_eq!(state.forecast.len(), 5);
    assert_eq!(state.forecast[0].date, date(2026, 10, 18));
    assert!((state.current.unwrap().temperature - 30.6).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_blank_search_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = screen_for(&server, ConfiguredSensor::default());
    let before = screen.state();

    assert!(!screen.search(""));
    assert!(!screen.search("   \t"));
    screen.settled().await;

    let after = screen.state();
    assert!(!after.loading);
    assert!(after.notice.is_none());
    assert_eq!(after.city, before.city);
    assert!(after.current.is_none());
}

#[tokio::test]
async fn test_unknown_city_keeps_previous_data() {
    let server = MockServer::start().await;
    mount_search(&server, "Kolkata", Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("name", "Zzyx123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_meteo_no_results()))
        .expect(1)
        .mount(&server)
        .await;
    // Only the successful search may reach the forecast endpoint
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_meteo_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = screen_for(&server, ConfiguredSensor::default());
    screen.open();
    screen.settled().await;

    assert!(screen.search("Zzyx123"));
    screen.settled().await;

    let state = screen.state();
    assert!(!state.loading);
    assert_eq!(
        state.notice,
        Some(Notice::new("No data", "Could not find weather."))
    );
    assert_eq!(state.city, "Kolkata");
    assert!(state.current.is_some());
    assert_eq!(state.forecast.len(), 5);
}

#[tokio::test]
async fn test_locate_denied_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = screen_for(&server, ConfiguredSensor::new(false, Some(KOLKATA)));
    screen.locate();
    screen.settled().await;

    let state = screen.state();
    assert!(!state.loading);
    assert_eq!(
        state.notice,
        Some(Notice::new("Location denied", "Permission denied."))
    );
    assert!(state.current.is_none());
}

#[tokio::test]
async fn test_locate_without_position() {
    let server = MockServer::start().await;
    let mut screen = screen_for(&server, ConfiguredSensor::new(true, None));

    screen.locate();
    screen.settled().await;

    let state = screen.state();
    assert_eq!(
        state.notice,
        Some(Notice::new("Error", "Unable to get location."))
    );
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_locate_uses_reverse_geocoded_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "22.5726"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nominatim_city("Kolkata")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("longitude", "88.3639"))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_meteo_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = WeatherScreen::new(
        provider_for(&server, ProviderKind::OpenMeteo),
        Arc::new(ConfiguredSensor::new(true, Some(KOLKATA))),
        "London",
        DisplayUnit::Celsius,
    );
    screen.locate();
    screen.settled().await;

    let state = screen.state();
    assert_eq!(state.city, "Kolkata");
    assert!(state.notice.is_none());
    assert_eq!(state.forecast.len(), 5);
}

#[tokio::test]
async fn test_failed_refresh_keeps_stale_data() {
    let server = MockServer::start().await;
    mount_search(&server, "Kolkata", Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_meteo_forecast()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut screen = screen_for(&server, ConfiguredSensor::default());
    screen.open();
    screen.settled().await;
    assert!(screen.state().notice.is_none());

    assert!(screen.refresh());
    screen.settled().await;

    let state = screen.state();
    assert!(!state.loading);
    assert_eq!(
        state.notice,
        Some(Notice::new("Error", "Failed to fetch weather data."))
    );
    assert!(state.current.is_some());
    assert_eq!(state.forecast.len(), 5);
}

#[tokio::test]
async fn test_latest_search_wins() {
    let server = MockServer::start().await;
    mount_search(&server, "Slowtown", Duration::from_millis(800)).await;
    mount_search(&server, "Kolkata", Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_meteo_forecast()))
        .mount(&server)
        .await;

    let mut screen = screen_for(&server, ConfiguredSensor::default());
    assert!(screen.search("Slowtown"));
    assert!(screen.search("Kolkata"));
    screen.settled().await;
    assert_eq!(screen.state().city, "Kolkata");

    // Give the superseded request time to come back
    tokio::time::sleep(Duration::from_millis(1200)).await;
    let state = screen.state();
    assert_eq!(state.city, "Kolkata");
    assert!(!state.loading);
}

#[tokio::test]
async fn test_toggle_units_does_not_refetch() {
    let server = MockServer::start().await;
    mount_search(&server, "Kolkata", Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_meteo_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = screen_for(&server, ConfiguredSensor::default());
    screen.open();
    screen.settled().await;
    let requests = request_count(&server).await;

    assert_eq!(screen.toggle_units(), DisplayUnit::Fahrenheit);
    let state = screen.state();
    assert_eq!(state.unit, DisplayUnit::Fahrenheit);
    assert!(!state.loading);
    assert_eq!(state.current.unwrap().format_temperature(state.unit), "87°F");

    assert_eq!(screen.toggle_units(), DisplayUnit::Celsius);
    assert_eq!(request_count(&server).await, requests);
}

#[tokio::test]
async fn test_subscribers_see_loading_then_data() {
    let server = MockServer::start().await;
    mount_search(&server, "Kolkata", Duration::from_millis(100)).await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(open_meteo_forecast()))
        .mount(&server)
        .await;

    let mut screen = screen_for(&server, ConfiguredSensor::default());
    let mut updates = screen.subscribe();

    screen.open();
    assert!(updates.borrow_and_update().loading);

    tokio::time::timeout(
        Duration::from_secs(5),
        updates.wait_for(|state| !state.loading),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(screen.state().forecast.len(), 5);
}

#[tokio::test]
async fn test_unknown_city_with_openweathermap_skips_weather_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .and(query_param("q", "Zzyx123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;
    for endpoint in ["/weather", "/forecast"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let mut screen = WeatherScreen::new(
        provider_for(&server, ProviderKind::OpenWeatherMap),
        Arc::new(ConfiguredSensor::default()),
        "Kolkata",
        DisplayUnit::Celsius,
    );
    assert!(screen.search("Zzyx123"));
    screen.settled().await;

    let state = screen.state();
    assert!(!state.loading);
    assert_eq!(
        state.notice,
        Some(Notice::new("No data", "Could not find weather."))
    );
    assert!(state.current.is_none());
    assert!(state.forecast.is_empty());
}
