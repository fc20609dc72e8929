#![allow(dead_code)]

use homeweather_core::{
    ApiErrorPayload, BusyIndicator, FileHomeStore, Geolocator, Location, OpenWeatherClient,
    Presenter, Unit, WeatherReport, WeatherWidget,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Weather { name: String, unit: Unit, temp: f64 },
    Error { title: String, detail: String },
    ApiError(ApiErrorPayload),
    Placeholder,
    Announce(String),
    Busy(BusyIndicator),
    Idle(BusyIndicator),
}

/// Records every display call in order.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<Event>,
}

impl RecordingPresenter {
    pub fn weather_renders(&self) -> Vec<&Event> {
        self.events.iter().filter(|e| matches!(e, Event::Weather { .. })).collect()
    }

    pub fn errors(&self) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Error { .. } | Event::ApiError(_)))
            .collect()
    }

    pub fn announcements(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Announce(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn render_weather(&mut self, weather: &WeatherReport, location: &Location) {
        self.events.push(Event::Weather {
            name: location.name().to_string(),
            unit: location.unit(),
            temp: weather.current.temp,
        });
    }

    fn render_error(&mut self, title: &str, detail: &str) {
        self.events.push(Event::Error { title: title.to_string(), detail: detail.to_string() });
    }

    fn render_api_error(&mut self, payload: &ApiErrorPayload) {
        self.events.push(Event::ApiError(payload.clone()));
    }

    fn set_placeholder_text(&mut self) {
        self.events.push(Event::Placeholder);
    }

    fn announce(&mut self, text: &str) {
        self.events.push(Event::Announce(text.to_string()));
    }

    fn busy(&mut self, indicator: BusyIndicator) {
        self.events.push(Event::Busy(indicator));
    }

    fn idle(&mut self, indicator: BusyIndicator) {
        self.events.push(Event::Idle(indicator));
    }
}

pub type TestWidget = WeatherWidget<FileHomeStore, RecordingPresenter>;

pub fn widget(
    server_uri: &str,
    geolocator: Option<Box<dyn Geolocator>>,
    dir: &tempfile::TempDir,
) -> TestWidget {
    let client = OpenWeatherClient::with_base_url("TEST_KEY".into(), server_uri);
    let store = FileHomeStore::new(dir.path().join("defaultWeatherLocation.json"));
    WeatherWidget::new(client, geolocator, store, RecordingPresenter::default())
}

pub fn onecall_body(temp: f64) -> serde_json::Value {
    json!({
        "lat": 48.85,
        "lon": 2.35,
        "timezone": "Europe/Paris",
        "current": {
            "dt": 1_700_000_000,
            "temp": temp,
            "feels_like": temp - 1.0,
            "humidity": 60,
            "wind_speed": 3.5,
            "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }]
        },
        "daily": [
            { "dt": 1_700_000_000, "temp": { "min": 10.0, "max": 20.0 }, "weather": [] }
        ]
    })
}

pub fn city_body(name: &str, country: Option<&str>, lat: f64, lon: f64) -> serde_json::Value {
    let mut body = json!({
        "cod": 200,
        "name": name,
        "coord": { "lat": lat, "lon": lon },
        "sys": {}
    });
    if let Some(country) = country {
        body["sys"]["country"] = json!(country);
    }
    body
}

pub async fn mount_onecall(server: &MockServer, temp: f64) {
    Mock::given(method("GET"))
        .and(path("/onecall"))
        .respond_with(ResponseTemplate::new(200).set_body_json(onecall_body(temp)))
        .mount(server)
        .await;
}

pub async fn request_count(server: &MockServer, endpoint: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == endpoint)
        .count()
}
