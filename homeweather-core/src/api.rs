//! OpenWeather access: free-text place lookup and coordinates-to-weather.
//!
//! Both calls report failure as `None` after logging it, so callers only have
//! to tell "the API answered with an error" apart from "nothing came back".

use reqwest::Client;
use serde::Deserialize;

use crate::error::{ApiErrorPayload, status_code};
use crate::model::{CoordinatesUpdate, Location, Unit, WeatherReport};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Collapse runs of spaces and trim, e.g. `"  New   York "` -> `"New York"`.
pub fn clean_text(text: &str) -> String {
    text.split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// A place the API resolved from free text.
#[derive(Debug, Clone, PartialEq)]
pub struct CityMatch {
    pub name: String,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl CityMatch {
    pub fn display_name(&self) -> String {
        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }

    /// Location input for this match; the unit is left to the caller's preference.
    pub fn to_update(&self) -> CoordinatesUpdate {
        CoordinatesUpdate::new(self.lat, self.lon).with_name(self.display_name())
    }
}

/// Answer to a coordinates lookup that reached the API.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordsReply {
    Found(CityMatch),
    Rejected(ApiErrorPayload),
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve free text to a place. `None` means the request never produced
    /// a readable answer.
    pub async fn resolve_coordinates(&self, query: &str, unit: Unit) -> Option<CoordsReply> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", query), ("units", unit.as_str()), ("appid", self.api_key.as_str())])
            .send()
            .await
            .inspect_err(|e| tracing::warn!("OpenWeather lookup for '{query}' failed: {e}"))
            .ok()?;

        let http_status = res.status();
        let body = res
            .text()
            .await
            .inspect_err(|e| tracing::warn!("Failed to read OpenWeather lookup body: {e}"))
            .ok()?;

        let value: serde_json::Value = serde_json::from_str(&body)
            .inspect_err(|e| {
                tracing::warn!(
                    "OpenWeather lookup returned non-JSON body (status {http_status}): {e}: {}",
                    truncate_body(&body)
                )
            })
            .ok()?;

        let cod = OwStatus::deserialize(&value)
            .map(|s| s.cod)
            .unwrap_or_else(|_| http_status.as_u16());

        if cod != 200 {
            let message = value
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string();
            tracing::debug!(cod, %message, "OpenWeather rejected lookup for '{query}'");
            return Some(CoordsReply::Rejected(ApiErrorPayload { cod, message }));
        }

        let parsed = OwCurrentResponse::deserialize(&value)
            .inspect_err(|e| tracing::warn!("Failed to parse OpenWeather lookup JSON: {e}"))
            .ok()?;

        Some(CoordsReply::Found(CityMatch {
            name: parsed.name,
            country: parsed.sys.country,
            lat: parsed.coord.lat,
            lon: parsed.coord.lon,
        }))
    }

    /// Current conditions and daily forecast for the location's coordinates,
    /// in the location's unit.
    pub async fn fetch_weather(&self, location: &Location) -> Option<WeatherReport> {
        let Some((lat, lon)) = location.coordinates() else {
            tracing::debug!("no coordinates yet, skipping weather fetch");
            return None;
        };

        let url = format!("{}/onecall", self.base_url);
        let (lat, lon) = (lat.to_string(), lon.to_string());

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("exclude", "minutely,hourly,alerts"),
                ("units", location.unit().as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::warn!("OpenWeather weather request failed: {e}"))
            .ok()?;

        let status = res.status();
        let body = res
            .text()
            .await
            .inspect_err(|e| tracing::warn!("Failed to read OpenWeather weather body: {e}"))
            .ok()?;

        if !status.is_success() {
            tracing::warn!(
                "OpenWeather weather request failed with status {}: {}",
                status,
                truncate_body(&body)
            );
            return None;
        }

        serde_json::from_str(&body)
            .inspect_err(|e| tracing::warn!("Failed to parse OpenWeather weather JSON: {e}"))
            .ok()
    }
}

#[derive(Debug, Deserialize)]
struct OwStatus {
    #[serde(deserialize_with = "status_code")]
    cod: u16,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    #[serde(default)]
    sys: OwSys,
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
