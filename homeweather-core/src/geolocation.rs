use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::error::{GEOLOCATION_FALLBACK, WidgetError};

pub const DEFAULT_IP_LOOKUP_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    /// The device answered but could not produce a position; the detail, if
    /// any, is meant for display.
    #[error("{}", .0.as_deref().unwrap_or(GEOLOCATION_FALLBACK))]
    Failed(Option<String>),
}

impl From<GeolocationError> for WidgetError {
    fn from(err: GeolocationError) -> Self {
        match err {
            GeolocationError::Failed(detail) => WidgetError::GeolocationFailed(detail),
        }
    }
}

/// Source of the device's current position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Position, GeolocationError>;
}

/// Always reports the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator {
    position: Position,
}

impl FixedGeolocator {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { position: Position { latitude, longitude } }
    }
}

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        Ok(self.position)
    }
}

/// Approximates the position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), http: Client::new() }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(DEFAULT_IP_LOOKUP_URL)
    }
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn current_position(&self) -> Result<Position, GeolocationError> {
        let res = self.http.get(&self.url).send().await.map_err(|e| {
            tracing::warn!("IP geolocation request failed: {e}");
            GeolocationError::Failed(Some(e.to_string()))
        })?;

        let body: IpLookupResponse = res.json().await.map_err(|e| {
            tracing::warn!("Failed to parse IP geolocation response: {e}");
            GeolocationError::Failed(None)
        })?;

        match body {
            IpLookupResponse { status, lat: Some(latitude), lon: Some(longitude), .. }
                if status == "success" =>
            {
                tracing::debug!(latitude, longitude, "IP geolocation resolved");
                Ok(Position { latitude, longitude })
            }
            IpLookupResponse { message, .. } => Err(GeolocationError::Failed(message)),
        }
    }
}
