use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display mode for weather values. The lowercase name doubles as the API's
/// `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Metric,
    #[default]
    Imperial,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Unit::Metric => Unit::Imperial,
            Unit::Imperial => Unit::Metric,
        }
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Unit::Metric => "°C",
            Unit::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Unit::Metric => "m/s",
            Unit::Imperial => "mph",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Unit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Unit::Metric),
            "imperial" => Ok(Unit::Imperial),
            _ => Err(anyhow::anyhow!("Unknown unit '{value}'. Supported units: metric, imperial.")),
        }
    }
}

/// Partial input for [`Location::set_from_coordinates`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatesUpdate {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub name: Option<String>,
    pub unit: Option<Unit>,
}

impl CoordinatesUpdate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat: Some(lat), lon: Some(lon), ..Self::default() }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }
}

pub const DEFAULT_LOCATION_NAME: &str = "Current Location";

/// The place currently being viewed, together with its unit preference.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    latitude: Option<f64>,
    longitude: Option<f64>,
    name: String,
    unit: Unit,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            name: DEFAULT_LOCATION_NAME.to_string(),
            unit: Unit::default(),
        }
    }
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the place from `update`.
    ///
    /// Both coordinates must be present and finite, otherwise nothing changes
    /// and `false` is returned. A missing name is synthesized from the rounded
    /// coordinates; a missing unit keeps the current preference.
    pub fn set_from_coordinates(&mut self, update: CoordinatesUpdate) -> bool {
        let (Some(lat), Some(lon)) = (update.lat, update.lon) else {
            tracing::debug!(?update, "ignoring location update without coordinates");
            return false;
        };
        if !lat.is_finite() || !lon.is_finite() {
            tracing::debug!(lat, lon, "ignoring location update with non-finite coordinates");
            return false;
        }

        self.latitude = Some(lat);
        self.longitude = Some(lon);
        self.name = update.name.unwrap_or_else(|| coordinates_name(lat, lon));
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        true
    }

    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Both coordinates, or `None` until a place has been resolved.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// `Lat:40.71 Long:-74.01` style label for places that have no name.
pub fn coordinates_name(lat: f64, lon: f64) -> String {
    format!("Lat:{} Long:{}", round2(lat), round2(lon))
}

// Half-way cases round towards positive infinity, so -0.125 becomes -0.12.
fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0 + 0.5).floor() / 100.0;
    // Avoid printing "-0".
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Weather data for one place, as returned by the coordinates-to-weather call.
///
/// Only the fields the terminal needs are typed; everything defaults so a
/// sparse payload still renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub current: CurrentConditions,
    #[serde(default)]
    pub daily: Vec<DailyForecast>,
}

impl WeatherReport {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.current.dt)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub dt: i64,
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

impl CurrentConditions {
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyForecast {
    #[serde(default)]
    pub dt: i64,
    #[serde(default)]
    pub temp: DailyTemperature,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

impl DailyForecast {
    pub fn date(&self) -> Option<DateTime<Utc>> {
        unix_to_utc(self.dt)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyTemperature {
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    if ts == 0 {
        return None;
    }
    DateTime::<Utc>::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_location_has_defaults() {
        let loc = Location::new();
        assert_eq!(loc.name(), DEFAULT_LOCATION_NAME);
        assert_eq!(loc.unit(), Unit::Imperial);
        assert_eq!(loc.coordinates(), None);
    }

    #[test]
    fn coordinates_are_stored_exactly() {
        let mut loc = Location::new();
        assert!(loc.set_from_coordinates(CoordinatesUpdate::new(40.712776, -74.005974)));

        assert_eq!(loc.latitude(), Some(40.712776));
        assert_eq!(loc.longitude(), Some(-74.005974));
        assert_eq!(loc.name(), "Lat:40.71 Long:-74.01");
    }

    #[test]
    fn synthesized_name_uses_shortest_form() {
        assert_eq!(coordinates_name(51.5, 0.0), "Lat:51.5 Long:0");
        assert_eq!(coordinates_name(-0.001, 10.0), "Lat:0 Long:10");
        assert_eq!(coordinates_name(35.6895, 139.69171), "Lat:35.69 Long:139.69");
    }

    #[test]
    fn half_way_rounds_up() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.12);
    }

    #[test]
    fn supplied_name_wins() {
        let mut loc = Location::new();
        loc.set_from_coordinates(CoordinatesUpdate::new(48.85, 2.35).with_name("Paris, FR"));
        assert_eq!(loc.name(), "Paris, FR");
    }

    #[test]
    fn unit_is_preserved_unless_supplied() {
        let mut loc = Location::new();
        loc.toggle_unit();
        loc.set_from_coordinates(CoordinatesUpdate::new(1.0, 2.0));
        assert_eq!(loc.unit(), Unit::Metric);

        loc.set_from_coordinates(CoordinatesUpdate::new(1.0, 2.0).with_unit(Unit::Imperial));
        assert_eq!(loc.unit(), Unit::Imperial);
    }

    #[test]
    fn partial_update_leaves_location_untouched() {
        let mut loc = Location::new();
        loc.set_from_coordinates(CoordinatesUpdate::new(10.0, 20.0).with_name("Somewhere"));
        let before = loc.clone();

        let update = CoordinatesUpdate { lat: Some(1.0), name: Some("Nowhere".into()), ..Default::default() };
        assert!(!loc.set_from_coordinates(update));
        assert!(!loc.set_from_coordinates(CoordinatesUpdate::new(f64::NAN, 3.0)));
        assert_eq!(loc, before);
    }

    #[test]
    fn toggle_twice_restores_unit() {
        let mut loc = Location::new();
        let original = loc.unit();
        loc.toggle_unit();
        assert_ne!(loc.unit(), original);
        loc.toggle_unit();
        assert_eq!(loc.unit(), original);
    }

    #[test]
    fn unit_parses_case_insensitively() {
        assert_eq!(Unit::try_from("Metric").unwrap(), Unit::Metric);
        assert!(Unit::try_from("kelvin").unwrap_err().to_string().contains("Unknown unit"));
    }

    #[test]
    fn sparse_weather_payload_deserializes() {
        let report: WeatherReport =
            serde_json::from_str(r#"{"current":{"temp":71.3,"weather":[{"description":"clear sky"}]}}"#)
                .expect("sparse payload should parse");
        assert_eq!(report.current.temp, 71.3);
        assert_eq!(report.current.condition().map(|c| c.description.as_str()), Some("clear sky"));
        assert!(report.daily.is_empty());
        assert!(report.observed_at().is_none());
    }
}
