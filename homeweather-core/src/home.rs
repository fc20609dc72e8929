use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::WidgetError;
use crate::model::{CoordinatesUpdate, Location, Unit};

/// Key the home location is stored under.
pub const HOME_KEY: &str = "defaultWeatherLocation";

/// Persisted copy of a [`Location`] saved as "home".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeRecord {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub unit: Unit,
}

impl HomeRecord {
    /// Snapshot of `location`, or `None` while it has no coordinates.
    pub fn from_location(location: &Location) -> Option<Self> {
        let (lat, lon) = location.coordinates()?;
        Some(Self { name: location.name().to_string(), lat, lon, unit: location.unit() })
    }

    pub fn to_update(&self) -> CoordinatesUpdate {
        CoordinatesUpdate::new(self.lat, self.lon)
            .with_name(self.name.clone())
            .with_unit(self.unit)
    }

    fn validate(self) -> Result<Self, String> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} is out of range", self.lat));
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(format!("longitude {} is out of range", self.lon));
        }
        Ok(self)
    }
}

/// Single-value storage for the serialized home record.
pub trait HomeStore {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, raw: &str) -> Result<()>;
}

/// Keeps the home record in one JSON file named after [`HOME_KEY`].
#[derive(Debug, Clone)]
pub struct FileHomeStore {
    path: PathBuf,
}

impl FileHomeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "homeweather", "homeweather")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(Self::new(dirs.data_dir().join(format!("{HOME_KEY}.json"))))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl HomeStore for FileHomeStore {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read home location: {}", self.path.display()))?;

        Ok(Some(raw))
    }

    fn write(&self, raw: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write home location: {}", self.path.display()))?;

        Ok(())
    }
}

/// Read and validate the saved home location. `Ok(None)` when none was saved.
pub fn load_home(store: &impl HomeStore) -> Result<Option<HomeRecord>, WidgetError> {
    let raw = store
        .read()
        .map_err(|e| WidgetError::Storage(format!("{e:#}")))?;

    let Some(raw) = raw else {
        return Ok(None);
    };

    let record: HomeRecord =
        serde_json::from_str(&raw).map_err(|e| WidgetError::PersistedDataCorrupt(e.to_string()))?;

    record.validate().map(Some).map_err(WidgetError::PersistedDataCorrupt)
}

pub fn save_home(store: &impl HomeStore, record: &HomeRecord) -> Result<(), WidgetError> {
    let raw = serde_json::to_string(record).map_err(|e| WidgetError::Storage(e.to_string()))?;
    store.write(&raw).map_err(|e| WidgetError::Storage(format!("{e:#}")))
}
