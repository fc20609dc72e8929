use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::api::{DEFAULT_BASE_URL, OpenWeatherClient};
use crate::geolocation::{DEFAULT_IP_LOOKUP_URL, FixedGeolocator, Geolocator, IpGeolocator};
use crate::home::FileHomeStore;

/// How the current position is found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum GeolocationConfig {
    /// Ask an IP geolocation service.
    Ip {
        #[serde(default = "default_ip_lookup_url")]
        url: String,
    },
    /// Always use these coordinates.
    Fixed { latitude: f64, longitude: f64 },
    /// No position source; "use current location" reports it as unsupported.
    Disabled,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        GeolocationConfig::Ip { url: default_ip_lookup_url() }
    }
}

fn default_ip_lookup_url() -> String {
    DEFAULT_IP_LOOKUP_URL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
///
/// [geolocation]
/// mode = "fixed"
/// latitude = 59.91
/// longitude = 10.75
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Overrides where the home location is kept.
    pub home_file: Option<PathBuf>,

    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            home_file: None,
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Config {
    /// The configured API key, with a hint when missing.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `homeweather configure` or set OPENWEATHER_API_KEY."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }

    pub fn client(&self) -> Result<OpenWeatherClient> {
        let key = self.api_key()?;
        Ok(OpenWeatherClient::with_base_url(key.to_owned(), self.api_base_url.clone()))
    }

    pub fn geolocator(&self) -> Option<Box<dyn Geolocator>> {
        match &self.geolocation {
            GeolocationConfig::Ip { url } => Some(Box::new(IpGeolocator::new(url.clone()))),
            GeolocationConfig::Fixed { latitude, longitude } => {
                Some(Box::new(FixedGeolocator::new(*latitude, *longitude)))
            }
            GeolocationConfig::Disabled => None,
        }
    }

    pub fn home_store(&self) -> Result<FileHomeStore> {
        match &self.home_file {
            Some(path) => Ok(FileHomeStore::new(path.clone())),
            None => FileHomeStore::in_data_dir(),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "homeweather", "homeweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
