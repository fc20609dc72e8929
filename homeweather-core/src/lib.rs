//! Core library for the `homeweather` widget.
//!
//! This crate defines:
//! - The location model and its unit preference
//! - Access to the OpenWeather lookup and weather calls
//! - The persisted home location and the geolocation seam
//! - The controller that turns user actions into display calls
//!
//! It is used by `homeweather-cli`, but any front-end implementing
//! [`Presenter`] can drive it.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod geolocation;
pub mod home;
pub mod model;
pub mod presenter;

pub use api::{CityMatch, CoordsReply, OpenWeatherClient, clean_text};
pub use config::{Config, GeolocationConfig};
pub use controller::{Trigger, WeatherWidget};
pub use error::{ApiErrorPayload, WidgetError};
pub use geolocation::{FixedGeolocator, Geolocator, IpGeolocator, Position};
pub use home::{FileHomeStore, HomeRecord, HomeStore};
pub use model::{CoordinatesUpdate, Location, Unit, WeatherReport};
pub use presenter::{BusyIndicator, Presenter};
