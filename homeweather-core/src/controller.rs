//! Event handlers tying the location, home store, API and display together.
//!
//! Every handler runs to completion, reports its own failure to the presenter
//! and then returns it. A failed handler never changes the current location.

use crate::api::{CoordsReply, OpenWeatherClient, clean_text};
use crate::error::WidgetError;
use crate::geolocation::Geolocator;
use crate::home::{self, HomeRecord, HomeStore};
use crate::model::{CoordinatesUpdate, Location};
use crate::presenter::{BusyIndicator, Presenter};

/// What caused a handler to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Run on its own, e.g. when the session starts.
    Startup,
    /// Explicitly requested by the user.
    User,
}

#[derive(Debug)]
pub struct WeatherWidget<S, P> {
    location: Location,
    client: OpenWeatherClient,
    geolocator: Option<Box<dyn Geolocator>>,
    store: S,
    presenter: P,
}

impl<S: HomeStore, P: Presenter> WeatherWidget<S, P> {
    /// `geolocator` is `None` when no position source is available.
    pub fn new(
        client: OpenWeatherClient,
        geolocator: Option<Box<dyn Geolocator>>,
        store: S,
        presenter: P,
    ) -> Self {
        Self { location: Location::new(), client, geolocator, store, presenter }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut Location {
        &mut self.location
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Prepare the display and show the home location, or the current
    /// position when no home is saved.
    pub async fn start(&mut self) -> Result<(), WidgetError> {
        self.presenter.set_placeholder_text();
        self.load_home(Trigger::Startup).await
    }

    pub async fn use_current_location(&mut self, trigger: Trigger) -> Result<(), WidgetError> {
        self.busy(trigger, BusyIndicator::Locate);
        let result = self.locate().await;
        self.idle(trigger, BusyIndicator::Locate);
        self.report(result)
    }

    pub async fn load_home(&mut self, trigger: Trigger) -> Result<(), WidgetError> {
        let saved = match home::load_home(&self.store) {
            Ok(saved) => saved,
            Err(err) => return self.report(Err(err)),
        };

        let Some(record) = saved else {
            return match trigger {
                Trigger::Startup => {
                    tracing::debug!("no home location saved, falling back to current position");
                    self.use_current_location(Trigger::Startup).await
                }
                Trigger::User => self.report(Err(WidgetError::NoHomeLocationSaved)),
            };
        };

        self.busy(trigger, BusyIndicator::Home);
        tracing::info!(name = %record.name, "loading home location");
        self.location.set_from_coordinates(record.to_update());
        self.update_data_and_display().await;
        self.idle(trigger, BusyIndicator::Home);
        Ok(())
    }

    /// Save the current place as home. Does nothing until a place with
    /// coordinates has been resolved.
    pub async fn save_home(&mut self) -> Result<(), WidgetError> {
        let Some(record) = HomeRecord::from_location(&self.location) else {
            tracing::debug!("no coordinates to save as home");
            return Ok(());
        };

        self.presenter.busy(BusyIndicator::Save);
        let result = home::save_home(&self.store, &record);
        if result.is_ok() {
            tracing::info!(name = %record.name, "saved home location");
            self.presenter.announce(&format!("Saved {} as home location.", record.name));
            self.update_data_and_display().await;
        }
        self.presenter.idle(BusyIndicator::Save);
        self.report(result)
    }

    pub async fn toggle_unit(&mut self) -> Result<(), WidgetError> {
        self.presenter.busy(BusyIndicator::Unit);
        self.location.toggle_unit();
        tracing::debug!(unit = %self.location.unit(), "unit toggled");
        self.update_data_and_display().await;
        self.presenter.idle(BusyIndicator::Unit);
        Ok(())
    }

    pub async fn refresh(&mut self) -> Result<(), WidgetError> {
        self.presenter.busy(BusyIndicator::Refresh);
        self.update_data_and_display().await;
        self.presenter.idle(BusyIndicator::Refresh);
        Ok(())
    }

    /// Look up a place by free text. Blank input is ignored.
    pub async fn submit_search(&mut self, text: &str) -> Result<(), WidgetError> {
        let query = clean_text(text);
        if query.is_empty() {
            return Ok(());
        }

        self.presenter.busy(BusyIndicator::Search);
        let result = self.search(&query).await;
        self.presenter.idle(BusyIndicator::Search);
        self.report(result)
    }

    async fn locate(&mut self) -> Result<(), WidgetError> {
        let geolocator = self.geolocator.as_ref().ok_or(WidgetError::GeolocationUnavailable)?;
        let position = geolocator.current_position().await?;

        self.location
            .set_from_coordinates(CoordinatesUpdate::new(position.latitude, position.longitude));
        self.update_data_and_display().await;
        Ok(())
    }

    async fn search(&mut self, query: &str) -> Result<(), WidgetError> {
        match self.client.resolve_coordinates(query, self.location.unit()).await {
            Some(CoordsReply::Found(city)) => {
                tracing::info!(name = %city.display_name(), "search resolved");
                self.location.set_from_coordinates(city.to_update());
                self.update_data_and_display().await;
                self.presenter.set_placeholder_text();
                Ok(())
            }
            Some(CoordsReply::Rejected(payload)) => Err(WidgetError::Api(payload)),
            None => Err(WidgetError::Connection),
        }
    }

    async fn update_data_and_display(&mut self) {
        match self.client.fetch_weather(&self.location).await {
            Some(weather) => self.presenter.render_weather(&weather, &self.location),
            None => tracing::warn!(name = %self.location.name(), "no weather data to display"),
        }
    }

    fn report(&mut self, result: Result<(), WidgetError>) -> Result<(), WidgetError> {
        if let Err(err) = &result {
            tracing::info!("action failed: {err}");
            match err {
                WidgetError::Api(payload) => self.presenter.render_api_error(payload),
                other => self.presenter.render_error(&other.title(), &other.detail()),
            }
        }
        result
    }

    fn busy(&mut self, trigger: Trigger, indicator: BusyIndicator) {
        if trigger == Trigger::User {
            self.presenter.busy(indicator);
        }
    }

    fn idle(&mut self, trigger: Trigger, indicator: BusyIndicator) {
        if trigger == Trigger::User {
            self.presenter.idle(indicator);
        }
    }
}
