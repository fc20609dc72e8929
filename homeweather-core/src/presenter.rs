use crate::error::ApiErrorPayload;
use crate::model::{Location, WeatherReport};

/// Which control a busy indicator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusyIndicator {
    Locate,
    Home,
    Save,
    Unit,
    Refresh,
    Search,
}

/// Everything the controller asks of the display.
pub trait Presenter {
    fn render_weather(&mut self, weather: &WeatherReport, location: &Location);
    fn render_error(&mut self, title: &str, detail: &str);
    fn render_api_error(&mut self, payload: &ApiErrorPayload);
    fn set_placeholder_text(&mut self);
    /// Short confirmation for assistive technology.
    fn announce(&mut self, text: &str);
    fn busy(&mut self, indicator: BusyIndicator);
    fn idle(&mut self, indicator: BusyIndicator);
}
