use chrono::{DateTime, Utc};
use homeweather_core::{ApiErrorPayload, BusyIndicator, Location, Presenter, WeatherReport};

const NARROW_PLACEHOLDER: &str = "City, State, Country";
const WIDE_PLACEHOLDER: &str = "City, State, Country, or Zip Code";
const NARROW_COLUMNS: usize = 60;
const FORECAST_DAYS: usize = 6;

/// Prints weather on stdout and everything transient on stderr.
#[derive(Debug)]
pub struct TerminalPresenter {
    placeholder: String,
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self { placeholder: WIDE_PLACEHOLDER.to_string() }
    }
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hint for the search prompt.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
}

impl Presenter for TerminalPresenter {
    fn render_weather(&mut self, weather: &WeatherReport, location: &Location) {
        println!("{}", format_weather(weather, location));
    }

    fn render_error(&mut self, title: &str, detail: &str) {
        if title == detail {
            eprintln!("✗ {title}");
        } else {
            eprintln!("✗ {title}\n  {detail}");
        }
    }

    fn render_api_error(&mut self, payload: &ApiErrorPayload) {
        let message = to_proper_case(&payload.message);
        eprintln!("✗ {message}\n  {message}. Please try again.");
    }

    fn set_placeholder_text(&mut self) {
        let narrow = terminal_columns().is_some_and(|cols| cols < NARROW_COLUMNS);
        self.placeholder = if narrow { NARROW_PLACEHOLDER } else { WIDE_PLACEHOLDER }.to_string();
    }

    fn announce(&mut self, text: &str) {
        eprintln!("✓ {text}");
    }

    fn busy(&mut self, indicator: BusyIndicator) {
        eprintln!("… {}", busy_label(indicator));
    }

    fn idle(&mut self, _indicator: BusyIndicator) {}
}

fn busy_label(indicator: BusyIndicator) -> &'static str {
    match indicator {
        BusyIndicator::Locate => "locating",
        BusyIndicator::Home => "loading home",
        BusyIndicator::Save => "saving home",
        BusyIndicator::Unit => "switching units",
        BusyIndicator::Refresh => "refreshing",
        BusyIndicator::Search => "searching",
    }
}

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS").ok()?.trim().parse().ok()
}

pub fn format_weather(weather: &WeatherReport, location: &Location) -> String {
    let unit = location.unit();
    let temp = unit.temperature_symbol();
    let current = &weather.current;

    let description = current
        .condition()
        .map(|c| to_proper_case(&c.description))
        .unwrap_or_else(|| "Unknown".to_string());

    let mut out = format!("{}\n", location.name());
    out.push_str(&format!("  {:.0}{temp}  {description}\n", current.temp));
    out.push_str(&format!(
        "  Feels like {:.0}{temp} · Humidity {}% · Wind {:.0} {}\n",
        current.feels_like,
        current.humidity,
        current.wind_speed,
        unit.speed_symbol(),
    ));
    if let Some(observed) = weather.observed_at() {
        out.push_str(&format!("  Updated {}\n", format_time(observed)));
    }

    // the first entry is today
    let days: Vec<String> = weather
        .daily
        .iter()
        .skip(1)
        .take(FORECAST_DAYS)
        .filter_map(|day| {
            let date = day.date()?;
            Some(format!(
                "{} {:.0}/{:.0}{temp}",
                date.format("%a"),
                day.temp.max,
                day.temp.min
            ))
        })
        .collect();
    if !days.is_empty() {
        out.push_str(&format!("  {}\n", days.join("  ")));
    }

    out
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%a %H:%M UTC").to_string()
}

/// `"city not found"` -> `"City Not Found"`.
pub fn to_proper_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use homeweather_core::model::{Condition, CurrentConditions, DailyForecast, DailyTemperature};
    use homeweather_core::{CoordinatesUpdate, Unit};

    #[test]
    fn proper_case() {
        assert_eq!(to_proper_case("city not found"), "City Not Found");
        assert_eq!(to_proper_case("INVALID API key"), "INVALID API Key");
        assert_eq!(to_proper_case(""), "");
    }

    #[test]
    fn weather_block_uses_location_unit() {
        let mut location = Location::new();
        location.set_from_coordinates(CoordinatesUpdate::new(48.85, 2.35).with_name("Paris, FR"));
        location.set_unit(Unit::Metric);

        let weather = WeatherReport {
            timezone: None,
            current: CurrentConditions {
                dt: 1_700_000_000,
                temp: 12.4,
                feels_like: 10.6,
                humidity: 81,
                wind_speed: 4.2,
                weather: vec![Condition {
                    main: "Clouds".into(),
                    description: "broken clouds".into(),
                    icon: "04d".into(),
                }],
            },
            daily: vec![
                DailyForecast::default(),
                DailyForecast {
                    dt: 1_700_086_400,
                    temp: DailyTemperature { min: 8.0, max: 14.0 },
                    weather: vec![],
                },
            ],
        };

        let out = format_weather(&weather, &location);
        assert!(out.starts_with("Paris, FR\n"));
        assert!(out.contains("12°C  Broken Clouds"));
        assert!(out.contains("Feels like 11°C · Humidity 81% · Wind 4 m/s"));
        assert!(out.contains("Updated Tue 22:13 UTC"));
        assert!(out.contains("Wed 14/8°C"));
    }

    #[test]
    fn placeholder_starts_wide() {
        assert_eq!(TerminalPresenter::new().placeholder(), WIDE_PLACEHOLDER);
    }
}
