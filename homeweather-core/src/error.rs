use serde::{Deserialize, Deserializer, Serialize};

pub const GEOLOCATION_FALLBACK: &str = "Geolocation not supported";

/// Error body returned by the weather API, e.g.
/// `{"cod":"404","message":"city not found"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorPayload {
    #[serde(deserialize_with = "status_code")]
    pub cod: u16,
    #[serde(default)]
    pub message: String,
}

/// Accepts the status code as either a JSON number or a numeric string.
pub(crate) fn status_code<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Number(u16),
        Text(String),
    }

    match Code::deserialize(deserializer)? {
        Code::Number(n) => Ok(n),
        Code::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Failure of a single user action. None of these change the current location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    #[error("Geolocation not supported")]
    GeolocationUnavailable,

    #[error("{}", .0.as_deref().unwrap_or(GEOLOCATION_FALLBACK))]
    GeolocationFailed(Option<String>),

    #[error("No home location saved")]
    NoHomeLocationSaved,

    #[error("API error {}: {}", .0.cod, .0.message)]
    Api(ApiErrorPayload),

    #[error("Connection error")]
    Connection,

    #[error("Saved home location is unreadable: {0}")]
    PersistedDataCorrupt(String),

    #[error("Home location storage failed: {0}")]
    Storage(String),
}

impl WidgetError {
    /// Headline shown for the error.
    pub fn title(&self) -> String {
        match self {
            WidgetError::GeolocationUnavailable | WidgetError::GeolocationFailed(_) => self.to_string(),
            WidgetError::NoHomeLocationSaved => "No Home Location Saved".to_string(),
            WidgetError::Api(payload) => payload.message.clone(),
            WidgetError::Connection => "Connection Error".to_string(),
            WidgetError::PersistedDataCorrupt(_) => "Home Location Unreadable".to_string(),
            WidgetError::Storage(_) => "Storage Error".to_string(),
        }
    }

    /// Longer text shown under the headline.
    pub fn detail(&self) -> String {
        match self {
            WidgetError::NoHomeLocationSaved => {
                "Sorry. Please save your home location first.".to_string()
            }
            WidgetError::PersistedDataCorrupt(_) => {
                format!("{self}. Please save your home location again.")
            }
            WidgetError::Storage(reason) => format!("Sorry. {reason}"),
            _ => self.title(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geolocation_failure_falls_back_without_detail() {
        let err = WidgetError::GeolocationFailed(None);
        assert_eq!(err.title(), GEOLOCATION_FALLBACK);
        assert_eq!(err.detail(), GEOLOCATION_FALLBACK);

        let err = WidgetError::GeolocationFailed(Some("User denied Geolocation".into()));
        assert_eq!(err.title(), "User denied Geolocation");
    }

    #[test]
    fn no_home_text() {
        let err = WidgetError::NoHomeLocationSaved;
        assert_eq!(err.title(), "No Home Location Saved");
        assert_eq!(err.detail(), "Sorry. Please save your home location first.");
    }

    #[test]
    fn connection_text_is_same_for_title_and_detail() {
        assert_eq!(WidgetError::Connection.title(), "Connection Error");
        assert_eq!(WidgetError::Connection.detail(), "Connection Error");
    }

    #[test]
    fn api_payload_accepts_string_and_numeric_codes() {
        let payload: ApiErrorPayload =
            serde_json::from_str(r#"{"cod":"404","message":"city not found"}"#).unwrap();
        assert_eq!(payload.cod, 404);
        assert_eq!(payload.message, "city not found");

        let payload: ApiErrorPayload =
            serde_json::from_str(r#"{"cod":401,"message":"Invalid API key"}"#).unwrap();
        assert_eq!(payload.cod, 401);
    }

    #[test]
    fn api_error_display_includes_code() {
        let err = WidgetError::Api(ApiErrorPayload { cod: 404, message: "city not found".into() });
        assert_eq!(err.to_string(), "API error 404: city not found");
    }
}
