use anyhow::{Context, Result};
use homeweather_core::{Config, GeolocationConfig};
use inquire::validator::Validation;
use inquire::{CustomType, CustomUserError, Password, PasswordDisplayMode, Select};
use std::path::Path;

const MODE_IP: &str = "Approximate from my IP address";
const MODE_FIXED: &str = "Always use fixed coordinates";
const MODE_DISABLED: &str = "Don't locate me";

/// Prompt for the API key and geolocation mode, then save.
pub fn run(config_path: &Path) -> Result<()> {
    let mut config = Config::load_from(config_path)?;

    let mut prompt = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation();
    if config.api_key().is_ok() {
        prompt = prompt.with_help_message("leave empty to keep the current key");
    }
    let key = prompt.prompt().context("API key prompt was cancelled")?;
    if !key.trim().is_empty() {
        config.set_api_key(key);
    }

    let mode = Select::new("How should your current position be found?", vec![
        MODE_IP,
        MODE_FIXED,
        MODE_DISABLED,
    ])
    .with_starting_cursor(match config.geolocation {
        GeolocationConfig::Ip { .. } => 0,
        GeolocationConfig::Fixed { .. } => 1,
        GeolocationConfig::Disabled => 2,
    })
    .prompt()
    .context("Geolocation prompt was cancelled")?;

    config.geolocation = match mode {
        MODE_FIXED => {
            let latitude = prompt_coordinate("Latitude:", 90.0)?;
            let longitude = prompt_coordinate("Longitude:", 180.0)?;
            GeolocationConfig::Fixed { latitude, longitude }
        }
        MODE_DISABLED => GeolocationConfig::Disabled,
        _ => match config.geolocation {
            ip @ GeolocationConfig::Ip { .. } => ip,
            _ => GeolocationConfig::default(),
        },
    };

    config.save_to(config_path)?;
    println!("Saved configuration to {}", config_path.display());
    Ok(())
}

fn prompt_coordinate(label: &str, limit: f64) -> Result<f64> {
    CustomType::<f64>::new(label)
        .with_error_message("Please type a decimal number")
        .with_validator(move |value: &f64| -> Result<Validation, CustomUserError> {
            if (-limit..=limit).contains(value) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid(format!("must be between -{limit} and {limit}").into()))
            }
        })
        .prompt()
        .with_context(|| format!("{label} prompt was cancelled"))
}
