use homeweather_core::{FileHomeStore, Trigger, WeatherWidget};
use inquire::{InquireError, Select, Text};
use std::{fmt, process::ExitCode};

use crate::presenter::TerminalPresenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    CurrentLocation,
    Home,
    SaveHome,
    ToggleUnit,
    Refresh,
    Quit,
}

impl Action {
    const ALL: [Action; 7] = [
        Action::Search,
        Action::CurrentLocation,
        Action::Home,
        Action::SaveHome,
        Action::ToggleUnit,
        Action::Refresh,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search for a place",
            Action::CurrentLocation => "Use current location",
            Action::Home => "Show home location",
            Action::SaveHome => "Save as home location",
            Action::ToggleUnit => "Switch °F/°C",
            Action::Refresh => "Refresh",
            Action::Quit => "Quit",
        })
    }
}

/// Show the startup weather, then handle menu selections until the user quits.
///
/// Handler failures are already on screen, so they never end the session.
pub async fn run(
    mut widget: WeatherWidget<FileHomeStore, TerminalPresenter>,
) -> anyhow::Result<ExitCode> {
    if let Err(err) = widget.start().await {
        tracing::debug!("startup failed: {err}");
    }

    loop {
        let action = match Select::new("What next?", Action::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let result = match action {
            Action::Search => {
                let placeholder = widget.presenter().placeholder().to_string();
                match Text::new("Place:").with_placeholder(&placeholder).prompt() {
                    Ok(text) => widget.submit_search(&text).await,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(e) => return Err(e.into()),
                }
            }
            Action::CurrentLocation => widget.use_current_location(Trigger::User).await,
            Action::Home => widget.load_home(Trigger::User).await,
            Action::SaveHome => widget.save_home().await,
            Action::ToggleUnit => widget.toggle_unit().await,
            Action::Refresh => widget.refresh().await,
            Action::Quit => break,
        };

        if let Err(err) = result {
            tracing::debug!("{action} failed: {err}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
