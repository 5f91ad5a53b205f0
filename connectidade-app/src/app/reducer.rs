//! Pure reducer function for state transitions
//!
//! `(AppState, Action) -> AppState` with no I/O. Network calls, timers and
//! simulator state live in the navigator, which feeds results back in as
//! actions.

use super::actions::Action;
use super::state::{AccessibilitySettings, AppState};

pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === Navigation ===
        Action::NavigateTo { screen, params } => AppState {
            current_screen: screen,
            nav_params: params,
            nav_generation: state.nav_generation.wrapping_add(1),
            ..state
        },

        // === Session ===
        Action::LoggedIn { user, progress } => {
            let settings = AccessibilitySettings {
                high_contrast: user.high_contrast,
                large_text: user.large_text,
                ..state.settings
            };
            AppState {
                user: Some(user),
                progress: Some(progress),
                settings,
                ..state
            }
        }

        Action::ProgressLoaded(progress) => AppState {
            progress: Some(progress),
            ..state
        },

        // === Settings ===
        Action::ToggleSetting(setting) => AppState {
            settings: state.settings.toggled(setting),
            ..state
        },

        // === Notifications ===
        Action::ShowToast(toast) => AppState {
            toast: Some(toast),
            ..state
        },

        Action::ClearToast => AppState {
            toast: None,
            ..state
        },

        Action::ShowAlert(alert) => AppState {
            alert: Some(alert),
            ..state
        },

        Action::DismissAlert => AppState {
            alert: None,
            ..state
        },
    }
}
