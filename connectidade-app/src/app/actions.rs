//! Actions for the reducer pattern
//!
//! Every change to `AppState` is described by one of these values.

use libconnectidade::{Progress, User};

use super::screen::{NavParams, Screen};
use super::state::{Alert, Setting, Toast};

#[derive(Debug, Clone)]
pub enum Action {
    // === Navigation ===
    /// Replace the current screen and its parameters
    NavigateTo { screen: Screen, params: NavParams },

    // === Session ===
    /// Login and the first progress read both succeeded
    LoggedIn { user: User, progress: Progress },

    /// Fresh snapshot from the server
    ProgressLoaded(Progress),

    // === Settings ===
    ToggleSetting(Setting),

    // === Notifications ===
    ShowToast(Toast),
    ClearToast,
    ShowAlert(Alert),
    DismissAlert,
}
