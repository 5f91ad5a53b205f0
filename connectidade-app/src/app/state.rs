//! Application state
//!
//! Single source of truth for what the front end renders. Transitions
//! happen only through the reducer (see `reducer.rs`).

use serde::Serialize;

use libconnectidade::config::UiConfig;
use libconnectidade::{Progress, User};

use super::screen::{NavParams, Screen};

/// Root application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Screen currently shown
    pub current_screen: Screen,

    /// Parameters passed to the current screen
    pub nav_params: NavParams,

    /// Bumped on every navigation; results tagged with an older value are
    /// dropped
    pub nav_generation: u64,

    /// Logged-in user, absent until login succeeds
    pub user: Option<User>,

    /// Last server-confirmed progress snapshot
    pub progress: Option<Progress>,

    pub settings: AccessibilitySettings,

    /// Transient notification
    pub toast: Option<Toast>,

    /// Blocking dialog
    pub alert: Option<Alert>,

    pub config: UiConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccessibilitySettings {
    pub high_contrast: bool,
    pub large_text: bool,
    /// Kept on this device only
    pub audio_enabled: bool,
}

impl AccessibilitySettings {
    pub fn get(&self, setting: Setting) -> bool {
        match setting {
            Setting::HighContrast => self.high_contrast,
            Setting::LargeText => self.large_text,
            Setting::Audio => self.audio_enabled,
        }
    }

    pub fn toggled(self, setting: Setting) -> Self {
        match setting {
            Setting::HighContrast => Self {
                high_contrast: !self.high_contrast,
                ..self
            },
            Setting::LargeText => Self {
                large_text: !self.large_text,
                ..self
            },
            Setting::Audio => Self {
                audio_enabled: !self.audio_enabled,
                ..self
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    HighContrast,
    LargeText,
    Audio,
}

impl Setting {
    /// Whether the backend stores this flag
    pub fn is_persisted(self) -> bool {
        !matches!(self, Setting::Audio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl AppState {
    pub fn new(config: UiConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn user_id(&self) -> Option<libconnectidade::UserId> {
        self.user.as_ref().map(|u| u.id)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            current_screen: Screen::Splash,
            nav_params: NavParams::new(),
            nav_generation: 0,
            user: None,
            progress: None,
            settings: AccessibilitySettings::default(),
            toast: None,
            alert: None,
            config: UiConfig::default(),
        }
    }
}
