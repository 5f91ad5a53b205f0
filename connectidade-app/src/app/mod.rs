//! Application module
//!
//! - Screen: where the user is
//! - Actions: what can happen
//! - State: what is true right now
//! - Reducer: pure function (State, Action) -> State

pub mod actions;
pub mod reducer;
pub mod screen;
pub mod state;

pub use actions::Action;
pub use reducer::reduce;
pub use screen::{NavParams, Screen};
pub use state::{AccessibilitySettings, Alert, AppState, Setting, Toast, ToastKind};
