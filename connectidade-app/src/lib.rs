//! connectidade-app library
//!
//! Navigation store, guided simulators, quiz session and view projections
//! for the ConnectIdade trainer. The `connectidade` binary drives these from
//! the command line; tests drive them with a mock backend and a manual
//! clock.

pub mod app;
pub mod error;
pub mod navigator;
pub mod quiz;
pub mod runner;
pub mod views;

pub use app::{reduce, Action, AppState, NavParams, Screen, Setting, ToastKind};
pub use error::{AppError, Result};
pub use navigator::Navigator;
pub use runner::{SimAction, Simulation};
pub use views::ScreenView;
