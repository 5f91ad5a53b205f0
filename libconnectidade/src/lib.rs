//! ConnectIdade - core library for the smartphone trainer
//!
//! Backend client, module catalog, configuration, logging and the timer
//! primitives shared by every ConnectIdade front end.

pub mod api;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod types;

// Re-export commonly used types
pub use api::{Backend, ApiResult};
pub use catalog::{ModuleId, TOTAL_MODULES};
pub use clock::{Clock, ManualClock, SystemClock, Timer};
pub use config::Config;
pub use error::{ApiError, ConnectError, Result};
pub use service::{LearningService, ResolvedLessons};
pub use types::{LessonId, Progress, User, UserId};
