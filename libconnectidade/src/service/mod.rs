//! Service layer for ConnectIdade
//!
//! Business rules that sit on top of the raw [`Backend`] calls and that any
//! front end needs the same way:
//!
//! - `LessonService`: find a catalog module on the server and resolve its
//!   simulator / quiz lesson ids
//! - `ProgressService`: mutate progress, then re-read the snapshot wholesale
//! - `QuizService`: load a lesson's quiz and submit answers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use libconnectidade::api::mock::MockBackend;
//! use libconnectidade::catalog::ModuleId;
//! use libconnectidade::service::LearningService;
//!
//! # async fn example() -> libconnectidade::Result<()> {
//! let service = LearningService::new(Arc::new(MockBackend::seeded()));
//! let ids = service.lessons().resolve(ModuleId::Camera).await?;
//! println!("simulator lesson {}", ids.simulator);
//! # Ok(())
//! # }
//! ```

pub mod lessons;
pub mod progress;
pub mod quiz;

pub use lessons::{LessonService, ResolvedLessons};
pub use progress::ProgressService;
pub use quiz::QuizService;

use std::sync::Arc;

use crate::api::Backend;

/// Facade over the sub-services, all sharing one backend handle
#[derive(Clone)]
pub struct LearningService {
    backend: Arc<dyn Backend>,
    lessons: LessonService,
    progress: ProgressService,
    quiz: QuizService,
}

impl LearningService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            lessons: LessonService::new(Arc::clone(&backend)),
            progress: ProgressService::new(Arc::clone(&backend)),
            quiz: QuizService::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// Direct backend access for calls without extra rules (login, settings)
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    pub fn lessons(&self) -> &LessonService {
        &self.lessons
    }

    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    pub fn quiz(&self) -> &QuizService {
        &self.quiz
    }
}
