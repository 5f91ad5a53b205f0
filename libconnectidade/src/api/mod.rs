//! Backend abstraction
//!
//! [`Backend`] is the one seam between the app and the learning server.
//! [`http::HttpBackend`] talks to the real REST API; [`mock::MockBackend`]
//! is an in-memory stand-in with failure injection used by the tests.
//!
//! # Example
//!
//! ```no_run
//! use libconnectidade::api::{Backend, http::HttpBackend};
//! use libconnectidade::config::ApiConfig;
//! use libconnectidade::types::LoginRequest;
//!
//! # async fn example() -> Result<(), libconnectidade::error::ApiError> {
//! let backend = HttpBackend::new(&ApiConfig::default())?;
//! let session = backend
//!     .login(&LoginRequest {
//!         google_id: "g-1".to_string(),
//!         email: "maria@example.com".to_string(),
//!         display_name: "Maria".to_string(),
//!     })
//!     .await?;
//! let progress = backend.fetch_progress(session.user.id).await?;
//! println!("{} pontos", progress.total_score);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::error::ApiError;
use crate::types::{
    AnswerResult, AnswerSubmission, Lesson, LessonId, LoginRequest, LoginResponse, MedalGrant,
    ModuleRecord, ModuleRecordId, Progress, Quiz, SettingsUpdate, UserId,
};

pub mod endpoints;
pub mod http;

// Mock backend is available for all builds (not just tests) to support integration tests
pub mod mock;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Operations the app needs from the learning server
///
/// Implementations that hold a session (the bearer token returned by
/// [`Backend::login`]) attach it to every later request.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Authenticate and start a session
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;

    async fn fetch_progress(&self, user_id: UserId) -> ApiResult<Progress>;

    async fn complete_lesson(&self, user_id: UserId, lesson_id: LessonId) -> ApiResult<()>;

    async fn grant_medal(&self, user_id: UserId, grant: &MedalGrant) -> ApiResult<()>;

    async fn reset_progress(&self, user_id: UserId) -> ApiResult<()>;

    async fn update_settings(&self, user_id: UserId, settings: SettingsUpdate) -> ApiResult<()>;

    async fn list_modules(&self) -> ApiResult<Vec<ModuleRecord>>;

    async fn list_lessons(&self, module_id: ModuleRecordId) -> ApiResult<Vec<Lesson>>;

    async fn fetch_quiz(&self, lesson_id: LessonId) -> ApiResult<Quiz>;

    async fn submit_answer(
        &self,
        user_id: UserId,
        answer: AnswerSubmission,
    ) -> ApiResult<AnswerResult>;
}
