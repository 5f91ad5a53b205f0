//! Progress mutations
//!
//! Every mutation is followed by a full re-read of the snapshot. The caller
//! only ever sees server-confirmed progress; nothing is incremented locally.

use std::sync::Arc;

use crate::api::Backend;
use crate::error::Result;
use crate::types::{LessonId, MedalGrant, Progress, UserId};

#[derive(Clone)]
pub struct ProgressService {
    backend: Arc<dyn Backend>,
}

impl ProgressService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn snapshot(&self, user_id: UserId) -> Result<Progress> {
        Ok(self.backend.fetch_progress(user_id).await?)
    }

    pub async fn complete_lesson(&self, user_id: UserId, lesson_id: LessonId) -> Result<Progress> {
        self.backend.complete_lesson(user_id, lesson_id).await?;
        tracing::info!(user_id, lesson_id, "Lesson completed");
        self.snapshot(user_id).await
    }

    pub async fn grant_medal(&self, user_id: UserId, name: &str, bonus_points: u32) -> Result<Progress> {
        let grant = MedalGrant {
            name: name.to_string(),
            bonus_points,
        };
        self.backend.grant_medal(user_id, &grant).await?;
        tracing::info!(user_id, medal = name, bonus_points, "Medal granted");
        self.snapshot(user_id).await
    }

    pub async fn reset(&self, user_id: UserId) -> Result<Progress> {
        self.backend.reset_progress(user_id).await?;
        tracing::info!(user_id, "Progress reset");
        self.snapshot(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockBackend, Operation};
    use crate::catalog::ModuleId;
    use crate::types::LoginRequest;

    async fn logged_in() -> (Arc<MockBackend>, ProgressService) {
        let backend = Arc::new(MockBackend::seeded());
        backend
            .login(&LoginRequest {
                google_id: "g".to_string(),
                email: "e@x.com".to_string(),
                display_name: "E".to_string(),
            })
            .await
            .unwrap();
        let service = ProgressService::new(Arc::clone(&backend) as Arc<dyn Backend>);
        (backend, service)
    }

    #[tokio::test]
    async fn test_complete_returns_fresh_snapshot() {
        let (backend, service) = logged_in().await;
        let (sim, _, _) = MockBackend::lesson_ids(ModuleId::Calls);

        let progress = service.complete_lesson(1, sim).await.unwrap();
        assert!(progress.is_completed(sim));
        assert_eq!(backend.call_count(Operation::FetchProgress), 1);
    }

    #[tokio::test]
    async fn test_failed_mutation_skips_refresh() {
        let (backend, service) = logged_in().await;
        backend.fail(Operation::GrantMedal);

        assert!(service.grant_medal(1, "Guardião Digital", 15).await.is_err());
        assert_eq!(backend.call_count(Operation::FetchProgress), 0);
    }

    #[tokio::test]
    async fn test_medal_and_reset() {
        let (_backend, service) = logged_in().await;

        let progress = service.grant_medal(1, "Guardião Digital", 15).await.unwrap();
        assert_eq!(progress.total_score, 15);
        assert!(progress.has_medal("Guardião Digital"));

        let progress = service.reset(1).await.unwrap();
        assert_eq!(progress, Progress::default());
    }
}
