//! Lesson-id resolution for catalog modules

use std::sync::Arc;

use crate::api::Backend;
use crate::catalog::ModuleId;
use crate::error::{ConnectError, Result};
use crate::types::{Lesson, LessonId, LessonKind, ModuleRecord};

/// Lesson ids a module screen needs from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLessons {
    pub simulator: LessonId,
    pub video: Option<LessonId>,
    pub quiz: Option<LessonId>,
}

impl ResolvedLessons {
    /// Pick the first lesson of each kind
    ///
    /// Fails when there is no simulator lesson: without it the module can
    /// never be marked complete.
    pub fn from_lessons(module: ModuleId, lessons: &[Lesson]) -> Result<Self> {
        let first = |kind: LessonKind| lessons.iter().find(|l| l.kind == kind).map(|l| l.id);

        let simulator = first(LessonKind::Simulator).ok_or_else(|| {
            ConnectError::MissingData(format!(
                "Módulo \"{}\" não possui lição de simulador",
                module.backend_title()
            ))
        })?;

        Ok(Self {
            simulator,
            video: first(LessonKind::Video),
            quiz: first(LessonKind::Quiz),
        })
    }
}

#[derive(Clone)]
pub struct LessonService {
    backend: Arc<dyn Backend>,
}

impl LessonService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Locate the module by its backend title
    pub async fn find_module(&self, module: ModuleId) -> Result<ModuleRecord> {
        let modules = self.backend.list_modules().await?;
        modules
            .into_iter()
            .find(|m| m.title == module.backend_title())
            .ok_or_else(|| {
                ConnectError::MissingData(format!(
                    "Módulo \"{}\" não encontrado",
                    module.backend_title()
                ))
            })
    }

    pub async fn lessons(&self, module: ModuleId) -> Result<Vec<Lesson>> {
        let record = self.find_module(module).await?;
        Ok(self.backend.list_lessons(record.id).await?)
    }

    pub async fn resolve(&self, module: ModuleId) -> Result<ResolvedLessons> {
        let lessons = self.lessons(module).await?;
        let resolved = ResolvedLessons::from_lessons(module, &lessons)?;
        tracing::debug!(
            module = %module,
            simulator = resolved.simulator,
            quiz = ?resolved.quiz,
            "Resolved lesson ids"
        );
        Ok(resolved)
    }
}
