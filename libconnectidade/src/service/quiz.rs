//! Quiz loading and answer submission

use std::sync::Arc;

use crate::api::Backend;
use crate::error::{ConnectError, Result};
use crate::types::{AnswerResult, AnswerSubmission, LessonId, Quiz, UserId};

#[derive(Clone)]
pub struct QuizService {
    backend: Arc<dyn Backend>,
}

impl QuizService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Load the quiz attached to a lesson
    ///
    /// A quiz without questions is treated as missing data.
    pub async fn load(&self, lesson_id: LessonId) -> Result<Quiz> {
        let quiz = self.backend.fetch_quiz(lesson_id).await?;
        if quiz.questions.is_empty() {
            return Err(ConnectError::MissingData(format!(
                "Quiz da lição {} não possui perguntas",
                lesson_id
            )));
        }
        Ok(quiz)
    }

    pub async fn submit(&self, user_id: UserId, answer: AnswerSubmission) -> Result<AnswerResult> {
        let result = self.backend.submit_answer(user_id, answer).await?;
        tracing::debug!(
            question = answer.question_id,
            option = answer.option_id,
            correct = result.correct,
            "Answer submitted"
        );
        Ok(result)
    }
}
