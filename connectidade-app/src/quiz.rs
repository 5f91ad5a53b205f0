//! Quiz screen session
//!
//! One question per lesson. The chosen option is marked correct or
//! incorrect after submission; the right answer is never revealed. Retry
//! clears the selection and the result and nothing else.

use serde::Serialize;

use libconnectidade::types::{AnswerResult, AnswerSubmission, OptionId, Question, Quiz};
use libconnectidade::{LessonId, ModuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionMark {
    Neutral,
    Correct,
    Incorrect,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    lesson_id: LessonId,
    module: Option<ModuleId>,
    quiz: Quiz,
    selected: Option<OptionId>,
    result: Option<AnswerResult>,
}

impl QuizSession {
    /// Callers must pass a quiz with at least one question
    pub fn new(lesson_id: LessonId, module: Option<ModuleId>, quiz: Quiz) -> Self {
        Self {
            lesson_id,
            module,
            quiz,
            selected: None,
            result: None,
        }
    }

    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    /// Module the quiz belongs to, used by the back action
    pub fn module(&self) -> Option<ModuleId> {
        self.module
    }

    pub fn question(&self) -> Option<&Question> {
        self.quiz.questions.first()
    }

    pub fn selected(&self) -> Option<OptionId> {
        self.selected
    }

    pub fn result(&self) -> Option<&AnswerResult> {
        self.result.as_ref()
    }

    pub fn is_answered(&self) -> bool {
        self.result.is_some()
    }

    /// Build the submission for `option_id`
    ///
    /// `None` once answered or when the option is not part of the question.
    pub fn submission(&self, option_id: OptionId) -> Option<AnswerSubmission> {
        if self.is_answered() {
            return None;
        }
        let question = self.question()?;
        question
            .options
            .iter()
            .any(|o| o.id == option_id)
            .then_some(AnswerSubmission {
                question_id: question.id,
                option_id,
            })
    }

    /// Record the server's verdict for `option_id`
    pub fn record(&mut self, option_id: OptionId, result: AnswerResult) {
        if self.is_answered() {
            return;
        }
        self.selected = Some(option_id);
        self.result = Some(result);
    }

    pub fn retry(&mut self) {
        self.selected = None;
        self.result = None;
    }

    pub fn mark(&self, option_id: OptionId) -> OptionMark {
        match (&self.result, self.selected) {
            (Some(result), Some(selected)) if selected == option_id => {
                if result.correct {
                    OptionMark::Correct
                } else {
                    OptionMark::Incorrect
                }
            }
            _ => OptionMark::Neutral,
        }
    }
}
