//! In-memory backend for testing
//!
//! Behaves like a single-user learning server seeded with the four catalog
//! modules. Any operation can be made to fail, and every call is counted,
//! so tests can check both the state the app ends up in and which requests
//! it made.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{ApiResult, Backend};
use crate::catalog::ModuleId;
use crate::error::ApiError;
use crate::types::{
    AnswerOption, AnswerResult, AnswerSubmission, EarnedMedal, Lesson, LessonId, LessonKind,
    LoginRequest, LoginResponse, Medal, MedalGrant, ModuleRecord, ModuleRecordId, OptionId,
    Progress, Question, QuestionId, Quiz, SettingsUpdate, User, UserId,
};

/// Backend operations, used to inject failures and count calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    FetchProgress,
    CompleteLesson,
    GrantMedal,
    ResetProgress,
    UpdateSettings,
    ListModules,
    ListLessons,
    FetchQuiz,
    SubmitAnswer,
}

struct StoredQuiz {
    quiz: Quiz,
    correct: HashMap<QuestionId, OptionId>,
    explanation: String,
}

struct MockState {
    user: User,
    token: Option<String>,
    modules: Vec<ModuleRecord>,
    lessons: HashMap<ModuleRecordId, Vec<Lesson>>,
    quizzes: HashMap<LessonId, StoredQuiz>,
    progress: Progress,
    failing: HashMap<Operation, ApiError>,
    calls: HashMap<Operation, usize>,
    settings_writes: Vec<SettingsUpdate>,
    next_medal_id: i64,
}

/// Mock learning server
pub struct MockBackend {
    state: Mutex<MockState>,
}

const GRANTED_AT: &str = "2025-01-15T10:00:00";

impl MockBackend {
    /// Server with the four modules, each with simulator, video and quiz lessons
    ///
    /// Ids are derived from the module position `n` (1-based): module `n`,
    /// lessons `10n+1` (simulator), `10n+2` (video), `10n+3` (quiz), quiz
    /// question `10n+5` whose correct option is `100n+2`.
    pub fn seeded() -> Self {
        let mut modules = Vec::new();
        let mut lessons = HashMap::new();
        let mut quizzes = HashMap::new();

        for (index, module) in ModuleId::ALL.into_iter().enumerate() {
            let n = index as i64 + 1;
            modules.push(ModuleRecord {
                id: n,
                title: module.backend_title().to_string(),
                description: Some(module.video().description.to_string()),
                order: n as i32,
            });

            let lesson = |offset: i64, kind: LessonKind, title: &str| Lesson {
                id: 10 * n + offset,
                module_id: Some(n),
                kind,
                title: title.to_string(),
                reward_points: if kind == LessonKind::Simulator { 10 } else { 5 },
            };
            lessons.insert(
                n,
                vec![
                    lesson(1, LessonKind::Simulator, "Simulador"),
                    lesson(2, LessonKind::Video, module.video().title),
                    lesson(3, LessonKind::Quiz, "Quiz"),
                ],
            );

            let (prompt, options, explanation) = seeded_question(module);
            let question_id = 10 * n + 5;
            let quiz = Quiz {
                id: 100 * n,
                lesson_id: 10 * n + 3,
                questions: vec![Question {
                    id: question_id,
                    prompt: prompt.to_string(),
                    options: options
                        .iter()
                        .enumerate()
                        .map(|(i, text)| AnswerOption {
                            id: 100 * n + i as i64 + 1,
                            text: text.to_string(),
                        })
                        .collect(),
                }],
            };
            quizzes.insert(
                10 * n + 3,
                StoredQuiz {
                    quiz,
                    correct: HashMap::from([(question_id, 100 * n + 2)]),
                    explanation: explanation.to_string(),
                },
            );
        }

        Self {
            state: Mutex::new(MockState {
                user: User {
                    id: 1,
                    display_name: "Maria".to_string(),
                    email: "maria@example.com".to_string(),
                    large_text: false,
                    high_contrast: false,
                },
                token: None,
                modules,
                lessons,
                quizzes,
                progress: Progress::default(),
                failing: HashMap::new(),
                calls: HashMap::new(),
                settings_writes: Vec::new(),
                next_medal_id: 1,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the state from the others
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Lesson ids of a seeded module: (simulator, video, quiz)
    pub fn lesson_ids(module: ModuleId) -> (LessonId, LessonId, LessonId) {
        let n = ModuleId::ALL
            .iter()
            .position(|m| *m == module)
            .map(|i| i as i64 + 1)
            .unwrap_or(0);
        (10 * n + 1, 10 * n + 2, 10 * n + 3)
    }

    /// Correct option of the seeded quiz for a module
    pub fn correct_option(module: ModuleId) -> OptionId {
        let (_, _, quiz) = Self::lesson_ids(module);
        (quiz / 10) * 100 + 2
    }

    /// Make every call to `op` fail with a network error until [`recover`](Self::recover)
    pub fn fail(&self, op: Operation) {
        self.fail_with(op, ApiError::Network("connection refused".to_string()));
    }

    pub fn fail_with(&self, op: Operation, error: ApiError) {
        self.state().failing.insert(op, error);
    }

    pub fn recover(&self, op: Operation) {
        self.state().failing.remove(&op);
    }

    pub fn call_count(&self, op: Operation) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn settings_writes(&self) -> Vec<SettingsUpdate> {
        self.state().settings_writes.clone()
    }

    pub fn progress(&self) -> Progress {
        self.state().progress.clone()
    }

    pub fn session_token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn set_user_settings(&self, large_text: bool, high_contrast: bool) {
        let mut state = self.state();
        state.user.large_text = large_text;
        state.user.high_contrast = high_contrast;
    }

    /// Drop a module from `/api/modulos`
    pub fn remove_module(&self, module: ModuleId) {
        self.state()
            .modules
            .retain(|m| m.title != module.backend_title());
    }

    /// Drop every lesson of `kind` from a module
    pub fn remove_lessons(&self, module: ModuleId, kind: LessonKind) {
        let mut state = self.state();
        let record = state
            .modules
            .iter()
            .find(|m| m.title == module.backend_title())
            .map(|m| m.id);
        if let Some(id) = record {
            if let Some(lessons) = state.lessons.get_mut(&id) {
                lessons.retain(|l| l.kind != kind);
            }
        }
    }

    /// Count the call and return the injected failure, if any
    fn enter(&self, op: Operation) -> ApiResult<MutexGuard<'_, MockState>> {
        let mut state = self.state();
        *state.calls.entry(op).or_insert(0) += 1;
        if let Some(error) = state.failing.get(&op).cloned() {
            return Err(error);
        }
        Ok(state)
    }

    fn authorize(state: &MockState, user_id: UserId) -> ApiResult<()> {
        if state.token.is_none() {
            return Err(ApiError::Unauthorized("missing bearer token".to_string()));
        }
        if user_id != state.user.id {
            return Err(ApiError::NotFound(format!("usuario {}", user_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let mut state = self.enter(Operation::Login)?;
        state.user.email = request.email.clone();
        state.user.display_name = request.display_name.clone();
        let token = format!("mock-token-{}", request.google_id);
        state.token = Some(token.clone());

        Ok(LoginResponse {
            token,
            user: state.user.clone(),
        })
    }

    async fn fetch_progress(&self, user_id: UserId) -> ApiResult<Progress> {
        let state = self.enter(Operation::FetchProgress)?;
        Self::authorize(&state, user_id)?;
        Ok(state.progress.clone())
    }

    async fn complete_lesson(&self, user_id: UserId, lesson_id: LessonId) -> ApiResult<()> {
        let mut state = self.enter(Operation::CompleteLesson)?;
        Self::authorize(&state, user_id)?;

        let reward = state
            .lessons
            .values()
            .flatten()
            .find(|l| l.id == lesson_id)
            .map(|l| l.reward_points)
            .ok_or_else(|| ApiError::NotFound(format!("licao {}", lesson_id)))?;

        if !state.progress.is_completed(lesson_id) {
            state.progress.completed_lesson_ids.push(lesson_id);
            state.progress.total_score += i64::from(reward);
        }
        Ok(())
    }

    async fn grant_medal(&self, user_id: UserId, grant: &MedalGrant) -> ApiResult<()> {
        let mut state = self.enter(Operation::GrantMedal)?;
        Self::authorize(&state, user_id)?;

        if state.progress.has_medal(&grant.name) {
            return Ok(());
        }
        let id = state.next_medal_id;
        state.next_medal_id += 1;
        state.progress.total_score += i64::from(grant.bonus_points);
        state.progress.medals.push(EarnedMedal {
            id,
            medal: Medal {
                id,
                name: grant.name.clone(),
                description: None,
            },
            granted_at: NaiveDateTime::parse_from_str(GRANTED_AT, "%Y-%m-%dT%H:%M:%S").ok(),
        });
        Ok(())
    }

    async fn reset_progress(&self, user_id: UserId) -> ApiResult<()> {
        let mut state = self.enter(Operation::ResetProgress)?;
        Self::authorize(&state, user_id)?;
        state.progress = Progress::default();
        Ok(())
    }

    async fn update_settings(&self, user_id: UserId, settings: SettingsUpdate) -> ApiResult<()> {
        let mut state = self.enter(Operation::UpdateSettings)?;
        Self::authorize(&state, user_id)?;
        state.user.large_text = settings.large_text;
        state.user.high_contrast = settings.high_contrast;
        state.settings_writes.push(settings);
        Ok(())
    }

    async fn list_modules(&self) -> ApiResult<Vec<ModuleRecord>> {
        let state = self.enter(Operation::ListModules)?;
        Ok(state.modules.clone())
    }

    async fn list_lessons(&self, module_id: ModuleRecordId) -> ApiResult<Vec<Lesson>> {
        let state = self.enter(Operation::ListLessons)?;
        state
            .lessons
            .get(&module_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("modulo {}", module_id)))
    }

    async fn fetch_quiz(&self, lesson_id: LessonId) -> ApiResult<Quiz> {
        let state = self.enter(Operation::FetchQuiz)?;
        state
            .quizzes
            .get(&lesson_id)
            .map(|stored| stored.quiz.clone())
            .ok_or_else(|| ApiError::NotFound(format!("quiz da licao {}", lesson_id)))
    }

    async fn submit_answer(
        &self,
        user_id: UserId,
        answer: AnswerSubmission,
    ) -> ApiResult<AnswerResult> {
        let state = self.enter(Operation::SubmitAnswer)?;
        Self::authorize(&state, user_id)?;

        let stored = state
            .quizzes
            .values()
            .find(|q| q.correct.contains_key(&answer.question_id))
            .ok_or_else(|| ApiError::NotFound(format!("pergunta {}", answer.question_id)))?;

        Ok(AnswerResult {
            correct: stored.correct.get(&answer.question_id) == Some(&answer.option_id),
            explanation: stored.explanation.clone(),
        })
    }
}

fn seeded_question(module: ModuleId) -> (&'static str, [&'static str; 4], &'static str) {
    match module {
        ModuleId::Calls => (
            "Qual a função do botão vermelho durante uma chamada?",
            [
                "A) Aumentar o volume da chamada",
                "B) Encerrar a ligação",
                "C) Colocar a chamada em espera",
                "D) Ativar o viva-voz",
            ],
            "O botão vermelho é usado para encerrar a ligação.",
        ),
        ModuleId::Messages => (
            "Qual ícone você deve pressionar para enviar um áudio no WhatsApp?",
            [
                "A) Câmera 📷",
                "B) Microfone 🎤",
                "C) Clipe de papel 📎",
                "D) Emoji 😊",
            ],
            "O ícone do microfone (🎤) é usado para gravar e enviar mensagens de áudio.",
        ),
        ModuleId::Security => (
            "O que você deve fazer quando receber uma mensagem pedindo seus dados bancários?",
            [
                "A) Enviar os dados imediatamente",
                "B) Nunca fornecer dados bancários por mensagem",
                "C) Enviar apenas o número da conta",
                "D) Perguntar mais detalhes antes de enviar",
            ],
            "NUNCA forneça seus dados bancários, senhas ou informações pessoais por mensagem.",
        ),
        ModuleId::Camera => (
            "Qual ícone você deve pressionar para alternar entre câmera frontal e traseira?",
            [
                "A) Flash ⚡",
                "B) Rotação/Troca 🔄",
                "C) Timer ⏱️",
                "D) Grade 📐",
            ],
            "O ícone de rotação/troca (🔄) alterna entre a câmera frontal e a traseira.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_request() -> LoginRequest {
        LoginRequest {
            google_id: "g-1".to_string(),
            email: "maria@example.com".to_string(),
            display_name: "Maria".to_string(),
        }
    }

    #[tokio::test]
    async fn test_progress_requires_login() {
        let backend = MockBackend::seeded();
        let err = backend.fetch_progress(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));

        backend.login(&login_request()).await.unwrap();
        assert!(backend.fetch_progress(1).await.is_ok());
        assert_eq!(backend.session_token().as_deref(), Some("mock-token-g-1"));
    }

    #[tokio::test]
    async fn test_completion_scores_once() {
        let backend = MockBackend::seeded();
        backend.login(&login_request()).await.unwrap();
        let (sim, _, _) = MockBackend::lesson_ids(ModuleId::Camera);

        backend.complete_lesson(1, sim).await.unwrap();
        backend.complete_lesson(1, sim).await.unwrap();

        let progress = backend.progress();
        assert_eq!(progress.completed_lesson_ids, vec![sim]);
        assert_eq!(progress.total_score, 10);
    }

    #[tokio::test]
    async fn test_injected_failure_and_recovery() {
        let backend = MockBackend::seeded();
        backend.fail(Operation::ListModules);

        assert!(backend.list_modules().await.unwrap_err().is_network());
        backend.recover(Operation::ListModules);
        assert_eq!(backend.list_modules().await.unwrap().len(), 4);
        assert_eq!(backend.call_count(Operation::ListModules), 2);
    }

    #[tokio::test]
    async fn test_seeded_quiz_answer() {
        let backend = MockBackend::seeded();
        backend.login(&login_request()).await.unwrap();
        let (_, _, quiz_lesson) = MockBackend::lesson_ids(ModuleId::Calls);

        let quiz = backend.fetch_quiz(quiz_lesson).await.unwrap();
        let question = &quiz.questions[0];
        assert_eq!(question.options.len(), 4);

        let right = backend
            .submit_answer(
                1,
                AnswerSubmission {
                    question_id: question.id,
                    option_id: MockBackend::correct_option(ModuleId::Calls),
                },
            )
            .await
            .unwrap();
        assert!(right.correct);

        let wrong = backend
            .submit_answer(
                1,
                AnswerSubmission {
                    question_id: question.id,
                    option_id: question.options[0].id,
                },
            )
            .await
            .unwrap();
        assert!(!wrong.correct);
    }

    #[tokio::test]
    async fn test_remove_lessons() {
        let backend = MockBackend::seeded();
        backend.remove_lessons(ModuleId::Messages, LessonKind::Quiz);

        let lessons = backend.list_lessons(2).await.unwrap();
        assert!(lessons.iter().all(|l| l.kind != LessonKind::Quiz));
    }
}
