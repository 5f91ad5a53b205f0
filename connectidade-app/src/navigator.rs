//! Navigation and state store
//!
//! `Navigator` owns the [`AppState`] and every side effect around it:
//! backend calls, the toast, settings and quiz hand-off timers, the mounted
//! simulator and the quiz session. Front ends call its methods, then read
//! [`Navigator::state`] or [`Navigator::view`] to render.
//!
//! Mutators never return errors. Failures are logged, shown as a toast or
//! alert, and the last known-good state is kept.
//!
//! Every method takes `&mut self`, so one action finishes (including its
//! network round trip) before the next starts. Results loaded for a screen
//! carry the navigation generation they were requested under and are
//! dropped if the user has moved on; see [`Navigator::load_request`].

use std::collections::HashMap;
use std::sync::Arc;

use libconnectidade::config::UiConfig;
use libconnectidade::types::{LoginRequest, OptionId, SettingsUpdate};
use libconnectidade::{
    Backend, Clock, ConnectError, LearningService, LessonId, ModuleId, Progress, ResolvedLessons,
    Timer, UserId,
};

use crate::app::{reduce, Action, Alert, AppState, NavParams, Screen, Setting, Toast, ToastKind};
use crate::quiz::QuizSession;
use crate::runner::{MedalAward, RunnerEvent, SimAction, Simulation};

/// Delay between a simulator finishing and the quiz opening
pub const QUIZ_HANDOFF_MS: u64 = 2000;

/// The camera already spent 3 s recording, so its quiz opens sooner
pub const CAMERA_QUIZ_HANDOFF_MS: u64 = 1000;

pub fn quiz_handoff_ms(module: ModuleId) -> u64 {
    match module {
        ModuleId::Camera => CAMERA_QUIZ_HANDOFF_MS,
        ModuleId::Calls | ModuleId::Messages | ModuleId::Security => QUIZ_HANDOFF_MS,
    }
}

pub const LESSON_DATA_ALERT: &str = "Não foi possível carregar os dados desta lição.";
pub const ACTIVITIES_ALERT: &str = "Não foi possível carregar as atividades.";
pub const QUIZ_NOT_FOUND: &str = "Quiz não encontrado.";

/// Screen-local data, rebuilt on every navigation
#[derive(Debug)]
pub enum Activity {
    Idle,
    /// Module menu and video screens
    Lessons {
        module: ModuleId,
        lessons: Option<ResolvedLessons>,
    },
    Simulator {
        lessons: Option<ResolvedLessons>,
        simulation: Simulation,
    },
    Quiz(Option<QuizSession>),
}

impl Activity {
    fn mount(screen: Screen) -> Self {
        match screen {
            Screen::ModuleMenu(module) | Screen::Video(module) => Activity::Lessons {
                module,
                lessons: None,
            },
            Screen::Simulator(module) => Activity::Simulator {
                lessons: None,
                simulation: Simulation::new(module),
            },
            Screen::Quiz => Activity::Quiz(None),
            Screen::Splash | Screen::Menu | Screen::Settings | Screen::Progress => Activity::Idle,
        }
    }

    fn lessons_mut(&mut self) -> Option<&mut Option<ResolvedLessons>> {
        match self {
            Activity::Lessons { lessons, .. } | Activity::Simulator { lessons, .. } => Some(lessons),
            _ => None,
        }
    }
}

/// What the current screen needs from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    Lessons(ModuleId),
    Quiz {
        lesson_id: Option<LessonId>,
        module: Option<ModuleId>,
    },
}

/// A screen load tagged with the generation it was requested under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest {
    generation: u64,
    kind: LoadKind,
}

impl LoadRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> LoadKind {
        self.kind
    }

    /// Perform the load; only needs the service, so it can run off the store
    pub async fn run(self, service: &LearningService) -> Loaded {
        let outcome = match self.kind {
            LoadKind::Lessons(module) => LoadOutcome::Lessons(service.lessons().resolve(module).await),
            LoadKind::Quiz { lesson_id, module } => {
                let session = match lesson_id {
                    Some(id) => service
                        .quiz()
                        .load(id)
                        .await
                        .map(|quiz| QuizSession::new(id, module, quiz)),
                    None => Err(ConnectError::InvalidInput(
                        "quiz screen opened without a lesson id".to_string(),
                    )),
                };
                LoadOutcome::Quiz(session)
            }
        };

        Loaded {
            request: self,
            outcome,
        }
    }
}

#[derive(Debug)]
enum LoadOutcome {
    Lessons(libconnectidade::Result<ResolvedLessons>),
    Quiz(libconnectidade::Result<QuizSession>),
}

/// Result of a [`LoadRequest`], applied with [`Navigator::apply_loaded`]
#[derive(Debug)]
pub struct Loaded {
    request: LoadRequest,
    outcome: LoadOutcome,
}

impl Loaded {
    pub fn generation(&self) -> u64 {
        self.request.generation
    }

    pub fn is_ok(&self) -> bool {
        match &self.outcome {
            LoadOutcome::Lessons(result) => result.is_ok(),
            LoadOutcome::Quiz(result) => result.is_ok(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Handoff {
    Quiz { lesson_id: LessonId, module: ModuleId },
    QuizMissing(ModuleId),
}

pub struct Navigator {
    state: AppState,
    service: LearningService,
    clock: Arc<dyn Clock>,
    activity: Activity,
    /// Lesson ids resolved so far, reused by the main menu projection
    known_lessons: HashMap<ModuleId, ResolvedLessons>,
    toast_timer: Timer<()>,
    persist_timer: Timer<()>,
    handoff_timer: Timer<Handoff>,
}

impl Navigator {
    pub fn new(service: LearningService, clock: Arc<dyn Clock>, config: UiConfig) -> Self {
        Self {
            state: AppState::new(config),
            service,
            clock,
            activity: Activity::Idle,
            known_lessons: HashMap::new(),
            toast_timer: Timer::new(),
            persist_timer: Timer::new(),
            handoff_timer: Timer::new(),
        }
    }

    // === Accessors ===

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn service(&self) -> &LearningService {
        &self.service
    }

    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        match &self.activity {
            Activity::Simulator { simulation, .. } => Some(simulation),
            _ => None,
        }
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        match &self.activity {
            Activity::Quiz(session) => session.as_ref(),
            _ => None,
        }
    }

    /// Lesson ids resolved for the current module screen
    pub fn lessons(&self) -> Option<&ResolvedLessons> {
        match &self.activity {
            Activity::Lessons { lessons, .. } | Activity::Simulator { lessons, .. } => lessons.as_ref(),
            _ => None,
        }
    }

    pub fn known_lessons(&self, module: ModuleId) -> Option<&ResolvedLessons> {
        self.known_lessons.get(&module)
    }

    pub fn has_pending_handoff(&self) -> bool {
        self.handoff_timer.is_pending()
    }

    /// Some timer-driven work is still waiting for `tick`
    pub fn has_pending_work(&self) -> bool {
        let simulating = self
            .simulation()
            .is_some_and(|s| s.runner().is_busy());
        simulating || self.handoff_timer.is_pending() || self.persist_timer.is_pending()
    }

    fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    // === Navigation ===

    pub fn navigate_to(&mut self, screen: Screen, params: NavParams) {
        tracing::debug!(from = %self.state.current_screen, to = %screen, "Navigate");
        self.handoff_timer.cancel();
        self.activity = Activity::mount(screen);
        self.dispatch(Action::NavigateTo { screen, params });
    }

    pub fn navigate_named(&mut self, route: &str, params: NavParams) {
        self.navigate_to(Screen::resolve(route), params);
    }

    /// Navigate, then load whatever the new screen needs
    pub async fn open(&mut self, screen: Screen, params: NavParams) {
        self.navigate_to(screen, params);
        self.load_screen().await;
    }

    // === Screen loading ===

    /// Backend data the current screen is waiting for, if any
    pub fn load_request(&self) -> Option<LoadRequest> {
        let kind = match self.state.current_screen {
            Screen::ModuleMenu(module) | Screen::Video(module) | Screen::Simulator(module) => {
                LoadKind::Lessons(module)
            }
            Screen::Quiz => LoadKind::Quiz {
                lesson_id: self.state.nav_params.lesson_id(),
                module: self.state.nav_params.module(),
            },
            Screen::Splash | Screen::Menu | Screen::Settings | Screen::Progress => return None,
        };

        Some(LoadRequest {
            generation: self.state.nav_generation,
            kind,
        })
    }

    /// Load the current screen's data, following any fallback navigation
    pub async fn load_screen(&mut self) {
        while let Some(request) = self.load_request() {
            let loaded = request.run(&self.service).await;
            let generation = self.state.nav_generation;
            self.apply_loaded(loaded);
            if self.state.nav_generation == generation {
                break;
            }
        }
    }

    pub fn apply_loaded(&mut self, loaded: Loaded) {
        if loaded.request.generation != self.state.nav_generation {
            tracing::debug!(
                requested = loaded.request.generation,
                current = self.state.nav_generation,
                "Dropping result for a screen that is gone"
            );
            return;
        }

        match loaded.outcome {
            LoadOutcome::Lessons(Ok(resolved)) => {
                if let LoadKind::Lessons(module) = loaded.request.kind {
                    self.known_lessons.insert(module, resolved);
                }
                if let Some(slot) = self.activity.lessons_mut() {
                    *slot = Some(resolved);
                }
            }
            LoadOutcome::Lessons(Err(e)) => {
                tracing::warn!(screen = %self.state.current_screen, error = %e, "Failed to resolve lessons");
                if let Screen::Simulator(_) = self.state.current_screen {
                    self.show_alert("Erro", LESSON_DATA_ALERT);
                    self.navigate_to(Screen::Menu, NavParams::new());
                } else {
                    self.show_alert("Erro de Conexão", ACTIVITIES_ALERT);
                }
            }
            LoadOutcome::Quiz(Ok(session)) => {
                if let Activity::Quiz(slot) = &mut self.activity {
                    *slot = Some(session);
                }
            }
            LoadOutcome::Quiz(Err(e)) => {
                tracing::warn!(error = %e, "Failed to load quiz");
                self.show_toast(QUIZ_NOT_FOUND, ToastKind::Error);
                let back = match loaded.request.kind {
                    LoadKind::Quiz {
                        module: Some(module),
                        ..
                    } => Screen::ModuleMenu(module),
                    _ => Screen::Menu,
                };
                self.navigate_to(back, NavParams::new());
            }
        }
    }

    // === Session ===

    /// Log in and load the first progress snapshot
    ///
    /// The user is recorded only when both calls succeed.
    pub async fn login(&mut self, request: &LoginRequest) -> bool {
        self.try_login(request).await.is_ok()
    }

    /// [`login`](Self::login), keeping the failure for callers that need it
    ///
    /// The error toast is shown either way.
    pub async fn try_login(&mut self, request: &LoginRequest) -> libconnectidade::Result<()> {
        let response = match self.service.backend().login(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Login failed");
                self.show_toast(
                    "Não foi possível entrar. Verifique sua conexão.",
                    ToastKind::Error,
                );
                return Err(e.into());
            }
        };

        let user = response.user;
        match self.service.progress().snapshot(user.id).await {
            Ok(progress) => {
                tracing::info!(user_id = user.id, "Logged in");
                self.dispatch(Action::LoggedIn { user, progress });
                self.navigate_to(Screen::Menu, NavParams::new());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Failed to load progress after login");
                self.show_toast("Não foi possível carregar seu progresso.", ToastKind::Error);
                Err(e)
            }
        }
    }

    fn require_user(&mut self) -> Option<UserId> {
        let user_id = self.state.user_id();
        if user_id.is_none() {
            tracing::warn!("No user logged in");
            self.show_toast("Faça login para salvar seu progresso.", ToastKind::Error);
        }
        user_id
    }

    fn progress_saved(&mut self, progress: Progress) {
        self.dispatch(Action::ProgressLoaded(progress));
    }

    // === Progress ===

    pub async fn complete_module(&mut self, lesson_id: LessonId) -> bool {
        let Some(user_id) = self.require_user() else {
            return false;
        };

        match self.service.progress().complete_lesson(user_id, lesson_id).await {
            Ok(progress) => {
                self.progress_saved(progress);
                self.show_toast("Lição concluída!", ToastKind::Success);
                true
            }
            Err(e) => {
                tracing::warn!(lesson_id, error = %e, "Failed to complete lesson");
                self.show_toast("Não foi possível salvar seu progresso.", ToastKind::Error);
                false
            }
        }
    }

    pub async fn add_medal(&mut self, name: &str, bonus_points: u32) -> bool {
        let Some(user_id) = self.require_user() else {
            return false;
        };

        match self.service.progress().grant_medal(user_id, name, bonus_points).await {
            Ok(progress) => {
                self.progress_saved(progress);
                self.show_toast(
                    format!("🏆 Medalha conquistada: {}! +{} pontos", name, bonus_points),
                    ToastKind::Success,
                );
                true
            }
            Err(e) => {
                tracing::warn!(medal = name, error = %e, "Failed to grant medal");
                self.show_toast("Não foi possível registrar sua medalha.", ToastKind::Error);
                false
            }
        }
    }

    pub async fn reset_progress(&mut self) -> bool {
        let Some(user_id) = self.require_user() else {
            return false;
        };

        match self.service.progress().reset(user_id).await {
            Ok(progress) => {
                self.progress_saved(progress);
                self.navigate_to(Screen::Menu, NavParams::new());
                self.show_toast("Progresso resetado com sucesso!", ToastKind::Info);
                true
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to reset progress");
                self.show_toast("Não foi possível resetar o progresso.", ToastKind::Error);
                false
            }
        }
    }

    // === Settings ===

    /// Flip a flag at once; persisted flags are written after a quiet period
    pub fn toggle_setting(&mut self, setting: Setting) {
        self.dispatch(Action::ToggleSetting(setting));
        if !setting.is_persisted() {
            return;
        }
        if self.state.user.is_none() {
            tracing::warn!(?setting, "Setting changed before login, not persisted");
            return;
        }

        let now = self.clock.now_ms();
        self.persist_timer
            .schedule(now, self.state.config.settings_debounce_ms, ());
    }

    async fn persist_settings(&mut self) {
        let Some(user_id) = self.state.user_id() else {
            return;
        };
        let update = SettingsUpdate {
            large_text: self.state.settings.large_text,
            high_contrast: self.state.settings.high_contrast,
        };

        match self.service.backend().update_settings(user_id, update).await {
            Ok(()) => tracing::debug!(user_id, ?update, "Settings saved"),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to save settings");
                self.show_toast("Não foi possível salvar suas configurações.", ToastKind::Error);
            }
        }
    }

    // === Notifications ===

    pub fn show_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        let duration = self.state.config.toast_ms;
        self.show_toast_for(message, kind, duration);
    }

    /// Show a toast, replacing any live one and restarting the expiry
    pub fn show_toast_for(&mut self, message: impl Into<String>, kind: ToastKind, duration_ms: u64) {
        let now = self.clock.now_ms();
        self.toast_timer.schedule(now, duration_ms, ());
        self.dispatch(Action::ShowToast(Toast::new(message, kind)));
    }

    pub fn show_alert(&mut self, title: &str, message: &str) {
        self.dispatch(Action::ShowAlert(Alert {
            title: title.to_string(),
            message: message.to_string(),
        }));
    }

    pub fn dismiss_alert(&mut self) {
        self.dispatch(Action::DismissAlert);
    }

    // === Time ===

    /// Fire everything that is due on the injected clock
    pub async fn tick(&mut self) {
        let now = self.clock.now_ms();

        if self.toast_timer.fire(now).is_some() {
            self.dispatch(Action::ClearToast);
        }

        if self.persist_timer.fire(now).is_some() {
            self.persist_settings().await;
        }

        let events = match &mut self.activity {
            Activity::Simulator { simulation, .. } => simulation.tick(now),
            _ => Vec::new(),
        };
        self.handle_runner_events(events).await;

        if let Some(handoff) = self.handoff_timer.fire(now) {
            self.run_handoff(handoff).await;
        }
    }

    // === Simulators ===

    /// Feed input to the mounted simulator
    ///
    /// Ignored until the module's lesson ids are resolved.
    pub async fn simulate(&mut self, action: SimAction) {
        let now = self.clock.now_ms();
        let events = match &mut self.activity {
            Activity::Simulator {
                lessons: Some(_),
                simulation,
            } => simulation.apply(action, now),
            Activity::Simulator { lessons: None, .. } => {
                tracing::debug!("Lesson ids not resolved yet, input ignored");
                return;
            }
            _ => {
                tracing::debug!(screen = %self.state.current_screen, "No simulator mounted");
                return;
            }
        };

        // A restarted game must not be pulled into the quiz
        if self.simulation().is_some_and(|s| !s.runner().is_finished()) {
            self.handoff_timer.cancel();
        }

        self.handle_runner_events(events).await;
    }

    async fn handle_runner_events(&mut self, events: Vec<RunnerEvent>) {
        for event in events {
            match event {
                RunnerEvent::Toast { message, kind } => self.show_toast(message, kind),
                RunnerEvent::Finished { medal } => self.finish_module(medal).await,
            }
        }
    }

    async fn finish_module(&mut self, medal: Option<MedalAward>) {
        let (module, lessons) = match &self.activity {
            Activity::Simulator {
                lessons: Some(lessons),
                simulation,
            } => (simulation.runner().module(), *lessons),
            _ => return,
        };
        tracing::info!(module = %module, "Simulator finished");

        self.complete_module(lessons.simulator).await;
        if let Some(medal) = medal {
            self.add_medal(&medal.name, medal.points).await;
        }

        let handoff = match lessons.quiz {
            Some(lesson_id) => Handoff::Quiz { lesson_id, module },
            None => Handoff::QuizMissing(module),
        };
        let now = self.clock.now_ms();
        self.handoff_timer.schedule(now, quiz_handoff_ms(module), handoff);
    }

    async fn run_handoff(&mut self, handoff: Handoff) {
        match handoff {
            Handoff::Quiz { lesson_id, module } => {
                self.open(Screen::Quiz, NavParams::quiz(lesson_id, module)).await;
            }
            Handoff::QuizMissing(module) => {
                tracing::warn!(module = %module, "Module has no quiz lesson");
                self.show_toast(QUIZ_NOT_FOUND, ToastKind::Error);
                self.open(Screen::ModuleMenu(module), NavParams::new()).await;
            }
        }
    }

    // === Quiz ===

    /// Whether the quiz entry of the current module screen is enabled
    pub fn quiz_unlocked(&self) -> bool {
        match (self.lessons(), &self.state.progress) {
            (Some(lessons), Some(progress)) => {
                lessons.quiz.is_some() && progress.is_completed(lessons.simulator)
            }
            _ => false,
        }
    }

    /// Open the quiz from a module menu or video screen
    pub async fn open_quiz(&mut self) -> bool {
        let (module, quiz) = match &self.activity {
            Activity::Lessons {
                module,
                lessons: Some(ResolvedLessons {
                    quiz: Some(quiz), ..
                }),
            } => (*module, *quiz),
            _ => return false,
        };
        if !self.quiz_unlocked() {
            tracing::debug!(module = %module, "Quiz still locked");
            return false;
        }

        self.open(Screen::Quiz, NavParams::quiz(quiz, module)).await;
        true
    }

    /// Submit an answer; ignored once the question is answered
    pub async fn answer_quiz(&mut self, option_id: OptionId) -> bool {
        let Some(submission) = self.quiz().and_then(|q| q.submission(option_id)) else {
            tracing::debug!(option_id, "Answer ignored");
            return false;
        };
        let Some(user_id) = self.require_user() else {
            return false;
        };

        match self.service.quiz().submit(user_id, submission).await {
            Ok(result) => {
                let correct = result.correct;
                if let Activity::Quiz(Some(session)) = &mut self.activity {
                    session.record(option_id, result);
                }
                if correct {
                    self.show_toast("Resposta correta! 🎉", ToastKind::Success);
                } else {
                    self.show_toast("Resposta incorreta!", ToastKind::Error);
                }
                true
            }
            Err(e) => {
                tracing::warn!(option_id, error = %e, "Failed to submit answer");
                self.show_toast("Não foi possível enviar sua resposta.", ToastKind::Error);
                false
            }
        }
    }

    pub fn retry_quiz(&mut self) {
        if let Activity::Quiz(Some(session)) = &mut self.activity {
            session.retry();
        }
    }

    /// Back to the module menu the quiz belongs to
    pub async fn leave_quiz(&mut self) {
        let module = self
            .quiz()
            .and_then(QuizSession::module)
            .or_else(|| self.state.nav_params.module());
        let target = module.map(Screen::ModuleMenu).unwrap_or(Screen::Menu);
        self.open(target, NavParams::new()).await;
    }
}
