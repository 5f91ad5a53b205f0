//! Read-only projections for rendering
//!
//! Nothing here mutates state. [`Navigator::view`] dispatches on the current
//! screen and builds the matching projection; the CLI prints these directly
//! and a graphical front end would draw them.

use serde::Serialize;

use libconnectidade::{LessonId, ModuleId, Progress, TOTAL_MODULES};

use crate::app::AccessibilitySettings;
use crate::app::Screen;
use crate::navigator::Navigator;
use crate::quiz::{OptionMark, QuizSession};
use crate::runner::{ModuleRunner, Simulation};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedalEntry {
    pub name: String,
    /// `dd/mm/yyyy`, when the server sent a timestamp
    pub granted_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub completed_modules: usize,
    pub total_modules: usize,
    pub percentage: u8,
    pub total_score: i64,
    pub medals: Vec<MedalEntry>,
}

impl ProgressSummary {
    /// Completed modules are counted by earned medals, capped at the
    /// catalog size
    pub fn from_progress(progress: &Progress) -> Self {
        let completed_modules = progress.medals.len().min(TOTAL_MODULES);
        let percentage = (completed_modules * 100 / TOTAL_MODULES) as u8;

        Self {
            completed_modules,
            total_modules: TOTAL_MODULES,
            percentage,
            total_score: progress.total_score,
            medals: progress
                .medals
                .iter()
                .map(|m| MedalEntry {
                    name: m.medal.name.clone(),
                    granted_on: m.granted_at.map(|at| at.format("%d/%m/%Y").to_string()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub module: ModuleId,
    pub title: &'static str,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleMenuView {
    pub module: ModuleId,
    pub title: &'static str,
    pub video_title: &'static str,
    /// `None` until the lesson ids are resolved
    pub simulator_lesson: Option<LessonId>,
    pub quiz_lesson: Option<LessonId>,
    pub completed: bool,
    pub quiz_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoView {
    pub module: ModuleId,
    pub title: &'static str,
    pub duration: &'static str,
    pub description: &'static str,
    pub quiz_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatorView {
    pub module: ModuleId,
    pub step: u8,
    pub total_steps: u8,
    pub hint: &'static str,
    pub busy: bool,
    pub finished: bool,
}

impl SimulatorView {
    pub fn from_simulation(simulation: &Simulation) -> Self {
        let runner = simulation.runner();
        Self {
            module: runner.module(),
            step: runner.step(),
            total_steps: runner.steps().total(),
            hint: runner.hint(),
            busy: runner.is_busy(),
            finished: runner.is_finished(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOptionView {
    pub id: i64,
    pub text: String,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizView {
    pub lesson_id: LessonId,
    pub prompt: String,
    pub options: Vec<QuizOptionView>,
    pub explanation: Option<String>,
}

impl QuizView {
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let question = session.question()?;
        Some(Self {
            lesson_id: session.lesson_id(),
            prompt: question.prompt.clone(),
            options: question
                .options
                .iter()
                .map(|o| QuizOptionView {
                    id: o.id,
                    text: o.text.clone(),
                    mark: session.mark(o.id),
                })
                .collect(),
            explanation: session.result().map(|r| r.explanation.clone()),
        })
    }
}

/// What to draw for the current screen
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum ScreenView {
    Splash,
    Menu {
        modules: Vec<MenuEntry>,
    },
    Settings {
        settings: AccessibilitySettings,
    },
    /// `summary` is `None` while logged out or before the first snapshot
    Progress {
        summary: Option<ProgressSummary>,
    },
    ModuleMenu(ModuleMenuView),
    Video(VideoView),
    Simulator(SimulatorView),
    /// `quiz` is `None` while loading
    Quiz {
        quiz: Option<QuizView>,
    },
}

impl Navigator {
    pub fn view(&self) -> ScreenView {
        let state = self.state();
        match state.current_screen {
            Screen::Splash => ScreenView::Splash,
            Screen::Menu => ScreenView::Menu {
                modules: self.menu_entries(),
            },
            Screen::Settings => ScreenView::Settings {
                settings: state.settings,
            },
            Screen::Progress => ScreenView::Progress {
                summary: self.progress_summary(),
            },
            Screen::ModuleMenu(module) => ScreenView::ModuleMenu(self.module_menu(module)),
            Screen::Video(module) => {
                let info = module.video();
                ScreenView::Video(VideoView {
                    module,
                    title: info.title,
                    duration: info.duration,
                    description: info.description,
                    quiz_enabled: self.quiz_unlocked(),
                })
            }
            Screen::Simulator(module) => match self.simulation() {
                Some(simulation) => ScreenView::Simulator(SimulatorView::from_simulation(simulation)),
                None => ScreenView::Simulator(SimulatorView::from_simulation(&Simulation::new(module))),
            },
            Screen::Quiz => ScreenView::Quiz {
                quiz: self.quiz().and_then(QuizView::from_session),
            },
        }
    }

    pub fn progress_summary(&self) -> Option<ProgressSummary> {
        let state = self.state();
        state.user.as_ref()?;
        state.progress.as_ref().map(ProgressSummary::from_progress)
    }

    /// Whether `module` counts as done on the main menu
    ///
    /// Uses the simulator lesson when its id is known, otherwise the
    /// module's medal.
    pub fn module_completed(&self, module: ModuleId) -> bool {
        let Some(progress) = self.state().progress.as_ref() else {
            return false;
        };
        match self.known_lessons(module) {
            Some(lessons) => progress.is_completed(lessons.simulator),
            None => progress.has_medal(module.medal_name()),
        }
    }

    fn menu_entries(&self) -> Vec<MenuEntry> {
        ModuleId::ALL
            .iter()
            .map(|&module| MenuEntry {
                module,
                title: module.backend_title(),
                completed: self.module_completed(module),
            })
            .collect()
    }

    fn module_menu(&self, module: ModuleId) -> ModuleMenuView {
        let lessons = self.lessons();
        ModuleMenuView {
            module,
            title: module.backend_title(),
            video_title: module.video().title,
            simulator_lesson: lessons.map(|l| l.simulator),
            quiz_lesson: lessons.and_then(|l| l.quiz),
            completed: self.module_completed(module),
            quiz_enabled: self.quiz_unlocked(),
        }
    }
}
