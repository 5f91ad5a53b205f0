//! Guided module simulators
//!
//! Each runner is a small state machine over numbered steps. User input is
//! accepted only when it matches the step it belongs to; anything else is a
//! silent no-op. Time-based transitions (ringing, replies, recording) are
//! driven by `tick` with the caller's clock, so runners never sleep.
//!
//! Runners know nothing about the backend. They report what happened as
//! [`RunnerEvent`]s and the navigator turns those into toasts, progress
//! writes and the hand-off to the quiz.

pub mod calls;
pub mod camera;
pub mod messages;
pub mod security;

use libconnectidade::ModuleId;

use crate::app::ToastKind;

pub use calls::{CallAction, CallPhase, CallsRunner};
pub use camera::{CameraAction, CameraRunner, CaptureMode, FlashMode, SelfTimer};
pub use messages::{ChatMessage, MessageAction, MessagesRunner, Sender};
pub use security::{ResultTier, Scenario, SecurityAction, SecurityRunner};

/// Medal earned by finishing a simulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedalAward {
    pub name: String,
    pub points: u32,
}

impl MedalAward {
    pub fn for_module(module: ModuleId, points: u32) -> Self {
        Self {
            name: module.medal_name().to_string(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerEvent {
    Toast { message: String, kind: ToastKind },
    /// The terminal step completed
    Finished { medal: Option<MedalAward> },
}

impl RunnerEvent {
    pub(crate) fn toast(message: impl Into<String>, kind: ToastKind) -> Self {
        RunnerEvent::Toast {
            message: message.into(),
            kind,
        }
    }
}

/// Step counter shared by all runners
///
/// Starts at 1 and only moves forward by one. Once finished it stays on the
/// last step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequence {
    current: u8,
    total: u8,
    finished: bool,
}

impl StepSequence {
    pub fn new(total: u8) -> Self {
        Self {
            current: 1,
            total,
            finished: false,
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn total(&self) -> u8 {
        self.total
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True when `step` is the active, unfinished step
    pub fn is_at(&self, step: u8) -> bool {
        !self.finished && self.current == step
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total
    }

    /// Move from `step` to the next one; false if `step` is not active
    pub fn advance_from(&mut self, step: u8) -> bool {
        if !self.is_at(step) || self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Complete the last step
    pub fn finish(&mut self) -> bool {
        if self.finished || !self.is_last() {
            return false;
        }
        self.finished = true;
        true
    }
}

/// Read-only surface every runner exposes to views
pub trait ModuleRunner {
    fn module(&self) -> ModuleId;

    fn steps(&self) -> &StepSequence;

    /// Instruction for the active step
    fn hint(&self) -> &'static str;

    /// A timed transition is pending
    fn is_busy(&self) -> bool;

    fn step(&self) -> u8 {
        self.steps().current()
    }

    fn is_finished(&self) -> bool {
        self.steps().is_finished()
    }
}

/// User input for whichever simulator is mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimAction {
    Calls(CallAction),
    Messages(MessageAction),
    Camera(CameraAction),
    Security(SecurityAction),
}

/// The mounted simulator
#[derive(Debug, Clone)]
pub enum Simulation {
    Calls(CallsRunner),
    Messages(MessagesRunner),
    Camera(CameraRunner),
    Security(SecurityRunner),
}

impl Simulation {
    pub fn new(module: ModuleId) -> Self {
        match module {
            ModuleId::Calls => Simulation::Calls(CallsRunner::new()),
            ModuleId::Messages => Simulation::Messages(MessagesRunner::new()),
            ModuleId::Camera => Simulation::Camera(CameraRunner::new()),
            ModuleId::Security => Simulation::Security(SecurityRunner::new()),
        }
    }

    pub fn runner(&self) -> &dyn ModuleRunner {
        match self {
            Simulation::Calls(r) => r,
            Simulation::Messages(r) => r,
            Simulation::Camera(r) => r,
            Simulation::Security(r) => r,
        }
    }

    /// Apply input; actions meant for another simulator are ignored
    pub fn apply(&mut self, action: SimAction, now_ms: u64) -> Vec<RunnerEvent> {
        match (self, action) {
            (Simulation::Calls(r), SimAction::Calls(a)) => r.apply(a, now_ms),
            (Simulation::Messages(r), SimAction::Messages(a)) => r.apply(a, now_ms),
            (Simulation::Camera(r), SimAction::Camera(a)) => r.apply(a, now_ms),
            (Simulation::Security(r), SimAction::Security(a)) => r.apply(a),
            (sim, action) => {
                tracing::debug!(module = %sim.runner().module(), ?action, "Action for another simulator ignored");
                Vec::new()
            }
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> Vec<RunnerEvent> {
        match self {
            Simulation::Calls(r) => r.tick(now_ms),
            Simulation::Messages(r) => r.tick(now_ms),
            Simulation::Camera(r) => r.tick(now_ms),
            Simulation::Security(_) => Vec::new(),
        }
    }

    /// Input sequence that completes the module from a fresh start
    pub fn walkthrough(module: ModuleId) -> Vec<SimAction> {
        match module {
            ModuleId::Calls => vec![
                SimAction::Calls(CallAction::EnterNumber("(11) 98765-4321".to_string())),
                SimAction::Calls(CallAction::Dial),
                SimAction::Calls(CallAction::HangUp),
            ],
            ModuleId::Messages => vec![
                SimAction::Messages(MessageAction::Input("Olá! Tudo bem?".to_string())),
                SimAction::Messages(MessageAction::SendText),
                SimAction::Messages(MessageAction::SendAudio),
                SimAction::Messages(MessageAction::SendPhoto),
                SimAction::Messages(MessageAction::SendFile),
            ],
            ModuleId::Camera => vec![
                SimAction::Camera(CameraAction::Capture),
                SimAction::Camera(CameraAction::Flip),
                SimAction::Camera(CameraAction::ToggleMode),
                SimAction::Camera(CameraAction::CycleFlash),
                SimAction::Camera(CameraAction::ToggleGrid),
                SimAction::Camera(CameraAction::CycleTimer),
                SimAction::Camera(CameraAction::Capture),
            ],
            ModuleId::Security => security::SCENARIOS
                .iter()
                .flat_map(|s| {
                    [
                        SimAction::Security(SecurityAction::Judge {
                            suspicious: s.suspicious,
                        }),
                        SimAction::Security(SecurityAction::Next),
                    ]
                })
                .collect(),
        }
    }
}
