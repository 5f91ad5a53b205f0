//! Phone call simulator
//!
//! Step 1: type a number and dial. Step 2: hang up once connected.

use libconnectidade::{ModuleId, Timer};

use super::{MedalAward, ModuleRunner, RunnerEvent, StepSequence};
use crate::app::ToastKind;

pub const RINGING_MS: u64 = 3000;
const MEDAL_POINTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallAction {
    EnterNumber(String),
    Dial,
    HangUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Idle,
    Ringing,
    Connected,
    Ended,
}

#[derive(Debug, Clone)]
pub struct CallsRunner {
    steps: StepSequence,
    number: String,
    phase: CallPhase,
    ringing: Timer<()>,
}

impl CallsRunner {
    pub fn new() -> Self {
        Self {
            steps: StepSequence::new(2),
            number: String::new(),
            phase: CallPhase::Idle,
            ringing: Timer::new(),
        }
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn phase(&self) -> CallPhase {
        self.phase
    }

    pub fn apply(&mut self, action: CallAction, now_ms: u64) -> Vec<RunnerEvent> {
        match action {
            CallAction::EnterNumber(number) => {
                if self.phase == CallPhase::Idle {
                    self.number = number;
                }
                Vec::new()
            }
            CallAction::Dial => {
                if !self.steps.is_at(1) || self.phase != CallPhase::Idle {
                    return Vec::new();
                }
                if self.number.trim().is_empty() {
                    return vec![RunnerEvent::toast(
                        "Digite um número de telefone",
                        ToastKind::Error,
                    )];
                }
                self.phase = CallPhase::Ringing;
                self.ringing.schedule(now_ms, RINGING_MS, ());
                Vec::new()
            }
            CallAction::HangUp => {
                if !self.steps.is_at(2) || self.phase != CallPhase::Connected {
                    return Vec::new();
                }
                self.phase = CallPhase::Ended;
                self.steps.finish();
                vec![RunnerEvent::Finished {
                    medal: Some(MedalAward::for_module(ModuleId::Calls, MEDAL_POINTS)),
                }]
            }
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> Vec<RunnerEvent> {
        if self.ringing.fire(now_ms).is_none() {
            return Vec::new();
        }
        self.phase = CallPhase::Connected;
        self.steps.advance_from(1);
        vec![RunnerEvent::toast("Chamada iniciada!", ToastKind::Success)]
    }
}

impl Default for CallsRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRunner for CallsRunner {
    fn module(&self) -> ModuleId {
        ModuleId::Calls
    }

    fn steps(&self) -> &StepSequence {
        &self.steps
    }

    fn hint(&self) -> &'static str {
        match (self.steps.current(), self.phase) {
            (1, CallPhase::Ringing) => "Chamando... aguarde a pessoa atender.",
            (1, _) => "Digite um número no teclado e toque no botão verde para ligar.",
            (_, CallPhase::Ended) => "Chamada encerrada. Muito bem!",
            _ => "A chamada está em andamento. Toque no botão vermelho para desligar.",
        }
    }

    fn is_busy(&self) -> bool {
        self.ringing.is_pending()
    }
}
