//! Scam-spotting game
//!
//! Five messages, one per step. The user judges each as suspicious or
//! safe, sees the explanation, then moves on. Three or more correct
//! answers earn the medal, worth 10 points plus the score.

use libconnectidade::ModuleId;

use super::{MedalAward, ModuleRunner, RunnerEvent, StepSequence};
use crate::app::ToastKind;

const MEDAL_BASE_POINTS: u32 = 10;
const MEDAL_MIN_SCORE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub message: &'static str,
    pub suspicious: bool,
    pub explanation: &'static str,
}

pub const SCENARIOS: [Scenario; 5] = [
    Scenario {
        message: "🎉 PARABÉNS! Você ganhou R$ 10.000 em um sorteio! Para receber, envie seus dados bancários e CPF para este número.",
        suspicious: true,
        explanation: "Golpe do Prêmio Falso: Nunca envie dados bancários ou pessoais por mensagens. Empresas legítimas não pedem essas informações assim.",
    },
    Scenario {
        message: "Oi mãe, meu celular caiu e quebrou. Estou usando o número de um amigo. Preciso de dinheiro urgente, pode fazer um PIX?",
        suspicious: true,
        explanation: "Golpe do Falso Parente: Sempre confirme a identidade ligando para o número conhecido. Golpistas se passam por familiares.",
    },
    Scenario {
        message: "Olá, aqui é da Clínica São José. Confirmamos sua consulta para amanhã às 14h com Dr. Paulo. Até lá!",
        suspicious: false,
        explanation: "Mensagem legítima: Confirmação de consulta médica de uma clínica conhecida, sem pedidos de dinheiro ou dados.",
    },
    Scenario {
        message: "URGENTE! Seu banco detectou atividade suspeita. Sua conta será bloqueada em 24h. Clique neste link para regularizar: bit.ly/banco123",
        suspicious: true,
        explanation: "Phishing Bancário: Bancos nunca pedem para clicar em links ou fornecer dados por mensagem. Sempre entre em contato direto.",
    },
    Scenario {
        message: "Bom dia! Este é um lembrete automático: você tem consulta na próxima terça-feira. Para reagendar, ligue (11) 3333-4444.",
        suspicious: false,
        explanation: "Mensagem legítima: Lembrete médico profissional com telefone para contato, sem pedidos suspeitos.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityAction {
    Judge { suspicious: bool },
    Next,
    /// Start over from the result screen
    Restart,
}

/// Result screen banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTier {
    Expert,
    Protected,
    KeepPracticing,
}

impl ResultTier {
    pub fn for_score(score: u8) -> Self {
        match score {
            s if s >= 4 => ResultTier::Expert,
            3 => ResultTier::Protected,
            _ => ResultTier::KeepPracticing,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            ResultTier::Expert => "🏆",
            ResultTier::Protected => "⭐",
            ResultTier::KeepPracticing => "💪",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ResultTier::Expert => "Excelente! Você é um expert em segurança!",
            ResultTier::Protected => "Muito bem! Você está protegido!",
            ResultTier::KeepPracticing => "Continue praticando para melhorar!",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityRunner {
    steps: StepSequence,
    score: u8,
    /// Whether the current scenario was judged correctly, once judged
    verdict: Option<bool>,
}

impl SecurityRunner {
    pub fn new() -> Self {
        Self {
            steps: StepSequence::new(SCENARIOS.len() as u8),
            score: 0,
            verdict: None,
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn scenario(&self) -> &'static Scenario {
        &SCENARIOS[usize::from(self.steps.current() - 1)]
    }

    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }

    /// Available once the last scenario is done
    pub fn result(&self) -> Option<ResultTier> {
        self.steps
            .is_finished()
            .then(|| ResultTier::for_score(self.score))
    }

    pub fn apply(&mut self, action: SecurityAction) -> Vec<RunnerEvent> {
        match action {
            SecurityAction::Judge { suspicious } => {
                if self.steps.is_finished() || self.verdict.is_some() {
                    return Vec::new();
                }
                let correct = suspicious == self.scenario().suspicious;
                self.verdict = Some(correct);
                if correct {
                    self.score += 1;
                    vec![RunnerEvent::toast("Correto! +1 ponto", ToastKind::Success)]
                } else {
                    vec![RunnerEvent::toast("Incorreto!", ToastKind::Error)]
                }
            }
            SecurityAction::Next => {
                if self.steps.is_finished() || self.verdict.is_none() {
                    return Vec::new();
                }
                if self.steps.is_last() {
                    self.steps.finish();
                    let medal = (self.score >= MEDAL_MIN_SCORE).then(|| {
                        MedalAward::for_module(
                            ModuleId::Security,
                            MEDAL_BASE_POINTS + u32::from(self.score),
                        )
                    });
                    vec![RunnerEvent::Finished { medal }]
                } else {
                    let current = self.steps.current();
                    self.steps.advance_from(current);
                    self.verdict = None;
                    Vec::new()
                }
            }
            SecurityAction::Restart => {
                if self.steps.is_finished() {
                    *self = Self::new();
                }
                Vec::new()
            }
        }
    }
}

impl Default for SecurityRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRunner for SecurityRunner {
    fn module(&self) -> ModuleId {
        ModuleId::Security
    }

    fn steps(&self) -> &StepSequence {
        &self.steps
    }

    fn hint(&self) -> &'static str {
        if let Some(tier) = self.result() {
            return tier.message();
        }
        match self.verdict {
            None => "Esta mensagem é suspeita ou segura?",
            Some(_) => self.scenario().explanation,
        }
    }

    fn is_busy(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(runner: &mut SecurityRunner, correct: usize) -> Vec<RunnerEvent> {
        let mut events = Vec::new();
        for (i, scenario) in SCENARIOS.iter().enumerate() {
            let suspicious = if i < correct {
                scenario.suspicious
            } else {
                !scenario.suspicious
            };
            events.extend(runner.apply(SecurityAction::Judge { suspicious }));
            events.extend(runner.apply(SecurityAction::Next));
        }
        events
    }

    fn finished(events: &[RunnerEvent]) -> Option<&RunnerEvent> {
        events.iter().find(|e| matches!(e, RunnerEvent::Finished { .. }))
    }

    #[test]
    fn test_perfect_score_earns_fifteen_points() {
        let mut runner = SecurityRunner::new();
        let events = play(&mut runner, 5);

        assert_eq!(runner.score(), 5);
        assert_eq!(runner.result(), Some(ResultTier::Expert));
        assert_eq!(
            finished(&events),
            Some(&RunnerEvent::Finished {
                medal: Some(MedalAward {
                    name: "Guardião Digital".to_string(),
                    points: 15
                })
            })
        );
    }

    #[test]
    fn test_low_score_completes_without_medal() {
        let mut runner = SecurityRunner::new();
        let events = play(&mut runner, 2);

        assert_eq!(runner.score(), 2);
        assert_eq!(runner.result(), Some(ResultTier::KeepPracticing));
        assert_eq!(finished(&events), Some(&RunnerEvent::Finished { medal: None }));
    }

    #[test]
    fn test_three_is_protected() {
        assert_eq!(ResultTier::for_score(3), ResultTier::Protected);
        assert_eq!(ResultTier::for_score(4), ResultTier::Expert);
        assert_eq!(ResultTier::for_score(0), ResultTier::KeepPracticing);
    }

    #[test]
    fn test_judging_twice_counts_once() {
        let mut runner = SecurityRunner::new();
        runner.apply(SecurityAction::Judge { suspicious: true });
        let events = runner.apply(SecurityAction::Judge { suspicious: true });
        assert!(events.is_empty());
        assert_eq!(runner.score(), 1);
    }

    #[test]
    fn test_next_requires_verdict() {
        let mut runner = SecurityRunner::new();
        runner.apply(SecurityAction::Next);
        assert_eq!(runner.step(), 1);
    }

    #[test]
    fn test_wrong_answer_toast() {
        let mut runner = SecurityRunner::new();
        let events = runner.apply(SecurityAction::Judge { suspicious: false });
        assert_eq!(events, vec![RunnerEvent::toast("Incorreto!", ToastKind::Error)]);
        assert_eq!(runner.verdict(), Some(false));
        assert_eq!(runner.hint(), SCENARIOS[0].explanation);
    }

    #[test]
    fn test_restart_only_after_finish() {
        let mut runner = SecurityRunner::new();
        runner.apply(SecurityAction::Judge { suspicious: true });
        runner.apply(SecurityAction::Restart);
        assert_eq!(runner.score(), 1);

        let mut runner = SecurityRunner::new();
        play(&mut runner, 4);
        runner.apply(SecurityAction::Restart);
        assert_eq!(runner.score(), 0);
        assert_eq!(runner.step(), 1);
        assert!(!runner.is_finished());
    }
}
