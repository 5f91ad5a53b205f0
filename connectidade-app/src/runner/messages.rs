//! Messaging app simulator
//!
//! Four steps: send a text, an audio, a photo and a file. Each send gets an
//! automatic contact reply after [`REPLY_MS`]; the step advances when the
//! reply lands. Input is ignored while a reply is pending.

use libconnectidade::{ModuleId, Timer};

use super::{MedalAward, ModuleRunner, RunnerEvent, StepSequence};

pub const REPLY_MS: u64 = 1000;
const MEDAL_POINTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageAction {
    /// Replace the text box contents
    Input(String),
    SendText,
    SendAudio,
    SendPhoto,
    SendFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Me,
    Contact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub time: &'static str,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>, time: &'static str) -> Self {
        Self {
            sender,
            text: text.into(),
            time,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MessagesRunner {
    steps: StepSequence,
    input: String,
    transcript: Vec<ChatMessage>,
    reply: Timer<&'static str>,
}

impl MessagesRunner {
    pub fn new() -> Self {
        Self {
            steps: StepSequence::new(4),
            input: String::new(),
            transcript: vec![
                ChatMessage::new(Sender::Contact, "Olá! Como você está?", "10:30"),
                ChatMessage::new(Sender::Contact, "Vamos praticar usar o WhatsApp!", "10:31"),
            ],
            reply: Timer::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn apply(&mut self, action: MessageAction, now_ms: u64) -> Vec<RunnerEvent> {
        let (step, sent, reply) = match action {
            MessageAction::Input(text) => {
                self.input = text;
                return Vec::new();
            }
            _ if self.reply.is_pending() => return Vec::new(),
            MessageAction::SendText => {
                if self.input.is_empty() || !self.steps.is_at(1) {
                    return Vec::new();
                }
                (
                    1,
                    std::mem::take(&mut self.input),
                    "Ótimo! Você enviou uma mensagem de texto! 👍",
                )
            }
            MessageAction::SendAudio => (
                2,
                "🎤 Áudio enviado (0:05)".to_string(),
                "Perfeito! Você enviou um áudio! 🎵",
            ),
            MessageAction::SendPhoto => (
                3,
                "📷 Foto enviada".to_string(),
                "Muito bem! Você enviou uma foto! 📸",
            ),
            MessageAction::SendFile => (
                4,
                "📎 Arquivo anexado".to_string(),
                "Excelente! Você completou todas as etapas! 🎉",
            ),
        };

        if !self.steps.is_at(step) {
            return Vec::new();
        }
        self.transcript.push(ChatMessage::new(Sender::Me, sent, "10:32"));
        self.reply.schedule(now_ms, REPLY_MS, reply);
        Vec::new()
    }

    pub fn tick(&mut self, now_ms: u64) -> Vec<RunnerEvent> {
        let Some(reply) = self.reply.fire(now_ms) else {
            return Vec::new();
        };
        self.transcript.push(ChatMessage::new(Sender::Contact, reply, "10:32"));

        if self.steps.is_last() {
            self.steps.finish();
            vec![RunnerEvent::Finished {
                medal: Some(MedalAward::for_module(ModuleId::Messages, MEDAL_POINTS)),
            }]
        } else {
            let current = self.steps.current();
            self.steps.advance_from(current);
            Vec::new()
        }
    }
}

impl Default for MessagesRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRunner for MessagesRunner {
    fn module(&self) -> ModuleId {
        ModuleId::Messages
    }

    fn steps(&self) -> &StepSequence {
        &self.steps
    }

    fn hint(&self) -> &'static str {
        if self.steps.is_finished() {
            return "Parabéns! Você praticou todas as formas de enviar mensagens.";
        }
        match self.steps.current() {
            1 => "Escreva uma mensagem na caixa de texto e toque em enviar.",
            2 => "Segure o botão do microfone para gravar e enviar um áudio.",
            3 => "Toque no ícone da câmera para enviar uma foto.",
            _ => "Toque no clipe de papel para anexar um arquivo.",
        }
    }

    fn is_busy(&self) -> bool {
        self.reply.is_pending()
    }
}
