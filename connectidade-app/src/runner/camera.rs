//! Camera simulator
//!
//! Seven steps: take a photo, flip the camera, switch to video mode, set
//! the flash, enable the grid, set the self-timer and record a video. The
//! recording lasts [`RECORDING_MS`] and finishes the module.

use std::fmt;

use libconnectidade::{ModuleId, Timer};

use super::{MedalAward, ModuleRunner, RunnerEvent, StepSequence};
use crate::app::ToastKind;

pub const RECORDING_MS: u64 = 3000;
const MEDAL_POINTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    Capture,
    Flip,
    ToggleMode,
    CycleFlash,
    ToggleGrid,
    CycleTimer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Photo,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashMode {
    Off,
    On,
    Auto,
}

impl FlashMode {
    fn next(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::On,
            FlashMode::On => FlashMode::Auto,
            FlashMode::Auto => FlashMode::Off,
        }
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlashMode::Off => "off",
            FlashMode::On => "on",
            FlashMode::Auto => "auto",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTimer {
    Off,
    ThreeSeconds,
    TenSeconds,
}

impl SelfTimer {
    fn next(self) -> Self {
        match self {
            SelfTimer::Off => SelfTimer::ThreeSeconds,
            SelfTimer::ThreeSeconds => SelfTimer::TenSeconds,
            SelfTimer::TenSeconds => SelfTimer::Off,
        }
    }
}

impl fmt::Display for SelfTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelfTimer::Off => "off",
            SelfTimer::ThreeSeconds => "3s",
            SelfTimer::TenSeconds => "10s",
        })
    }
}

#[derive(Debug, Clone)]
pub struct CameraRunner {
    steps: StepSequence,
    photos: u32,
    videos: u32,
    front_camera: bool,
    mode: CaptureMode,
    flash: FlashMode,
    grid: bool,
    self_timer: SelfTimer,
    recording: Timer<()>,
}

impl CameraRunner {
    pub fn new() -> Self {
        Self {
            steps: StepSequence::new(7),
            photos: 0,
            videos: 0,
            front_camera: false,
            mode: CaptureMode::Photo,
            flash: FlashMode::Off,
            grid: false,
            self_timer: SelfTimer::Off,
            recording: Timer::new(),
        }
    }

    pub fn photos(&self) -> u32 {
        self.photos
    }

    pub fn videos(&self) -> u32 {
        self.videos
    }

    pub fn is_front_camera(&self) -> bool {
        self.front_camera
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    pub fn self_timer(&self) -> SelfTimer {
        self.self_timer
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_pending()
    }

    pub fn apply(&mut self, action: CameraAction, now_ms: u64) -> Vec<RunnerEvent> {
        if self.is_recording() {
            return Vec::new();
        }

        match action {
            CameraAction::Capture if self.steps.is_at(1) && self.mode == CaptureMode::Photo => {
                self.photos += 1;
                self.advance(1, "Foto tirada! 📸")
            }
            CameraAction::Capture if self.steps.is_at(7) && self.mode == CaptureMode::Video => {
                self.recording.schedule(now_ms, RECORDING_MS, ());
                vec![RunnerEvent::toast("Gravando vídeo...", ToastKind::Info)]
            }
            CameraAction::Flip if self.steps.is_at(2) => {
                self.front_camera = !self.front_camera;
                self.advance(2, "Câmera alternada!")
            }
            CameraAction::ToggleMode if self.steps.is_at(3) && self.mode == CaptureMode::Photo => {
                self.mode = CaptureMode::Video;
                self.advance(3, "Modo vídeo ativado!")
            }
            CameraAction::CycleFlash if self.steps.is_at(4) => {
                self.flash = self.flash.next();
                if self.flash == FlashMode::Off {
                    return Vec::new();
                }
                let message = format!("Flash: {}", self.flash);
                self.advance(4, message)
            }
            CameraAction::ToggleGrid if self.steps.is_at(5) => {
                self.grid = !self.grid;
                self.advance(5, "Grade ativada!")
            }
            CameraAction::CycleTimer if self.steps.is_at(6) => {
                self.self_timer = self.self_timer.next();
                if self.self_timer == SelfTimer::Off {
                    return Vec::new();
                }
                let message = format!("Timer: {}", self.self_timer);
                self.advance(6, message)
            }
            _ => Vec::new(),
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> Vec<RunnerEvent> {
        if self.recording.fire(now_ms).is_none() {
            return Vec::new();
        }
        self.videos += 1;
        self.steps.finish();
        vec![
            RunnerEvent::toast("Vídeo gravado! 🎥", ToastKind::Success),
            RunnerEvent::Finished {
                medal: Some(MedalAward::for_module(ModuleId::Camera, MEDAL_POINTS)),
            },
        ]
    }

    fn advance(&mut self, step: u8, message: impl Into<String>) -> Vec<RunnerEvent> {
        self.steps.advance_from(step);
        vec![RunnerEvent::toast(message, ToastKind::Success)]
    }
}

impl Default for CameraRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRunner for CameraRunner {
    fn module(&self) -> ModuleId {
        ModuleId::Camera
    }

    fn steps(&self) -> &StepSequence {
        &self.steps
    }

    fn hint(&self) -> &'static str {
        if self.steps.is_finished() {
            return "Você domina a câmera! Fotos e vídeos sem segredo.";
        }
        match self.steps.current() {
            1 => "Toque no botão redondo grande para tirar uma foto.",
            2 => "Toque no ícone de setas para alternar para a câmera frontal.",
            3 => "Toque em VÍDEO para mudar para o modo de gravação.",
            4 => "Toque no raio para ligar o flash.",
            5 => "Toque no ícone de grade para ajudar a alinhar a foto.",
            6 => "Toque no relógio para ativar o temporizador.",
            _ if self.is_recording() => "Gravando... aguarde o vídeo terminar.",
            _ => "Toque no botão vermelho para gravar um vídeo.",
        }
    }

    fn is_busy(&self) -> bool {
        self.is_recording()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toast(message: &str) -> RunnerEvent {
        RunnerEvent::toast(message, ToastKind::Success)
    }

    #[test]
    fn test_first_capture() {
        let mut runner = CameraRunner::new();
        let events = runner.apply(CameraAction::Capture, 0);
        assert_eq!(events, vec![toast("Foto tirada! 📸")]);
        assert_eq!(runner.photos(), 1);
        assert_eq!(runner.step(), 2);
    }

    #[test]
    fn test_out_of_step_controls_do_nothing() {
        let mut runner = CameraRunner::new();
        assert!(runner.apply(CameraAction::Flip, 0).is_empty());
        assert!(runner.apply(CameraAction::ToggleGrid, 0).is_empty());
        assert!(!runner.is_front_camera());
        assert!(!runner.grid());
        assert_eq!(runner.step(), 1);
    }

    #[test]
    fn test_flash_cycle_advances_on_first_non_off_value() {
        let mut runner = CameraRunner::new();
        for action in [CameraAction::Capture, CameraAction::Flip, CameraAction::ToggleMode] {
            runner.apply(action, 0);
        }
        assert_eq!(runner.mode(), CaptureMode::Video);
        assert_eq!(runner.step(), 4);

        let events = runner.apply(CameraAction::CycleFlash, 0);
        assert_eq!(events, vec![toast("Flash: on")]);
        assert_eq!(runner.flash(), FlashMode::On);
        assert_eq!(runner.step(), 5);
    }

    #[test]
    fn test_timer_cycle() {
        let mut runner = CameraRunner::new();
        for action in [
            CameraAction::Capture,
            CameraAction::Flip,
            CameraAction::ToggleMode,
            CameraAction::CycleFlash,
            CameraAction::ToggleGrid,
        ] {
            runner.apply(action, 0);
        }
        let events = runner.apply(CameraAction::CycleTimer, 0);
        assert_eq!(events, vec![toast("Timer: 3s")]);
        assert_eq!(runner.self_timer(), SelfTimer::ThreeSeconds);
        assert_eq!(runner.step(), 7);
    }

    #[test]
    fn test_recording_finishes_module() {
        let mut runner = CameraRunner::new();
        for action in [
            CameraAction::Capture,
            CameraAction::Flip,
            CameraAction::ToggleMode,
            CameraAction::CycleFlash,
            CameraAction::ToggleGrid,
            CameraAction::CycleTimer,
        ] {
            runner.apply(action, 0);
        }

        let events = runner.apply(CameraAction::Capture, 100);
        assert_eq!(events, vec![RunnerEvent::toast("Gravando vídeo...", ToastKind::Info)]);
        assert!(runner.is_recording());
        assert!(runner.apply(CameraAction::Capture, 200).is_empty());

        assert!(runner.tick(100 + RECORDING_MS - 1).is_empty());
        let events = runner.tick(100 + RECORDING_MS);
        assert_eq!(runner.videos(), 1);
        assert!(runner.is_finished());
        assert_eq!(
            events.last(),
            Some(&RunnerEvent::Finished {
                medal: Some(MedalAward::for_module(ModuleId::Camera, 10))
            })
        );
    }
}
