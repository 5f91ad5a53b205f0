//! Store behaviour: navigation, toasts, settings persistence and progress
//! mutations, driven with a manual clock.

use std::sync::Arc;

use connectidade_app::app::{NavParams, Screen, Setting, ToastKind};
use connectidade_app::{Navigator, ScreenView};
use libconnectidade::api::mock::{MockBackend, Operation};
use libconnectidade::config::UiConfig;
use libconnectidade::types::{LoginRequest, SettingsUpdate};
use libconnectidade::{Backend, LearningService, ManualClock, ModuleId};

struct Harness {
    backend: Arc<MockBackend>,
    clock: ManualClock,
    nav: Navigator,
}

impl Harness {
    fn new() -> Self {
        let backend = Arc::new(MockBackend::seeded());
        let clock = ManualClock::new();
        let service = LearningService::new(Arc::clone(&backend) as Arc<dyn Backend>);
        let nav = Navigator::new(service, Arc::new(clock.clone()), UiConfig::default());
        Self { backend, clock, nav }
    }

    async fn logged_in() -> Self {
        let mut h = Self::new();
        let ok = h
            .nav
            .login(&LoginRequest {
                google_id: "g-1".to_string(),
                email: "joao@example.com".to_string(),
                display_name: "João".to_string(),
            })
            .await;
        assert!(ok);
        h
    }

    async fn advance(&mut self, ms: u64) {
        self.clock.advance(ms);
        self.nav.tick().await;
    }

    fn toast(&self) -> Option<&str> {
        self.nav.state().toast.as_ref().map(|t| t.message.as_str())
    }
}

// === Navigation ===

#[test]
fn test_last_valid_navigation_wins() {
    let mut h = Harness::new();
    h.nav.navigate_named("settings", NavParams::new());
    h.nav.navigate_named("calls-menu", NavParams::new());
    h.nav.navigate_named("video-security", NavParams::new());

    assert_eq!(h.nav.state().current_screen, Screen::Video(ModuleId::Security));

    h.nav.navigate_named("video-tablet", NavParams::new());
    assert_eq!(h.nav.state().current_screen, Screen::Splash);
}

#[test]
fn test_params_replaced_on_navigation() {
    let mut h = Harness::new();
    h.nav.navigate_to(Screen::Quiz, NavParams::quiz(13, ModuleId::Calls));
    h.nav.navigate_to(Screen::Menu, NavParams::new());

    assert!(h.nav.state().nav_params.is_empty());
}

// === Toasts ===

#[tokio::test]
async fn test_newer_toast_replaces_older_and_restarts_expiry() {
    let mut h = Harness::new();
    h.nav.show_toast("A", ToastKind::Info);

    h.advance(500).await;
    h.nav.show_toast("B", ToastKind::Success);

    h.advance(2600).await;
    assert_eq!(h.toast(), Some("B"));

    h.advance(400).await;
    assert_eq!(h.toast(), None);

    h.advance(5000).await;
    assert_eq!(h.toast(), None);
}

#[tokio::test]
async fn test_custom_toast_duration() {
    let mut h = Harness::new();
    h.nav.show_toast_for("curto", ToastKind::Info, 200);

    h.advance(199).await;
    assert_eq!(h.toast(), Some("curto"));
    h.advance(1).await;
    assert_eq!(h.toast(), None);
}

// === Settings ===

#[tokio::test]
async fn test_double_toggle_persists_once_with_final_value() {
    let mut h = Harness::logged_in().await;

    h.nav.toggle_setting(Setting::HighContrast);
    h.advance(300).await;
    h.nav.toggle_setting(Setting::HighContrast);
    assert!(!h.nav.state().settings.high_contrast);

    h.advance(999).await;
    assert!(h.backend.settings_writes().is_empty());

    h.advance(1).await;
    assert_eq!(
        h.backend.settings_writes(),
        vec![SettingsUpdate {
            large_text: false,
            high_contrast: false
        }]
    );

    h.advance(5000).await;
    assert_eq!(h.backend.call_count(Operation::UpdateSettings), 1);
}

#[tokio::test]
async fn test_settings_sent_together() {
    let mut h = Harness::logged_in().await;

    h.nav.toggle_setting(Setting::LargeText);
    h.nav.toggle_setting(Setting::HighContrast);
    h.advance(1000).await;

    assert_eq!(
        h.backend.settings_writes(),
        vec![SettingsUpdate {
            large_text: true,
            high_contrast: true
        }]
    );
}

#[tokio::test]
async fn test_audio_setting_is_never_sent() {
    let mut h = Harness::logged_in().await;

    h.nav.toggle_setting(Setting::Audio);
    h.advance(2000).await;

    assert!(h.nav.state().settings.audio_enabled);
    assert_eq!(h.backend.call_count(Operation::UpdateSettings), 0);
}

#[tokio::test]
async fn test_toggle_before_login_is_local_only() {
    let mut h = Harness::new();

    h.nav.toggle_setting(Setting::LargeText);
    h.advance(2000).await;

    assert!(h.nav.state().settings.large_text);
    assert_eq!(h.backend.call_count(Operation::UpdateSettings), 0);
}

#[tokio::test]
async fn test_failed_persist_keeps_local_flag() {
    let mut h = Harness::logged_in().await;
    h.backend.fail(Operation::UpdateSettings);

    h.nav.toggle_setting(Setting::LargeText);
    h.advance(1000).await;

    assert!(h.nav.state().settings.large_text);
    assert_eq!(
        h.nav.state().toast.as_ref().map(|t| t.kind),
        Some(ToastKind::Error)
    );
}

// === Progress ===

#[tokio::test]
async fn test_complete_module_refreshes_snapshot() {
    let mut h = Harness::logged_in().await;
    let (sim, _, _) = MockBackend::lesson_ids(ModuleId::Calls);

    assert!(h.nav.complete_module(sim).await);

    let progress = h.nav.state().progress.as_ref().unwrap();
    assert!(progress.is_completed(sim));
    assert_eq!(progress.total_score, 10);
}

#[tokio::test]
async fn test_failed_completion_leaves_snapshot_unchanged() {
    let mut h = Harness::logged_in().await;
    let before = h.nav.state().progress.clone();
    h.backend.fail(Operation::CompleteLesson);

    let (sim, _, _) = MockBackend::lesson_ids(ModuleId::Camera);
    assert!(!h.nav.complete_module(sim).await);

    assert_eq!(h.nav.state().progress, before);
    assert_eq!(
        h.nav.state().toast.as_ref().map(|t| t.kind),
        Some(ToastKind::Error)
    );
    assert_eq!(h.backend.call_count(Operation::CompleteLesson), 1);
}

#[tokio::test]
async fn test_failed_refresh_after_completion_keeps_old_snapshot() {
    let mut h = Harness::logged_in().await;
    let before = h.nav.state().progress.clone();
    h.backend.fail(Operation::FetchProgress);

    let (sim, _, _) = MockBackend::lesson_ids(ModuleId::Messages);
    assert!(!h.nav.complete_module(sim).await);

    assert_eq!(h.nav.state().progress, before);
}

#[tokio::test]
async fn test_medal_toast() {
    let mut h = Harness::logged_in().await;

    assert!(h.nav.add_medal("Fotógrafo Expert", 10).await);

    assert_eq!(h.toast(), Some("🏆 Medalha conquistada: Fotógrafo Expert! +10 pontos"));
    let progress = h.nav.state().progress.as_ref().unwrap();
    assert!(progress.has_medal("Fotógrafo Expert"));
}

#[tokio::test]
async fn test_reset_returns_to_menu() {
    let mut h = Harness::logged_in().await;
    h.nav.add_medal("Guardião Digital", 15).await;
    h.nav.navigate_to(Screen::Settings, NavParams::new());

    assert!(h.nav.reset_progress().await);

    let state = h.nav.state();
    assert_eq!(state.current_screen, Screen::Menu);
    assert_eq!(state.progress.as_ref().map(|p| p.total_score), Some(0));
    assert_eq!(state.toast.as_ref().map(|t| t.kind), Some(ToastKind::Info));
}

#[tokio::test]
async fn test_progress_view() {
    let mut h = Harness::logged_in().await;
    h.nav.add_medal("Primeira Chamada", 10).await;
    h.nav.navigate_to(Screen::Progress, NavParams::new());

    match h.nav.view() {
        ScreenView::Progress {
            summary: Some(summary),
        } => {
            assert_eq!(summary.completed_modules, 1);
            assert_eq!(summary.percentage, 25);
            assert_eq!(summary.total_score, 10);
            assert_eq!(summary.medals[0].granted_on.as_deref(), Some("15/01/2025"));
        }
        other => panic!("expected progress summary, got {:?}", other),
    }
}

#[test]
fn test_progress_view_loading_when_logged_out() {
    let mut h = Harness::new();
    h.nav.navigate_to(Screen::Progress, NavParams::new());

    assert_eq!(h.nav.view(), ScreenView::Progress { summary: None });
}
