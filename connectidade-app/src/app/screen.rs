//! Screen identifiers and navigation parameters

use std::collections::BTreeMap;
use std::fmt;

use libconnectidade::{LessonId, ModuleId};

/// Every screen the app can show
///
/// Route names follow the front end's string form: `splash`, `menu`,
/// `settings`, `progress`, `<module>-menu`, `<module>`, `video-<module>`
/// and `quiz`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    #[default]
    Splash,
    Menu,
    Settings,
    Progress,
    ModuleMenu(ModuleId),
    Simulator(ModuleId),
    Video(ModuleId),
    Quiz,
}

impl Screen {
    pub fn route(&self) -> String {
        match self {
            Screen::Splash => "splash".to_string(),
            Screen::Menu => "menu".to_string(),
            Screen::Settings => "settings".to_string(),
            Screen::Progress => "progress".to_string(),
            Screen::ModuleMenu(module) => format!("{}-menu", module.slug()),
            Screen::Simulator(module) => module.slug().to_string(),
            Screen::Video(module) => format!("video-{}", module.slug()),
            Screen::Quiz => "quiz".to_string(),
        }
    }

    pub fn from_route(route: &str) -> Option<Screen> {
        match route {
            "splash" => Some(Screen::Splash),
            "menu" => Some(Screen::Menu),
            "settings" => Some(Screen::Settings),
            "progress" => Some(Screen::Progress),
            "quiz" => Some(Screen::Quiz),
            _ => {
                if let Some(slug) = route.strip_suffix("-menu") {
                    slug.parse().ok().map(Screen::ModuleMenu)
                } else if let Some(slug) = route.strip_prefix("video-") {
                    slug.parse().ok().map(Screen::Video)
                } else {
                    route.parse().ok().map(Screen::Simulator)
                }
            }
        }
    }

    /// Resolve a route name, falling back to the splash screen
    pub fn resolve(route: &str) -> Screen {
        Screen::from_route(route).unwrap_or_else(|| {
            tracing::warn!(route, "Unknown screen, showing splash");
            Screen::Splash
        })
    }

    pub fn module(&self) -> Option<ModuleId> {
        match self {
            Screen::ModuleMenu(m) | Screen::Simulator(m) | Screen::Video(m) => Some(*m),
            _ => None,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.route())
    }
}

pub const PARAM_LESSON_ID: &str = "licaoId";
pub const PARAM_MODULE_ID: &str = "moduleId";

/// Key/value bag handed to the next screen
///
/// Replaced wholesale on every navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavParams(BTreeMap<String, String>);

impl NavParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for the quiz screen
    pub fn quiz(lesson_id: LessonId, module: ModuleId) -> Self {
        Self::new()
            .with(PARAM_LESSON_ID, lesson_id.to_string())
            .with(PARAM_MODULE_ID, module.slug())
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn lesson_id(&self) -> Option<LessonId> {
        self.get(PARAM_LESSON_ID).and_then(|v| v.parse().ok())
    }

    pub fn module(&self) -> Option<ModuleId> {
        self.get(PARAM_MODULE_ID).and_then(|v| v.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_roundtrip() {
        let mut screens = vec![
            Screen::Splash,
            Screen::Menu,
            Screen::Settings,
            Screen::Progress,
            Screen::Quiz,
        ];
        for module in ModuleId::ALL {
            screens.push(Screen::ModuleMenu(module));
            screens.push(Screen::Simulator(module));
            screens.push(Screen::Video(module));
        }

        for screen in screens {
            assert_eq!(Screen::from_route(&screen.route()), Some(screen));
        }
    }

    #[test]
    fn test_known_route_names() {
        assert_eq!(Screen::resolve("calls-menu"), Screen::ModuleMenu(ModuleId::Calls));
        assert_eq!(Screen::resolve("video-camera"), Screen::Video(ModuleId::Camera));
        assert_eq!(Screen::resolve("security"), Screen::Simulator(ModuleId::Security));
    }

    #[test]
    fn test_unknown_route_falls_back_to_splash() {
        assert_eq!(Screen::resolve("quiz-calls"), Screen::Splash);
        assert_eq!(Screen::resolve("photos-menu"), Screen::Splash);
        assert_eq!(Screen::resolve(""), Screen::Splash);
    }

    #[test]
    fn test_default_screen_is_splash() {
        assert_eq!(Screen::default(), Screen::Splash);
    }

    #[test]
    fn test_quiz_params() {
        let params = NavParams::quiz(43, ModuleId::Security);
        assert_eq!(params.lesson_id(), Some(43));
        assert_eq!(params.module(), Some(ModuleId::Security));
        assert_eq!(params.get(PARAM_MODULE_ID), Some("security"));
    }

    #[test]
    fn test_malformed_params() {
        let params = NavParams::new().with(PARAM_LESSON_ID, "abc");
        assert_eq!(params.lesson_id(), None);
        assert_eq!(params.module(), None);
    }
}
