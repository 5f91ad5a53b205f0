//! REST paths, relative to the configured base URL

use crate::types::{LessonId, ModuleRecordId, UserId};

pub const LOGIN: &str = "/api/usuarios/auth/login";
pub const MODULES: &str = "/api/modulos";

pub fn progress(user_id: UserId) -> String {
    format!("/api/progresso/usuario/{}", user_id)
}

pub fn complete_lesson(user_id: UserId, lesson_id: LessonId) -> String {
    format!("/api/progresso/usuario/{}/completar-licao/{}", user_id, lesson_id)
}

pub fn grant_medal(user_id: UserId) -> String {
    format!("/api/progresso/usuario/{}/conceder-medalha", user_id)
}

pub fn reset_progress(user_id: UserId) -> String {
    format!("/api/progresso/usuario/{}/resetar", user_id)
}

pub fn settings(user_id: UserId) -> String {
    format!("/api/usuarios/{}/configuracoes", user_id)
}

pub fn lessons(module_id: ModuleRecordId) -> String {
    format!("/api/modulos/{}/licoes", module_id)
}

pub fn quiz(lesson_id: LessonId) -> String {
    format!("/api/quiz/licao/{}", lesson_id)
}

pub fn submit_answer(user_id: UserId) -> String {
    format!("/api/quiz/submeter/usuario/{}", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(progress(7), "/api/progresso/usuario/7");
        assert_eq!(
            complete_lesson(7, 31),
            "/api/progresso/usuario/7/completar-licao/31"
        );
        assert_eq!(grant_medal(7), "/api/progresso/usuario/7/conceder-medalha");
        assert_eq!(reset_progress(7), "/api/progresso/usuario/7/resetar");
        assert_eq!(settings(7), "/api/usuarios/7/configuracoes");
        assert_eq!(lessons(2), "/api/modulos/2/licoes");
        assert_eq!(quiz(43), "/api/quiz/licao/43");
        assert_eq!(submit_answer(7), "/api/quiz/submeter/usuario/7");
    }
}
