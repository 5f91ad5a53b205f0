//! Wire types exchanged with the learning backend
//!
//! Field names on the wire are the backend's (Portuguese, camelCase); the
//! Rust side uses English names with explicit renames.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

pub type UserId = i64;
pub type ModuleRecordId = i64;
pub type LessonId = i64;
pub type QuestionId = i64;
pub type OptionId = i64;

// ============================================================================
// Session
// ============================================================================

/// Identity sent to `POST /api/usuarios/auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "googleId")]
    pub google_id: String,
    pub email: String,
    #[serde(rename = "nomeExibicao")]
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "usuario")]
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "nomeExibicao")]
    pub display_name: String,
    pub email: String,
    #[serde(rename = "configTextoGrande", default)]
    pub large_text: bool,
    #[serde(rename = "configAltoContraste", default)]
    pub high_contrast: bool,
}

/// Body of `PUT /api/usuarios/{id}/configuracoes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(rename = "configTextoGrande")]
    pub large_text: bool,
    #[serde(rename = "configAltoContraste")]
    pub high_contrast: bool,
}

// ============================================================================
// Content
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: ModuleRecordId,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "ordem", default)]
    pub order: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonKind {
    #[serde(rename = "SIMULADOR")]
    Simulator,
    #[serde(rename = "VIDEO")]
    Video,
    #[serde(rename = "QUIZ")]
    Quiz,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    #[serde(rename = "moduloId", default)]
    pub module_id: Option<ModuleRecordId>,
    #[serde(rename = "tipo")]
    pub kind: LessonKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "pontosRecompensa", default)]
    pub reward_points: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: i64,
    #[serde(rename = "licaoId")]
    pub lesson_id: LessonId,
    #[serde(rename = "perguntas", default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(rename = "enunciado")]
    pub prompt: String,
    #[serde(rename = "opcoes", default)]
    pub options: Vec<AnswerOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    #[serde(rename = "texto")]
    pub text: String,
}

/// Body of `POST /api/quiz/submeter/usuario/{id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    #[serde(rename = "perguntaId")]
    pub question_id: QuestionId,
    #[serde(rename = "opcaoEscolhidaId")]
    pub option_id: OptionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    #[serde(rename = "isCorreta")]
    pub correct: bool,
    #[serde(rename = "explicacaoResposta", default)]
    pub explanation: String,
}

// ============================================================================
// Progress
// ============================================================================

/// Server-computed progress aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(rename = "pontuacaoTotal", default)]
    pub total_score: i64,
    #[serde(rename = "licoesCompletasIds", default)]
    pub completed_lesson_ids: Vec<LessonId>,
    #[serde(rename = "medalhas", default)]
    pub medals: Vec<EarnedMedal>,
}

impl Progress {
    pub fn is_completed(&self, lesson_id: LessonId) -> bool {
        self.completed_lesson_ids.contains(&lesson_id)
    }

    pub fn has_medal(&self, name: &str) -> bool {
        self.medals.iter().any(|m| m.medal.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedMedal {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "medalha")]
    pub medal: Medal,
    /// Wall-clock time as the server wrote it; unparseable dates become `None`
    #[serde(
        rename = "dataConquista",
        default,
        deserialize_with = "deserialize_lenient_timestamp"
    )]
    pub granted_at: Option<NaiveDateTime>,
}

/// Accept `2025-01-15T10:00:00`, fractional seconds, `Z` or an offset
fn deserialize_lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let parsed = raw
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(&raw).ok().map(|dt| dt.naive_local()));
    if parsed.is_none() {
        tracing::warn!(value = %raw, "Ignoring unparseable medal date");
    }
    Ok(parsed)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medal {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
}

/// Body of `POST /api/progresso/usuario/{id}/conceder-medalha`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalGrant {
    #[serde(rename = "nomeMedalha")]
    pub name: String,
    #[serde(rename = "pontosExtras")]
    pub bonus_points: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_backend_json() {
        let json = r#"{
            "pontuacaoTotal": 25,
            "licoesCompletasIds": [3, 7],
            "medalhas": [
                {
                    "id": 1,
                    "medalha": { "id": 4, "nome": "Guardião Digital", "descricao": "Segurança" },
                    "dataConquista": "2025-03-14T09:30:00"
                }
            ]
        }"#;

        let progress: Progress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.total_score, 25);
        assert!(progress.is_completed(7));
        assert!(!progress.is_completed(8));
        assert!(progress.has_medal("Guardião Digital"));
        assert_eq!(
            progress.medals[0].granted_at.unwrap().to_string(),
            "2025-03-14 09:30:00"
        );
    }

    fn granted_at(date: &str) -> Option<NaiveDateTime> {
        let json = format!(
            r#"{{"medalhas": [{{"medalha": {{"nome": "Primeira Chamada"}}, "dataConquista": "{}"}}]}}"#,
            date
        );
        let progress: Progress = serde_json::from_str(&json).unwrap();
        progress.medals[0].granted_at
    }

    #[test]
    fn test_medal_date_formats() {
        let expected = "2025-01-15 10:00:00";
        assert_eq!(granted_at("2025-01-15T10:00:00Z").unwrap().to_string(), expected);
        assert_eq!(
            granted_at("2025-01-15T10:00:00-03:00").unwrap().to_string(),
            expected
        );
        assert_eq!(
            granted_at("2025-01-15T10:00:00.123456").unwrap().format("%d/%m/%Y").to_string(),
            "15/01/2025"
        );
        assert_eq!(
            granted_at("2025-01-15T10:00:00.5+01:00").unwrap().format("%H:%M").to_string(),
            "10:00"
        );
    }

    #[test]
    fn test_bad_medal_date_keeps_snapshot() {
        assert_eq!(granted_at("ontem"), None);

        let progress: Progress = serde_json::from_str(
            r#"{"pontuacaoTotal": 10, "medalhas": [{"medalha": {"nome": "X"}, "dataConquista": null}]}"#,
        )
        .unwrap();
        assert_eq!(progress.total_score, 10);
        assert_eq!(progress.medals[0].granted_at, None);
    }

    #[test]
    fn test_empty_progress_body() {
        let progress: Progress = serde_json::from_str("{}").unwrap();
        assert_eq!(progress, Progress::default());
    }

    #[test]
    fn test_lesson_kind_tags() {
        let lessons: Vec<Lesson> = serde_json::from_str(
            r#"[
                {"id": 1, "moduloId": 2, "tipo": "SIMULADOR", "titulo": "Pratique", "pontosRecompensa": 10},
                {"id": 2, "moduloId": 2, "tipo": "QUIZ", "titulo": "Quiz"},
                {"id": 3, "tipo": "PODCAST", "titulo": "Extra"}
            ]"#,
        )
        .unwrap();

        assert_eq!(lessons[0].kind, LessonKind::Simulator);
        assert_eq!(lessons[1].kind, LessonKind::Quiz);
        assert_eq!(lessons[1].reward_points, 0);
        assert_eq!(lessons[2].kind, LessonKind::Unknown);
    }

    #[test]
    fn test_request_bodies_use_backend_names() {
        let grant = MedalGrant {
            name: "Primeira Chamada".to_string(),
            bonus_points: 10,
        };
        assert_eq!(
            serde_json::to_value(&grant).unwrap(),
            serde_json::json!({"nomeMedalha": "Primeira Chamada", "pontosExtras": 10})
        );

        let settings = SettingsUpdate {
            large_text: true,
            high_contrast: false,
        };
        assert_eq!(
            serde_json::to_value(settings).unwrap(),
            serde_json::json!({"configTextoGrande": true, "configAltoContraste": false})
        );

        let answer = AnswerSubmission {
            question_id: 5,
            option_id: 21,
        };
        assert_eq!(
            serde_json::to_value(answer).unwrap(),
            serde_json::json!({"perguntaId": 5, "opcaoEscolhidaId": 21})
        );
    }

    #[test]
    fn test_login_response() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"token": "abc", "usuario": {"id": 9, "nomeExibicao": "Maria", "email": "m@x.com", "configAltoContraste": true}}"#,
        )
        .unwrap();
        assert_eq!(response.user.id, 9);
        assert!(response.user.high_contrast);
        assert!(!response.user.large_text);
    }
}
