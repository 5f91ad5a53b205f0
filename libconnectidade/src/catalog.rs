//! Fixed catalog of training modules
//!
//! The backend owns lessons and quizzes; this catalog only maps the four
//! modules the app knows about to their route slug, the title the backend
//! lists them under, and the static video description.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of modules counted by the progress screen
pub const TOTAL_MODULES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleId {
    Calls,
    Messages,
    Security,
    Camera,
}

/// Static description shown on a module's video screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: &'static str,
    pub duration: &'static str,
    pub description: &'static str,
}

impl ModuleId {
    pub const ALL: [ModuleId; TOTAL_MODULES] = [
        ModuleId::Calls,
        ModuleId::Messages,
        ModuleId::Security,
        ModuleId::Camera,
    ];

    /// Route slug (`calls`, `messages`, ...)
    pub fn slug(self) -> &'static str {
        match self {
            ModuleId::Calls => "calls",
            ModuleId::Messages => "messages",
            ModuleId::Security => "security",
            ModuleId::Camera => "camera",
        }
    }

    /// Title the backend lists this module under in `/api/modulos`
    pub fn backend_title(self) -> &'static str {
        match self {
            ModuleId::Calls => "Chamadas",
            ModuleId::Messages => "Mensagens/WhatsApp",
            ModuleId::Security => "Segurança Digital",
            ModuleId::Camera => "Câmera e Fotos",
        }
    }

    /// Medal granted when the module's simulator finishes
    pub fn medal_name(self) -> &'static str {
        match self {
            ModuleId::Calls => "Primeira Chamada",
            ModuleId::Messages => "Mestre das Mensagens",
            ModuleId::Security => "Guardião Digital",
            ModuleId::Camera => "Fotógrafo Expert",
        }
    }

    pub fn video(self) -> VideoInfo {
        match self {
            ModuleId::Calls => VideoInfo {
                title: "Como Fazer e Receber Chamadas",
                duration: "5:30",
                description: "Aprenda a fazer ligações, atender chamadas, usar o viva-voz e gerenciar sua lista de contatos de forma simples e segura.",
            },
            ModuleId::Messages => VideoInfo {
                title: "WhatsApp para Iniciantes",
                duration: "8:15",
                description: "Descubra como enviar mensagens de texto, áudios, fotos e vídeos pelo WhatsApp. Aprenda também a criar grupos e fazer videochamadas.",
            },
            ModuleId::Security => VideoInfo {
                title: "Segurança Digital e Golpes",
                duration: "6:45",
                description: "Aprenda a se proteger contra golpes digitais, identificar mensagens suspeitas e manter suas informações pessoais seguras na internet.",
            },
            ModuleId::Camera => VideoInfo {
                title: "Usando a Câmera do Celular",
                duration: "7:20",
                description: "Aprenda a tirar fotos, gravar vídeos, usar o zoom, flash e outros recursos da câmera. Descubra também como editar e compartilhar suas fotos.",
            },
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleId::ALL
            .into_iter()
            .find(|m| m.slug() == s)
            .ok_or_else(|| format!("Unknown module: '{}'. Valid options: calls, messages, security, camera", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_parse() {
        for module in ModuleId::ALL {
            assert_eq!(module.slug().parse::<ModuleId>().unwrap(), module);
        }
        assert!("photos".parse::<ModuleId>().is_err());
    }

    #[test]
    fn test_backend_titles_are_distinct() {
        let mut titles: Vec<_> = ModuleId::ALL.iter().map(|m| m.backend_title()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), TOTAL_MODULES);
    }

    #[test]
    fn test_serde_uses_slug() {
        assert_eq!(serde_json::to_string(&ModuleId::Camera).unwrap(), "\"camera\"");
    }
}
