//! REST client for the learning backend

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{endpoints, ApiResult, Backend};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{
    AnswerResult, AnswerSubmission, Lesson, LessonId, LoginRequest, LoginResponse, MedalGrant,
    ModuleRecord, ModuleRecordId, Progress, Quiz, SettingsUpdate, UserId,
};

pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_session(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.token.read() {
            Ok(guard) => match guard.as_ref() {
                Some(token) => builder.bearer_auth(token.expose_secret()),
                None => builder,
            },
            Err(_) => builder,
        }
    }

    async fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        tracing::debug!("GET {}", path);
        let response = self.request(Method::GET, path).send().await?;
        Ok(Self::check(response).await?.json::<T>().await?)
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!("{} {}", method, path);
        let response = self.request(method, path).json(body).send().await?;
        Ok(Self::check(response).await?.json::<T>().await?)
    }

    /// Send a request whose response body is irrelevant
    async fn send_unit<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<()> {
        tracing::debug!("{} {}", method, path);
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        Self::check(builder.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let response: LoginResponse = self
            .send_json(Method::POST, endpoints::LOGIN, request)
            .await?;

        match self.token.write() {
            Ok(mut token) => *token = Some(SecretString::from(response.token.clone())),
            Err(_) => return Err(ApiError::Unauthorized("session store unavailable".to_string())),
        }
        tracing::info!("Logged in as user {}", response.user.id);

        Ok(response)
    }

    async fn fetch_progress(&self, user_id: UserId) -> ApiResult<Progress> {
        self.get_json(&endpoints::progress(user_id)).await
    }

    async fn complete_lesson(&self, user_id: UserId, lesson_id: LessonId) -> ApiResult<()> {
        self.send_unit::<()>(Method::POST, &endpoints::complete_lesson(user_id, lesson_id), None)
            .await
    }

    async fn grant_medal(&self, user_id: UserId, grant: &MedalGrant) -> ApiResult<()> {
        self.send_unit(Method::POST, &endpoints::grant_medal(user_id), Some(grant))
            .await
    }

    async fn reset_progress(&self, user_id: UserId) -> ApiResult<()> {
        self.send_unit::<()>(Method::DELETE, &endpoints::reset_progress(user_id), None)
            .await
    }

    async fn update_settings(&self, user_id: UserId, settings: SettingsUpdate) -> ApiResult<()> {
        self.send_unit(Method::PUT, &endpoints::settings(user_id), Some(&settings))
            .await
    }

    async fn list_modules(&self) -> ApiResult<Vec<ModuleRecord>> {
        self.get_json(endpoints::MODULES).await
    }

    async fn list_lessons(&self, module_id: ModuleRecordId) -> ApiResult<Vec<Lesson>> {
        self.get_json(&endpoints::lessons(module_id)).await
    }

    async fn fetch_quiz(&self, lesson_id: LessonId) -> ApiResult<Quiz> {
        self.get_json(&endpoints::quiz(lesson_id)).await
    }

    async fn submit_answer(
        &self,
        user_id: UserId,
        answer: AnswerSubmission,
    ) -> ApiResult<AnswerResult> {
        self.send_json(Method::POST, &endpoints::submit_answer(user_id), &answer)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ApiConfig {
            base_url: "http://10.136.64.116:4502/".to_string(),
            timeout_secs: 10,
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.base_url(), "http://10.136.64.116:4502");
        assert_eq!(
            backend.url(endpoints::MODULES),
            "http://10.136.64.116:4502/api/modulos"
        );
    }

    #[test]
    fn test_no_session_before_login() {
        let backend = HttpBackend::new(&ApiConfig::default()).unwrap();
        assert!(!backend.has_session());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
        };
        let backend = HttpBackend::new(&config).unwrap();

        let err = backend.list_modules().await.unwrap_err();
        assert!(err.is_network(), "expected network error, got {:?}", err);
    }
}
