use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::env;
use thiserror::Error;
use tracing::debug;
use url::Url;

use jijue_core::model::{Course, CourseId, Enrollment, LessonId, LessonProgress, UserId};

use crate::repository::{ApiError, CatalogApi, EnrollmentApi, ProgressApi};
use crate::wire::{CourseDto, EnrollmentDto, LessonProgressDto, SetProgressDto};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Connection settings for the backend API.
///
/// The bearer token comes from the identity collaborator (login flow); the
/// client treats it as opaque and simply attaches it to requests.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub bearer_token: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Builds a config from `JIJUE_API_BASE_URL` and `JIJUE_API_TOKEN`,
    /// falling back to the local development server.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = env::var("JIJUE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let base_url = Url::parse(&raw).map_err(|_| ConfigError::InvalidBaseUrl(raw))?;

        let bearer_token = env::var("JIJUE_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        Ok(Self {
            base_url,
            bearer_token,
        })
    }
}

/// HTTP implementation of the backend API surfaces, rooted at `/api/v1`.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
}

impl HttpApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/v1{path}",
            self.config.base_url.as_str().trim_end_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get(&self, path: &str) -> Result<Response, ApiError> {
        debug!(path, "api get");
        let response = self
            .authorize(self.client.get(self.endpoint(path)))
            .send()
            .await?;
        check_status(response)
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        status => Err(ApiError::Status(status)),
    }
}

#[async_trait]
impl CatalogApi for HttpApi {
    async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let dtos: Vec<CourseDto> = self.get("/courses").await?.json().await?;
        dtos.into_iter().map(CourseDto::into_domain).collect()
    }

    async fn get_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let dto: CourseDto = self.get(&format!("/courses/{id}")).await?.json().await?;
        dto.into_domain()
    }
}

#[async_trait]
impl ProgressApi for HttpApi {
    async fn get_lesson_progress(
        &self,
        user: UserId,
        lesson: LessonId,
    ) -> Result<LessonProgress, ApiError> {
        let dto: LessonProgressDto = self
            .get(&format!("/users/{user}/progress/{lesson}"))
            .await?
            .json()
            .await?;
        dto.into_domain(user, lesson)
    }

    async fn put_lesson_progress(
        &self,
        progress: &LessonProgress,
    ) -> Result<LessonProgress, ApiError> {
        let user = progress.user_id();
        let lesson = progress.lesson_id();
        let path = format!("/users/{user}/progress/{lesson}");
        debug!(path, "api put");

        let response = self
            .authorize(self.client.put(self.endpoint(&path)))
            .json(&SetProgressDto::from_domain(progress))
            .send()
            .await?;
        let dto: LessonProgressDto = check_status(response)?.json().await?;
        dto.into_domain(user, lesson)
    }
}

#[async_trait]
impl EnrollmentApi for HttpApi {
    async fn list_enrollments(&self, user: UserId) -> Result<Vec<Enrollment>, ApiError> {
        let dtos: Vec<EnrollmentDto> = self
            .get(&format!("/users/{user}/enrollments"))
            .await?
            .json()
            .await?;
        Ok(dtos
            .into_iter()
            .map(|dto| dto.into_domain(user))
            .collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
