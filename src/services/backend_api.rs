use std::time::{Duration as StdDuration, Instant};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::EngineDefaults;
use crate::error::{AppError, AppResult, BackendErrorCode};
use crate::models::availability::{CoachAvailability, ProgramConstraints};
use crate::models::matching::CoachProfile;
use crate::models::session::{ExistingSession, ScheduleSessionRequest, Session};

/// Seam to the external coach-profile, mentorship and session stores. The
/// HTTP client below is the production implementation; tests may stub it.
#[async_trait::async_trait]
pub trait SchedulingBackend: Send + Sync {
    async fn fetch_coach_availability(&self, coach_id: &str) -> AppResult<CoachAvailability>;
    async fn fetch_coach_sessions(&self, coach_id: &str) -> AppResult<Vec<ExistingSession>>;
    async fn fetch_program_constraints(
        &self,
        mentorship_request_id: &str,
    ) -> AppResult<ProgramConstraints>;
    async fn fetch_coaches(&self) -> AppResult<Vec<CoachProfile>>;
    async fn create_session(&self, request: &ScheduleSessionRequest) -> AppResult<Session>;
}

/// Backend responses wrap their payload in a `data` envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: T,
}

pub struct BackendApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendApiClient {
    /// Builds a client bounded by the configured resolver timeout.
    pub fn from_defaults(base_url: impl Into<String>, defaults: &EngineDefaults) -> AppResult<Self> {
        Self::new(base_url, defaults.resolver_timeout)
    }

    pub fn new(base_url: impl Into<String>, timeout: StdDuration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Some(StdDuration::from_secs(90)))
            .build()
            .map_err(|err| AppError::other(format!("failed to build backend HTTP client: {err}")))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = format!("{}{}", self.base_url, path);

        debug!(
            target: "app::backend",
            %url,
            correlation_id = %correlation_id,
            "fetching from scheduling backend"
        );

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| error_from_reqwest(err, &correlation_id))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                target: "app::backend",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                "backend returned non-success status"
            );
            return Err(map_http_error(status, &correlation_id));
        }

        let envelope: ApiEnvelope<T> = response.json().await.map_err(|err| {
            AppError::upstream_with_correlation(
                BackendErrorCode::InvalidResponse,
                format!("failed to decode backend response: {err}"),
                Some(&correlation_id),
            )
        })?;

        debug!(
            target: "app::backend",
            correlation_id = %correlation_id,
            latency_ms = start.elapsed().as_millis() as u64,
            "backend responded"
        );

        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl SchedulingBackend for BackendApiClient {
    async fn fetch_coach_availability(&self, coach_id: &str) -> AppResult<CoachAvailability> {
        self.get_json(&format!("/coaches/{coach_id}/availability"))
            .await
    }

    async fn fetch_coach_sessions(&self, coach_id: &str) -> AppResult<Vec<ExistingSession>> {
        self.get_json(&format!(
            "/coaches/{coach_id}/sessions?status=scheduled,confirmed"
        ))
        .await
    }

    async fn fetch_program_constraints(
        &self,
        mentorship_request_id: &str,
    ) -> AppResult<ProgramConstraints> {
        self.get_json(&format!("/mentorship-requests/{mentorship_request_id}"))
            .await
    }

    async fn fetch_coaches(&self) -> AppResult<Vec<CoachProfile>> {
        self.get_json("/coaches").await
    }

    async fn create_session(&self, request: &ScheduleSessionRequest) -> AppResult<Session> {
        let correlation_id = Uuid::new_v4().to_string();
        let url = format!("{}/sessions", self.base_url);

        debug!(
            target: "app::backend",
            %url,
            coach_id = %request.coach_id,
            correlation_id = %correlation_id,
            "creating session"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|err| error_from_reqwest(err, &correlation_id))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                target: "app::backend",
                correlation_id = %correlation_id,
                status = status.as_u16(),
                "session creation rejected"
            );
            return Err(map_http_error(status, &correlation_id));
        }

        let envelope: ApiEnvelope<Session> = response.json().await.map_err(|err| {
            AppError::upstream_with_correlation(
                BackendErrorCode::InvalidResponse,
                format!("failed to decode created session: {err}"),
                Some(&correlation_id),
            )
        })?;

        Ok(envelope.data)
    }
}

fn map_http_error(status: StatusCode, correlation_id: &str) -> AppError {
    let code = match status {
        StatusCode::NOT_FOUND => BackendErrorCode::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendErrorCode::Forbidden,
        StatusCode::REQUEST_TIMEOUT => BackendErrorCode::HttpTimeout,
        StatusCode::TOO_MANY_REQUESTS => BackendErrorCode::RateLimited,
        _ if status.is_server_error() => BackendErrorCode::Unavailable,
        _ => BackendErrorCode::Unknown,
    };
    AppError::upstream_with_correlation(
        code,
        format!("backend request failed with status {}", status.as_u16()),
        Some(correlation_id),
    )
}

fn error_from_reqwest(err: reqwest::Error, correlation_id: &str) -> AppError {
    let code = if err.is_timeout() {
        BackendErrorCode::HttpTimeout
    } else {
        BackendErrorCode::Unavailable
    };
    AppError::upstream_with_correlation(
        code,
        format!("backend request error: {err}"),
        Some(correlation_id),
    )
}
