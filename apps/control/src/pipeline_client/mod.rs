/// Pipeline Client: the single point of entry for all upstream pipeline calls.
///
/// ARCHITECTURAL RULE: session coordinators never build HTTP requests. Every
/// call to the job-application pipeline goes through `PipelineApi`, so tests
/// swap in a fake without touching coordinator or handler code.
///
/// No retries and no timeout: generation can run for minutes and all retry is
/// user-initiated.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{ApplicationRecord, JobId, JobRecord, ResumeId, ResumeRecord};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What the generate endpoint returns once the tailored resume is stored.
/// The full application shows up on the next application list fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReceipt {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    /// First part of the tailored text; upstream truncates it.
    #[serde(default)]
    pub tailored_resume: Option<String>,
}

/// Contracts consumed from the upstream pipeline.
///
/// Carried in `AppState` as `Arc<dyn PipelineApi>`.
#[async_trait]
pub trait PipelineApi: Send + Sync {
    async fn fetch_job_list(&self) -> Result<Vec<JobRecord>, PipelineError>;

    /// Fails with `PipelineError::NotFound` for an unknown id.
    async fn fetch_job_detail(&self, id: JobId) -> Result<JobRecord, PipelineError>;

    async fn fetch_resume_list(&self) -> Result<Vec<ResumeRecord>, PipelineError>;

    /// Long-running: the upstream runs the AI tailoring step before replying.
    async fn trigger_generation(
        &self,
        resume_id: ResumeId,
        job_id: JobId,
    ) -> Result<GenerationReceipt, PipelineError>;

    async fn fetch_application_list(&self) -> Result<Vec<ApplicationRecord>, PipelineError>;
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    detail: String,
}

/// reqwest-backed client for the pipeline's REST API.
#[derive(Clone)]
pub struct HttpPipelineClient {
    client: Client,
    base_url: String,
}

impl HttpPipelineClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PipelineError> {
        let response = self.client.get(self.url(path)).send().await?;
        read_json(response, path).await
    }
}

/// Maps a non-success status to `PipelineError`, otherwise decodes the body.
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    path: &str,
) -> Result<T, PipelineError> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::NOT_FOUND {
        return Err(PipelineError::NotFound(upstream_message(&body, path)));
    }
    if !status.is_success() {
        return Err(PipelineError::Api {
            status: status.as_u16(),
            message: upstream_message(&body, path),
        });
    }

    debug!("Pipeline {path} -> {status} ({} bytes)", body.len());
    serde_json::from_str(&body).map_err(PipelineError::Parse)
}

/// FastAPI wraps errors as `{"detail": "..."}`; fall back to the raw body.
fn upstream_message(body: &str, path: &str) -> String {
    match serde_json::from_str::<UpstreamError>(body) {
        Ok(e) => e.detail,
        Err(_) if body.trim().is_empty() => path.to_string(),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl PipelineApi for HttpPipelineClient {
    async fn fetch_job_list(&self) -> Result<Vec<JobRecord>, PipelineError> {
        self.get_json("/jobs/").await
    }

    async fn fetch_job_detail(&self, id: JobId) -> Result<JobRecord, PipelineError> {
        self.get_json(&format!("/jobs/{id}")).await
    }

    async fn fetch_resume_list(&self) -> Result<Vec<ResumeRecord>, PipelineError> {
        self.get_json("/resumes/").await
    }

    async fn trigger_generation(
        &self,
        resume_id: ResumeId,
        job_id: JobId,
    ) -> Result<GenerationReceipt, PipelineError> {
        let path = "/applications/generate";
        let response = self
            .client
            .post(self.url(path))
            .query(&[("resume_id", resume_id.0), ("job_id", job_id.0)])
            .send()
            .await?;
        read_json(response, path).await
    }

    async fn fetch_application_list(&self) -> Result<Vec<ApplicationRecord>, PipelineError> {
        self.get_json("/applications/").await
    }
}

#[cfg(test)]
pub mod fake;
