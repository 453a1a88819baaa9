//! In-memory `PipelineApi` for coordinator and router tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use super::{GenerationReceipt, PipelineApi, PipelineError};
use crate::models::application::ApplicationStatus;
use crate::models::{ApplicationId, ApplicationRecord, JobId, JobRecord, ResumeId, ResumeRecord};

pub fn job(id: i64) -> JobRecord {
    JobRecord {
        id: JobId(id),
        title: format!("Engineer {id}"),
        company: format!("Company {id}"),
        fetched_at: NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .unwrap(),
        description: Some(format!("Description of job {id}")),
        url: None,
        source: Some("Manual".to_string()),
    }
}

pub fn resume(id: i64) -> ResumeRecord {
    ResumeRecord {
        id: ResumeId(id),
        name: format!("resume-{id}.pdf"),
        created_at: NaiveDate::from_ymd_opt(2024, 2, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap(),
    }
}

pub fn application(id: i64, job_id: i64) -> ApplicationRecord {
    ApplicationRecord {
        id: ApplicationId(id),
        job_id: JobId(job_id),
        resume_id: ResumeId(1),
        status: ApplicationStatus::Generated,
        created_at: NaiveDate::from_ymd_opt(2024, 3, 2)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap(),
        generated_content: Some(
            "Jane Doe\nSUMMARY\nBuilds things.\nEXPERIENCE\nDid stuff.\n".to_string(),
        ),
        ats_score: None,
        ats_grade: None,
        model_used: None,
    }
}

/// Scriptable fake. Detail fetches, generation calls and list fetches can be
/// held open by a gated constructor and released with `release_*`.
pub struct FakePipeline {
    pub jobs: Mutex<Vec<JobRecord>>,
    pub resumes: Mutex<Vec<ResumeRecord>>,
    pub applications: Mutex<Vec<ApplicationRecord>>,
    pub fail_lists: Mutex<bool>,
    pub failing_details: Mutex<HashSet<JobId>>,
    pub failing_generations: Mutex<HashSet<JobId>>,
    detail_calls: Mutex<HashMap<JobId, usize>>,
    generation_calls: AtomicUsize,
    detail_gate: Semaphore,
    generation_gate: Semaphore,
    list_gate: Semaphore,
}

impl Default for FakePipeline {
    fn default() -> Self {
        Self {
            jobs: Mutex::new(vec![job(10), job(20)]),
            resumes: Mutex::new(vec![resume(1), resume(2)]),
            applications: Mutex::new(vec![application(1, 10), application(2, 20)]),
            fail_lists: Mutex::new(false),
            failing_details: Mutex::new(HashSet::new()),
            failing_generations: Mutex::new(HashSet::new()),
            detail_calls: Mutex::new(HashMap::new()),
            generation_calls: AtomicUsize::new(0),
            detail_gate: Semaphore::new(Semaphore::MAX_PERMITS),
            generation_gate: Semaphore::new(Semaphore::MAX_PERMITS),
            list_gate: Semaphore::new(Semaphore::MAX_PERMITS),
        }
    }
}

impl FakePipeline {
    pub fn gated() -> Self {
        Self {
            detail_gate: Semaphore::new(0),
            generation_gate: Semaphore::new(0),
            ..Self::default()
        }
    }

    /// List fetches wait for `release_lists`; details and generations run freely.
    pub fn gated_lists() -> Self {
        Self {
            list_gate: Semaphore::new(0),
            ..Self::default()
        }
    }

    pub fn release_lists(&self, n: usize) {
        self.list_gate.add_permits(n);
    }

    pub fn release_details(&self, n: usize) {
        self.detail_gate.add_permits(n);
    }

    pub fn release_generations(&self, n: usize) {
        self.generation_gate.add_permits(n);
    }

    pub fn detail_calls(&self, id: JobId) -> usize {
        self.detail_calls.lock().get(&id).copied().unwrap_or(0)
    }

    pub fn total_detail_calls(&self) -> usize {
        self.detail_calls.lock().values().sum()
    }

    pub fn generation_calls(&self) -> usize {
        self.generation_calls.load(Ordering::SeqCst)
    }

    async fn list_guard(&self) -> Result<(), PipelineError> {
        if let Ok(permit) = self.list_gate.acquire().await {
            permit.forget();
        }
        if *self.fail_lists.lock() {
            return Err(PipelineError::Api {
                status: 503,
                message: "pipeline unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PipelineApi for FakePipeline {
    async fn fetch_job_list(&self) -> Result<Vec<JobRecord>, PipelineError> {
        self.list_guard().await?;
        Ok(self.jobs.lock().clone())
    }

    async fn fetch_job_detail(&self, id: JobId) -> Result<JobRecord, PipelineError> {
        *self.detail_calls.lock().entry(id).or_insert(0) += 1;
        if let Ok(permit) = self.detail_gate.acquire().await {
            permit.forget();
        }
        if self.failing_details.lock().contains(&id) {
            return Err(PipelineError::Api {
                status: 500,
                message: "detail exploded".to_string(),
            });
        }
        self.jobs
            .lock()
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| PipelineError::NotFound(format!("Job {id} not found")))
    }

    async fn fetch_resume_list(&self) -> Result<Vec<ResumeRecord>, PipelineError> {
        self.list_guard().await?;
        Ok(self.resumes.lock().clone())
    }

    async fn trigger_generation(
        &self,
        _resume_id: ResumeId,
        job_id: JobId,
    ) -> Result<GenerationReceipt, PipelineError> {
        self.generation_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(permit) = self.generation_gate.acquire().await {
            permit.forget();
        }
        if self.failing_generations.lock().contains(&job_id) {
            return Err(PipelineError::Api {
                status: 500,
                message: "Failed to generate resume: model offline".to_string(),
            });
        }
        Ok(GenerationReceipt {
            status: "success".to_string(),
            message: Some("Resume tailored successfully".to_string()),
            tailored_resume: Some("Jane Doe...".to_string()),
        })
    }

    async fn fetch_application_list(&self) -> Result<Vec<ApplicationRecord>, PipelineError> {
        self.list_guard().await?;
        Ok(self.applications.lock().clone())
    }
}
