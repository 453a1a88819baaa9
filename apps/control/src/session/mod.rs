// Session state: everything the console remembers between user actions.
// Lives for one session only; nothing here is persisted.

pub mod dashboard;
pub mod detail_cache;
pub mod expansion;
pub mod generation;
pub mod handlers;
pub mod lists;

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::info;

use crate::document::{segment, StructuredDocument};
use crate::errors::AppError;
use crate::models::{
    ApplicationId, ApplicationRecord, AtsGrade, JobId, JobRecord, ResumeId, ResumeRecord,
};
use crate::pipeline_client::PipelineApi;

use detail_cache::{DetailCache, DetailState};
use expansion::{ExpansionCoordinator, Toggle};
use generation::{GenerationCoordinator, GenerationState};
use lists::{ListPage, ListView};

/// One application row as the presentation layer sees it.
#[derive(Debug, Clone, Serialize)]
pub struct RowView {
    pub application: ApplicationRecord,
    pub expanded: bool,
    pub loading: bool,
    /// Job detail once fetched; absent rows show only the job id.
    pub job: Option<JobRecord>,
    pub job_label: String,
    /// Why the last detail fetch for this row's job failed, if it did.
    pub detail_error: Option<String>,
    pub ats_grade: Option<AtsGrade>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobRowView {
    pub job: JobRecord,
    pub generation: GenerationState,
    /// False while this job is requesting or when no resume is selected.
    pub can_generate: bool,
}

pub struct Session {
    pub jobs: ListPage<JobRecord>,
    pub resumes: ListPage<ResumeRecord>,
    pub applications: ListPage<ApplicationRecord>,
    selected_resume: Mutex<Option<ResumeId>>,
    pub details: DetailCache,
    pub expansion: ExpansionCoordinator,
    pub generation: GenerationCoordinator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            jobs: ListPage::new("jobs"),
            resumes: ListPage::new("resumes"),
            applications: ListPage::new("applications"),
            selected_resume: Mutex::new(None),
            details: DetailCache::new(),
            expansion: ExpansionCoordinator::new(),
            generation: GenerationCoordinator::new(),
        }
    }

    // ── Lists ──────────────────────────────────────────────────────────────

    pub async fn reload_jobs(&self, pipeline: &dyn PipelineApi) -> ListView<JobRecord> {
        let ticket = self.jobs.begin();
        let result = pipeline.fetch_job_list().await;
        self.jobs
            .apply(ticket, result)
            .unwrap_or_else(|| self.jobs.view())
    }

    pub async fn reload_applications(
        &self,
        pipeline: &dyn PipelineApi,
    ) -> ListView<ApplicationRecord> {
        let ticket = self.applications.begin();
        let result = pipeline.fetch_application_list().await;
        self.applications
            .apply(ticket, result)
            .unwrap_or_else(|| self.applications.view())
    }

    /// Reloads resumes and keeps the selection valid: a selection missing
    /// from the new list falls back to the first resume. A reload that
    /// straddles a reset touches neither the list nor the selection.
    pub async fn reload_resumes(&self, pipeline: &dyn PipelineApi) -> ListView<ResumeRecord> {
        let ticket = self.resumes.begin();
        let result = pipeline.fetch_resume_list().await;
        let succeeded = result.is_ok();
        let Some(view) = self.resumes.apply(ticket, result) else {
            return self.resumes.view();
        };

        if succeeded {
            let mut selected = self.selected_resume.lock();
            let still_present = selected.is_some_and(|id| view.items.iter().any(|r| r.id == id));
            if !still_present {
                *selected = view.items.first().map(|r| r.id);
            }
        }
        view
    }

    // ── Resume selection ───────────────────────────────────────────────────

    pub fn selected_resume(&self) -> Option<ResumeId> {
        *self.selected_resume.lock()
    }

    pub fn select_resume(&self, id: ResumeId) -> Result<(), AppError> {
        if self.resumes.find(|r| r.id == id).is_none() {
            return Err(AppError::validation(
                "resume_id",
                format!("Resume {id} is not in the resume list"),
            ));
        }
        *self.selected_resume.lock() = Some(id);
        Ok(())
    }

    // ── Application rows ───────────────────────────────────────────────────

    fn application(&self, id: ApplicationId) -> Result<ApplicationRecord, AppError> {
        self.applications
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
    }

    fn row_for(&self, application: ApplicationRecord) -> RowView {
        let state = self.details.state(application.job_id);
        let job = match state {
            DetailState::Loaded(ref job) => Some(job.clone()),
            _ => None,
        };
        let job_label = job
            .as_ref()
            .map(JobRecord::display_label)
            .unwrap_or_else(|| format!("Job #{}", application.job_id));
        RowView {
            expanded: self.expansion.is_expanded(application.id),
            loading: state == DetailState::Loading,
            detail_error: self.details.failure(application.job_id),
            ats_grade: application.grade(),
            job,
            job_label,
            application,
        }
    }

    pub fn rows(&self) -> Vec<RowView> {
        self.applications
            .items()
            .into_iter()
            .map(|a| self.row_for(a))
            .collect()
    }

    pub fn row(&self, id: ApplicationId) -> Result<RowView, AppError> {
        Ok(self.row_for(self.application(id)?))
    }

    /// Expands or collapses a row. Expanding a row whose job detail is not
    /// cached starts exactly one fetch; the handle resolves once the result
    /// is in the cache. Collapsing never cancels a fetch.
    pub fn toggle_application(
        &self,
        pipeline: Arc<dyn PipelineApi>,
        id: ApplicationId,
    ) -> Result<(RowView, Option<JoinHandle<()>>), AppError> {
        let application = self.application(id)?;

        let fetch = match self.expansion.toggle(id) {
            Toggle::Collapsed => None,
            Toggle::Expanded { previous } => {
                if let Some(previous) = previous {
                    info!("Collapsed application {previous} to expand {id}");
                }
                self.details
                    .begin_load(application.job_id)
                    .map(|ticket| self.details.spawn_fetch(pipeline, ticket))
            }
        };

        Ok((self.row_for(application), fetch))
    }

    pub fn document(&self, id: ApplicationId) -> Result<StructuredDocument, AppError> {
        let application = self.application(id)?;
        let content = application.generated_content.ok_or_else(|| {
            AppError::NotFound(format!("Application {id} has no generated content"))
        })?;
        Ok(segment(&content))
    }

    // ── Generation ─────────────────────────────────────────────────────────

    pub fn job_rows(&self) -> Vec<JobRowView> {
        let has_resume = self.selected_resume().is_some();
        self.jobs
            .items()
            .into_iter()
            .map(|job| {
                let generation = self.generation.state(job.id);
                JobRowView {
                    can_generate: has_resume && generation.can_trigger(),
                    generation,
                    job,
                }
            })
            .collect()
    }

    pub fn trigger_generation(
        &self,
        pipeline: Arc<dyn PipelineApi>,
        job_id: JobId,
    ) -> Result<JoinHandle<()>, AppError> {
        let resume = self.selected_resume();
        if resume.is_some() && self.jobs.find(|j| j.id == job_id).is_none() {
            return Err(AppError::NotFound(format!("Job {job_id} not found")));
        }
        self.generation.trigger(pipeline, job_id, resume)
    }

    /// Tears the session down to its initial state.
    pub fn reset(&self) {
        info!("Resetting session state");
        self.jobs.reset();
        self.resumes.reset();
        self.applications.reset();
        *self.selected_resume.lock() = None;
        self.details.reset();
        self.expansion.reset();
        self.generation.reset();
    }
}
