//! Generation lifecycle: per-job state machine around the long-running
//! tailoring call.
//!
//! Idle → Requesting → Succeeded (reverts to Idle after `SUCCESS_MESSAGE_TTL`)
//!                   → Failed    (stays until the user re-triggers or the
//!                                session is reset)
//!
//! Jobs are independent: a request in flight only blocks its own job.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::models::{JobId, ResumeId};
use crate::pipeline_client::{GenerationReceipt, PipelineApi, PipelineError};

/// How long the success confirmation stays visible.
pub const SUCCESS_MESSAGE_TTL: Duration = Duration::from_secs(5);

pub const MISSING_RESUME_MESSAGE: &str = "Please upload a resume first before generating";
pub const SUCCESS_MESSAGE: &str = "Resume generated successfully! Check the Applications page.";
pub const FAILURE_MESSAGE: &str = "Failed to generate resume. Please try again.";

/// Presentation view of one job's generation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationState {
    Idle,
    Requesting,
    Succeeded { message: String, expires_in_ms: u64 },
    Failed { message: String },
}

impl GenerationState {
    /// Whether the user may trigger generation for this job right now.
    pub fn can_trigger(&self) -> bool {
        !matches!(self, GenerationState::Requesting)
    }
}

#[derive(Debug, Clone)]
enum Phase {
    Requesting,
    Succeeded { message: String, expires_at: Instant },
    Failed { message: String },
}

#[derive(Debug, Clone)]
struct Entry {
    ticket: u64,
    phase: Phase,
}

#[derive(Default)]
struct GenerationInner {
    entries: HashMap<JobId, Entry>,
    next_ticket: u64,
}

/// Cheap to clone; clones share the same state map.
#[derive(Clone)]
pub struct GenerationCoordinator {
    inner: Arc<Mutex<GenerationInner>>,
    ttl: Duration,
}

impl Default for GenerationCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationCoordinator {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(GenerationInner::default())),
            ttl: SUCCESS_MESSAGE_TTL,
        }
    }

    pub fn state(&self, job_id: JobId) -> GenerationState {
        let mut inner = self.inner.lock();
        let now = Instant::now();

        let expired = matches!(
            inner.entries.get(&job_id),
            Some(Entry { phase: Phase::Succeeded { expires_at, .. }, .. }) if *expires_at <= now
        );
        if expired {
            inner.entries.remove(&job_id);
        }

        match inner.entries.get(&job_id).map(|e| &e.phase) {
            None => GenerationState::Idle,
            Some(Phase::Requesting) => GenerationState::Requesting,
            Some(Phase::Succeeded {
                message,
                expires_at,
            }) => GenerationState::Succeeded {
                message: message.clone(),
                expires_in_ms: expires_at.saturating_duration_since(now).as_millis() as u64,
            },
            Some(Phase::Failed { message }) => GenerationState::Failed {
                message: message.clone(),
            },
        }
    }

    /// Starts generation for `job_id` with the selected resume.
    ///
    /// Without a resume this fails with a validation error before any state
    /// changes or network call. While the same job is `Requesting` it fails
    /// with a conflict. Otherwise the job moves to `Requesting` and the call
    /// runs on its own task; the returned handle resolves once the outcome
    /// has been applied.
    pub fn trigger(
        &self,
        pipeline: Arc<dyn PipelineApi>,
        job_id: JobId,
        resume_id: Option<ResumeId>,
    ) -> Result<JoinHandle<()>, AppError> {
        let resume_id =
            resume_id.ok_or_else(|| AppError::validation("resume_id", MISSING_RESUME_MESSAGE))?;

        let ticket = {
            let mut inner = self.inner.lock();
            if matches!(
                inner.entries.get(&job_id),
                Some(Entry {
                    phase: Phase::Requesting,
                    ..
                })
            ) {
                return Err(AppError::Conflict(format!(
                    "Generation already in progress for job {job_id}"
                )));
            }
            inner.next_ticket += 1;
            let ticket = inner.next_ticket;
            inner.entries.insert(
                job_id,
                Entry {
                    ticket,
                    phase: Phase::Requesting,
                },
            );
            ticket
        };

        info!("Generating tailored resume: job {job_id}, resume {resume_id}");

        let coordinator = self.clone();
        Ok(tokio::spawn(async move {
            let outcome = pipeline.trigger_generation(resume_id, job_id).await;
            coordinator.complete(job_id, ticket, outcome);
        }))
    }

    fn complete(
        &self,
        job_id: JobId,
        ticket: u64,
        outcome: Result<GenerationReceipt, PipelineError>,
    ) {
        let mut inner = self.inner.lock();
        match inner.entries.get(&job_id) {
            Some(entry) if entry.ticket == ticket => {}
            _ => {
                debug!("Dropping stale generation result for job {job_id}");
                return;
            }
        }

        let phase = match outcome {
            Ok(receipt) => {
                info!("Generation for job {job_id} finished: {}", receipt.status);
                let expires_at = Instant::now() + self.ttl;
                self.schedule_expiry(job_id, ticket, expires_at);
                Phase::Succeeded {
                    message: SUCCESS_MESSAGE.to_string(),
                    expires_at,
                }
            }
            Err(e) => {
                warn!("Generation for job {job_id} failed: {e}");
                Phase::Failed {
                    message: FAILURE_MESSAGE.to_string(),
                }
            }
        };
        inner.entries.insert(job_id, Entry { ticket, phase });
    }

    /// Reverts a success to Idle once its message expires. `state` also
    /// checks the deadline, so readers never see a stale confirmation.
    fn schedule_expiry(&self, job_id: JobId, ticket: u64, expires_at: Instant) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(expires_at).await;
            let mut inner = coordinator.inner.lock();
            let still_current = matches!(
                inner.entries.get(&job_id),
                Some(Entry { ticket: t, phase: Phase::Succeeded { .. } }) if *t == ticket
            );
            if still_current {
                inner.entries.remove(&job_id);
            }
        });
    }

    /// Tears down all per-job state. In-flight calls still finish upstream but
    /// their results are dropped.
    pub fn reset(&self) {
        self.inner.lock().entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline_client::fake::FakePipeline;

    fn pipeline(fake: &Arc<FakePipeline>) -> Arc<dyn PipelineApi> {
        fake.clone()
    }

    #[tokio::test]
    async fn test_missing_resume_is_validation_error_without_network_call() {
        let fake = Arc::new(FakePipeline::default());
        let coordinator = GenerationCoordinator::new();

        let err = coordinator
            .trigger(pipeline(&fake), JobId(10), None)
            .unwrap_err();

        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "resume_id");
                assert_eq!(message, MISSING_RESUME_MESSAGE);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(fake.generation_calls(), 0);
        assert_eq!(coordinator.state(JobId(10)), GenerationState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_message_expires_without_interaction() {
        let fake = Arc::new(FakePipeline::default());
        let coordinator = GenerationCoordinator::new();

        coordinator
            .trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)))
            .unwrap()
            .await
            .unwrap();

        match coordinator.state(JobId(10)) {
            GenerationState::Succeeded {
                message,
                expires_in_ms,
            } => {
                assert_eq!(message, SUCCESS_MESSAGE);
                assert_eq!(expires_in_ms, 5_000);
            }
            other => panic!("expected success, got {other:?}"),
        }

        tokio::time::advance(Duration::from_millis(4_999)).await;
        assert!(matches!(
            coordinator.state(JobId(10)),
            GenerationState::Succeeded { .. }
        ));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(coordinator.state(JobId(10)), GenerationState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_persists_until_retry() {
        let fake = Arc::new(FakePipeline::default());
        fake.failing_generations.lock().insert(JobId(10));
        let coordinator = GenerationCoordinator::new();

        coordinator
            .trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)))
            .unwrap()
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(
            coordinator.state(JobId(10)),
            GenerationState::Failed {
                message: FAILURE_MESSAGE.to_string()
            }
        );

        fake.failing_generations.lock().clear();
        coordinator
            .trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)))
            .unwrap()
            .await
            .unwrap();
        assert!(matches!(
            coordinator.state(JobId(10)),
            GenerationState::Succeeded { .. }
        ));
    }

    #[tokio::test]
    async fn test_requesting_blocks_only_its_own_job() {
        let fake = Arc::new(FakePipeline::gated());
        let coordinator = GenerationCoordinator::new();

        let first = coordinator
            .trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)))
            .unwrap();
        assert_eq!(coordinator.state(JobId(10)), GenerationState::Requesting);
        assert!(!coordinator.state(JobId(10)).can_trigger());

        let again = coordinator.trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)));
        assert!(matches!(again, Err(AppError::Conflict(_))));

        let second = coordinator
            .trigger(pipeline(&fake), JobId(20), Some(ResumeId(1)))
            .unwrap();
        assert_eq!(coordinator.state(JobId(20)), GenerationState::Requesting);

        fake.release_generations(2);
        first.await.unwrap();
        second.await.unwrap();

        assert!(matches!(
            coordinator.state(JobId(10)),
            GenerationState::Succeeded { .. }
        ));
        assert!(matches!(
            coordinator.state(JobId(20)),
            GenerationState::Succeeded { .. }
        ));
    }

    #[tokio::test]
    async fn test_one_job_failing_does_not_affect_another() {
        let fake = Arc::new(FakePipeline::default());
        fake.failing_generations.lock().insert(JobId(20));
        let coordinator = GenerationCoordinator::new();

        let a = coordinator
            .trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)))
            .unwrap();
        let b = coordinator
            .trigger(pipeline(&fake), JobId(20), Some(ResumeId(1)))
            .unwrap();
        a.await.unwrap();
        b.await.unwrap();

        assert!(matches!(
            coordinator.state(JobId(10)),
            GenerationState::Succeeded { .. }
        ));
        assert!(matches!(
            coordinator.state(JobId(20)),
            GenerationState::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_reset_drops_in_flight_result() {
        let fake = Arc::new(FakePipeline::gated());
        let coordinator = GenerationCoordinator::new();

        let handle = coordinator
            .trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)))
            .unwrap();
        coordinator.reset();
        assert_eq!(coordinator.state(JobId(10)), GenerationState::Idle);

        fake.release_generations(1);
        handle.await.unwrap();
        assert_eq!(coordinator.state(JobId(10)), GenerationState::Idle);
        assert_eq!(fake.generation_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_of_old_success_does_not_clear_newer_request() {
        let fake = Arc::new(FakePipeline::default());
        let coordinator = GenerationCoordinator::new();

        coordinator
            .trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)))
            .unwrap()
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        fake.failing_generations.lock().insert(JobId(10));
        coordinator
            .trigger(pipeline(&fake), JobId(10), Some(ResumeId(1)))
            .unwrap()
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(3)).await;
        tokio::task::yield_now().await;
        assert!(matches!(
            coordinator.state(JobId(10)),
            GenerationState::Failed { .. }
        ));
    }
}
