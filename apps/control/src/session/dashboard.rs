//! Dashboard summary: counts of the three upstream lists, fetched together.

use serde::Serialize;
use tracing::warn;

use crate::pipeline_client::PipelineApi;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub jobs: usize,
    pub resumes: usize,
    pub applications: usize,
    pub banner: Option<String>,
}

pub const DASHBOARD_BANNER: &str = "Failed to load stats. Please try again.";

/// Fetches all three lists concurrently. Any failure yields zero counts and
/// a banner; list pages are left untouched.
pub async fn load_dashboard(pipeline: &dyn PipelineApi) -> DashboardSummary {
    let fetched = tokio::try_join!(
        pipeline.fetch_job_list(),
        pipeline.fetch_resume_list(),
        pipeline.fetch_application_list(),
    );

    match fetched {
        Ok((jobs, resumes, applications)) => DashboardSummary {
            jobs: jobs.len(),
            resumes: resumes.len(),
            applications: applications.len(),
            banner: None,
        },
        Err(e) => {
            warn!("Failed to load stats: {e}");
            DashboardSummary {
                banner: Some(DASHBOARD_BANNER.to_string()),
                ..DashboardSummary::default()
            }
        }
    }
}
