use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{ApplicationId, JobId, ResumeId};

/// Lifecycle status of an application.
///
/// Upstream writes title-case values ("Generated", "Draft"); parsing is
/// case-insensitive and anything unrecognised is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ApplicationStatus {
    Draft,
    Generated,
    Applied,
    Rejected,
    Other(String),
}

impl From<String> for ApplicationStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Self::Draft,
            "generated" => Self::Generated,
            "applied" => Self::Applied,
            "rejected" => Self::Rejected,
            _ => Self::Other(raw),
        }
    }
}

impl From<ApplicationStatus> for String {
    fn from(status: ApplicationStatus) -> Self {
        match status {
            ApplicationStatus::Draft => "draft".to_string(),
            ApplicationStatus::Generated => "generated".to_string(),
            ApplicationStatus::Applied => "applied".to_string(),
            ApplicationStatus::Rejected => "rejected".to_string(),
            ApplicationStatus::Other(raw) => raw,
        }
    }
}

/// ATS grade band shown next to an application's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsGrade {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl AtsGrade {
    /// Resolves the grade for a score. An explicit upstream label wins over
    /// the score thresholds; no score means no grade.
    pub fn resolve(score: Option<u32>, label: Option<&str>) -> Option<Self> {
        let score = score?;
        let from_label = label.and_then(|l| match l.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "good" => Some(Self::Good),
            "fair" => Some(Self::Fair),
            "poor" | "needs_work" => Some(Self::NeedsWork),
            _ => None,
        });
        Some(from_label.unwrap_or(match score {
            90.. => Self::Excellent,
            75..=89 => Self::Good,
            60..=74 => Self::Fair,
            _ => Self::NeedsWork,
        }))
    }
}

/// An application as returned by the pipeline's application list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub resume_id: ResumeId,
    pub status: ApplicationStatus,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub generated_content: Option<String>,
    #[serde(default)]
    pub ats_score: Option<u32>,
    #[serde(default)]
    pub ats_grade: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
}

impl ApplicationRecord {
    pub fn grade(&self) -> Option<AtsGrade> {
        AtsGrade::resolve(self.ats_score, self.ats_grade.as_deref())
    }
}
