use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::JobId;

/// A job posting as returned by the pipeline.
///
/// The list endpoint omits `description`, `url` and `source`; the detail
/// endpoint fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub fetched_at: NaiveDateTime,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

impl JobRecord {
    /// Row label used once the detail is known: "Title at Company".
    pub fn display_label(&self) -> String {
        format!("{} at {}", self.title, self.company)
    }
}
