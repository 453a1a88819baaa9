use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::ResumeId;

/// A base resume stored upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: ResumeId,
    pub name: String,
    pub created_at: NaiveDateTime,
}
