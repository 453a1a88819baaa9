//! Strongly typed upstream identifiers.
//!
//! The pipeline API numbers jobs, resumes and applications independently, so a
//! bare integer is easy to pass to the wrong map. Each id is a transparent
//! wrapper: it serializes as the plain integer the upstream expects.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! upstream_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

upstream_id!(
    /// Identifier of a job posting.
    JobId
);
upstream_id!(
    /// Identifier of an uploaded base resume.
    ResumeId
);
upstream_id!(
    /// Identifier of an application (a job/resume pairing).
    ApplicationId
);
