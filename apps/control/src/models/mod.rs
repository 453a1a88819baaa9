pub mod application;
pub mod ids;
pub mod job;
pub mod resume;

pub use application::{ApplicationRecord, AtsGrade};
pub use ids::{ApplicationId, JobId, ResumeId};
pub use job::JobRecord;
pub use resume::ResumeRecord;
