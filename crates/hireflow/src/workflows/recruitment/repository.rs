use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AnswerSet, ApplicantId, ApplicantStatus, FactSheet, InterviewSlot, JobId, JobProfile,
};
use super::screening::ScreeningVerdict;

/// Persisted applicant row: submission data plus the latest screening result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub id: ApplicantId,
    pub job_id: JobId,
    pub name: String,
    pub email: String,
    pub answers: AnswerSet,
    pub status: ApplicantStatus,
    pub screening: Option<ScreeningVerdict>,
    /// Rounded fitness score as stored (the verdict keeps the raw value).
    pub ai_score: Option<i32>,
    pub final_score: Option<i32>,
    /// Fact sheet from the last successful CV parse, reused on rescreen.
    pub fact_sheet: Option<FactSheet>,
    pub applied_at: DateTime<Utc>,
}

impl ApplicantRecord {
    pub fn status_view(&self) -> ApplicantStatusView {
        ApplicantStatusView {
            applicant_id: self.id.clone(),
            status: self.status.label(),
            screening_status: self
                .screening
                .as_ref()
                .map(|verdict| verdict.status.label()),
            ai_score: self.ai_score,
            final_score: self.final_score,
        }
    }
}

/// Sanitized representation of an applicant's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantStatusView {
    pub applicant_id: ApplicantId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screening_status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<i32>,
}

/// Error enumeration for persistence failures. These surface to the caller
/// as hard failures; nothing is durable until a write succeeds.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Read access to job postings and their criteria.
pub trait JobDirectory: Send + Sync {
    fn fetch(&self, id: &JobId) -> Result<Option<JobProfile>, RepositoryError>;
}

/// Storage abstraction for applicant records.
pub trait ApplicantRepository: Send + Sync {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError>;
    fn update(&self, record: ApplicantRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError>;
    /// Shortlisted applicants without a slot, ordered by application time
    /// (first-applied, first-scheduled).
    fn passing_unscheduled(&self, job_id: &JobId) -> Result<Vec<ApplicantRecord>, RepositoryError>;
}

/// Storage abstraction for interview slots. Implementations enforce the
/// `(job_id, start_time)` uniqueness with a Conflict error.
pub trait ScheduleRepository: Send + Sync {
    fn insert(&self, slot: InterviewSlot) -> Result<(), RepositoryError>;
    fn fetch(&self, applicant_id: &ApplicantId) -> Result<Option<InterviewSlot>, RepositoryError>;
    fn remove(&self, applicant_id: &ApplicantId) -> Result<Option<InterviewSlot>, RepositoryError>;
    fn booked_times(&self, job_id: &JobId) -> Result<Vec<DateTime<Utc>>, RepositoryError>;
}
