use std::collections::BTreeMap;
use std::fmt;

use chrono::offset::Offset;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for submitted applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Value types an admin can attach to a screening criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionKind {
    Number,
    Text,
    Boolean,
}

/// One admin-authored screening rule attached to a job.
///
/// The `label` doubles as the lookup key into the applicant's answer set.
/// Criteria are read-only during screening; the engine never mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: CriterionKind,
    #[serde(default)]
    pub criteria: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub is_auto: bool,
}

/// Raw applicant-submitted value, or a CV-derived fact merged under a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AnswerValue {
    /// Numeric view of the answer; text parses when it holds a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(value) => Some(*value),
            AnswerValue::Text(raw) => raw.trim().parse::<f64>().ok(),
            AnswerValue::Bool(_) => None,
        }
    }

    /// An answer is "empty" only when it is an empty text value. Numbers and
    /// booleans always count as answered.
    pub fn is_empty(&self) -> bool {
        matches!(self, AnswerValue::Text(raw) if raw.is_empty())
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Bool(value) => write!(f, "{value}"),
            AnswerValue::Number(value) => write!(f, "{value}"),
            AnswerValue::Text(value) => write!(f, "{value}"),
        }
    }
}

/// Merged view of applicant-submitted answers and CV-derived facts, keyed by
/// criterion label. BTreeMap keeps screening iteration deterministic.
pub type AnswerSet = BTreeMap<String, AnswerValue>;

/// Normalized facts extracted from a CV by the external parser. Missing
/// fields default to empty/zero/None; an empty CV yields the empty sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactSheet {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: u32,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub projects_count: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Job posting snapshot consumed by screening and scheduling.
///
/// The interview window fields are optional at rest: a job without a complete
/// window simply cannot be scheduled yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    pub id: JobId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub daily_start_time: Option<NaiveTime>,
    #[serde(default)]
    pub daily_end_time: Option<NaiveTime>,
    #[serde(default)]
    pub interview_duration_minutes: Option<u32>,
    /// Local zone the window fields are expressed in, as minutes east of UTC.
    /// Slots are always stored in UTC.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl JobProfile {
    /// Offset of the job's local interview zone. Out-of-range configuration
    /// falls back to UTC rather than failing the whole job.
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// High level status tracked throughout the recruitment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicantStatus {
    Applied,
    Shortlisted,
    Rejected,
    NeedsReview,
    Scheduled,
}

impl ApplicantStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicantStatus::Applied => "applied",
            ApplicantStatus::Shortlisted => "shortlisted",
            ApplicantStatus::Rejected => "rejected",
            ApplicantStatus::NeedsReview => "needs_review",
            ApplicantStatus::Scheduled => "scheduled",
        }
    }
}

/// Uploaded CV document as received at the submission boundary. Text
/// extraction is format-specific and best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvDocument {
    pub file_name: String,
    #[serde(default)]
    pub bytes: Vec<u8>,
}

/// One unique interview time reserved for one applicant within a job's
/// configured window. `(job_id, start_time)` is unique per job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewSlot {
    pub applicant_id: ApplicantId,
    pub job_id: JobId,
    pub start_time: DateTime<Utc>,
}
