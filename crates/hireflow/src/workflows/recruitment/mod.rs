//! Recruitment intake: CV parsing boundary, auto-screening, fitness scoring,
//! and interview slot scheduling.
//!
//! The screening engine and the scheduler are deliberately pure; everything
//! stateful goes through the repository traits so the pipeline can be
//! exercised in isolation.

pub mod cv;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scheduling;
pub mod screening;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use cv::{CvExtractor, CvFormat, merge_answers};
pub use domain::{
    AnswerSet, AnswerValue, ApplicantId, ApplicantStatus, Criterion, CriterionKind, CvDocument,
    FactSheet, InterviewSlot, JobId, JobProfile,
};
pub use repository::{
    ApplicantRecord, ApplicantRepository, ApplicantStatusView, JobDirectory, RepositoryError,
    ScheduleRepository,
};
pub use router::recruitment_router;
pub use scheduling::{InterviewWindow, ScheduleAssignment, SchedulingError, assign_slots};
pub use screening::{
    CvIngest, DEFAULT_SCORE_THRESHOLD, LogEntry, SCORE_THRESHOLD_LABEL, ScreeningEngine,
    ScreeningLog, ScreeningStatus, ScreeningVerdict, VerdictPolicy, preprocess_answers,
};
pub use scoring::{
    FitnessScore, GenerativeClient, GenerativeScorer, HeuristicScorer, ModelScorer, ScoreError,
    ScoreModel, ScoreProvider,
};
pub use service::{
    ApplicationSubmission, RecruitmentService, RescreenOutcome, SchedulingReport, ServiceError,
    SubmissionOutcome,
};
