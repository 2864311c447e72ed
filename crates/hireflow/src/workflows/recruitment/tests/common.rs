use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::workflows::recruitment::cv::{CvExtractor, CvFormat};
use crate::workflows::recruitment::domain::{
    AnswerSet, AnswerValue, ApplicantId, ApplicantStatus, Criterion, CriterionKind, CvDocument,
    FactSheet, InterviewSlot, JobId, JobProfile,
};
use crate::workflows::recruitment::repository::{
    ApplicantRecord, ApplicantRepository, JobDirectory, RepositoryError, ScheduleRepository,
};
use crate::workflows::recruitment::scoring::{FitnessScore, ScoreError, ScoreProvider};
use crate::workflows::recruitment::service::{ApplicationSubmission, RecruitmentService};
use crate::workflows::recruitment::{VerdictPolicy, recruitment_router};

pub(super) fn criterion(
    label: &str,
    kind: CriterionKind,
    criteria: &str,
    required: bool,
) -> Criterion {
    Criterion {
        label: label.to_string(),
        kind,
        criteria: criteria.to_string(),
        required,
        is_auto: false,
    }
}

pub(super) fn default_criteria() -> Vec<Criterion> {
    vec![
        criterion("age", CriterionKind::Number, ">=25", true),
        criterion("location", CriterionKind::Text, "jakarta, bandung", false),
        criterion("ai_score_threshold", CriterionKind::Number, "70", false),
    ]
}

/// Job with a one-day window holding exactly three 60-minute slots.
pub(super) fn job() -> JobProfile {
    JobProfile {
        id: JobId("job-001".to_string()),
        title: "Data Scientist".to_string(),
        description: "Analytics team".to_string(),
        criteria: default_criteria(),
        start_date: NaiveDate::from_ymd_opt(2026, 3, 2),
        end_date: NaiveDate::from_ymd_opt(2026, 3, 2),
        daily_start_time: NaiveTime::from_hms_opt(9, 0, 0),
        daily_end_time: NaiveTime::from_hms_opt(12, 0, 0),
        interview_duration_minutes: Some(60),
        utc_offset_minutes: 0,
    }
}

pub(super) fn job_without_window() -> JobProfile {
    JobProfile {
        start_date: None,
        end_date: None,
        daily_start_time: None,
        daily_end_time: None,
        interview_duration_minutes: None,
        ..job()
    }
}

pub(super) fn passing_answers() -> AnswerSet {
    let mut answers = AnswerSet::new();
    answers.insert("age".to_string(), AnswerValue::Text("30".to_string()));
    answers.insert(
        "location".to_string(),
        AnswerValue::Text("Jakarta".to_string()),
    );
    answers
}

pub(super) fn failing_answers() -> AnswerSet {
    let mut answers = AnswerSet::new();
    answers.insert("age".to_string(), AnswerValue::Text("21".to_string()));
    answers.insert(
        "location".to_string(),
        AnswerValue::Text("Surabaya".to_string()),
    );
    answers
}

pub(super) fn submission(answers: AnswerSet) -> ApplicationSubmission {
    ApplicationSubmission {
        job_id: JobId("job-001".to_string()),
        name: "Sari Wijaya".to_string(),
        email: "sari@example.com".to_string(),
        answers,
        cv: Some(CvDocument {
            file_name: "cv.pdf".to_string(),
            bytes: b"stub".to_vec(),
        }),
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryJobs {
    jobs: Arc<Mutex<HashMap<JobId, JobProfile>>>,
}

impl MemoryJobs {
    pub(super) fn with(job: JobProfile) -> Self {
        let store = Self::default();
        store
            .jobs
            .lock()
            .expect("job mutex poisoned")
            .insert(job.id.clone(), job);
        store
    }
}

impl JobDirectory for MemoryJobs {
    fn fetch(&self, id: &JobId) -> Result<Option<JobProfile>, RepositoryError> {
        Ok(self.jobs.lock().expect("job mutex poisoned").get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplicants {
    records: Arc<Mutex<HashMap<ApplicantId, ApplicantRecord>>>,
}

impl MemoryApplicants {
    pub(super) fn seed(&self, record: ApplicantRecord) {
        self.records
            .lock()
            .expect("applicant mutex poisoned")
            .insert(record.id.clone(), record);
    }
}

impl ApplicantRepository for MemoryApplicants {
    fn insert(&self, record: ApplicantRecord) -> Result<ApplicantRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("applicant mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ApplicantRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("applicant mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("applicant mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn passing_unscheduled(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<ApplicantRecord>, RepositoryError> {
        let guard = self.records.lock().expect("applicant mutex poisoned");
        let mut pending: Vec<ApplicantRecord> = guard
            .values()
            .filter(|record| {
                record.job_id == *job_id && record.status == ApplicantStatus::Shortlisted
            })
            .cloned()
            .collect();
        pending.sort_by_key(|record| record.applied_at);
        Ok(pending)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySchedules {
    slots: Arc<Mutex<HashMap<ApplicantId, InterviewSlot>>>,
}

impl MemorySchedules {
    pub(super) fn all(&self) -> Vec<InterviewSlot> {
        self.slots
            .lock()
            .expect("schedule mutex poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl ScheduleRepository for MemorySchedules {
    fn insert(&self, slot: InterviewSlot) -> Result<(), RepositoryError> {
        let mut guard = self.slots.lock().expect("schedule mutex poisoned");
        let taken = guard
            .values()
            .any(|existing| existing.job_id == slot.job_id && existing.start_time == slot.start_time);
        if taken || guard.contains_key(&slot.applicant_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(slot.applicant_id.clone(), slot);
        Ok(())
    }

    fn fetch(&self, applicant_id: &ApplicantId) -> Result<Option<InterviewSlot>, RepositoryError> {
        let guard = self.slots.lock().expect("schedule mutex poisoned");
        Ok(guard.get(applicant_id).cloned())
    }

    fn remove(&self, applicant_id: &ApplicantId) -> Result<Option<InterviewSlot>, RepositoryError> {
        let mut guard = self.slots.lock().expect("schedule mutex poisoned");
        Ok(guard.remove(applicant_id))
    }

    fn booked_times(&self, job_id: &JobId) -> Result<Vec<DateTime<Utc>>, RepositoryError> {
        let guard = self.slots.lock().expect("schedule mutex poisoned");
        Ok(guard
            .values()
            .filter(|slot| slot.job_id == *job_id)
            .map(|slot| slot.start_time)
            .collect())
    }
}

/// Scorer returning a fixed score, or a transport error when `score` is None.
pub(super) struct StubScorer {
    pub(super) score: Option<f64>,
}

impl ScoreProvider for StubScorer {
    fn score(&self, _facts: &FactSheet, _job: &JobProfile) -> Result<FitnessScore, ScoreError> {
        match self.score {
            Some(score) => Ok(FitnessScore {
                score,
                reason: "stub".to_string(),
            }),
            None => Err(ScoreError::Transport("stub offline".to_string())),
        }
    }
}

/// Extractor treating any payload as plain text and returning a canned sheet.
pub(super) struct StubCvExtractor;

impl CvExtractor for StubCvExtractor {
    fn extract_text(&self, _bytes: &[u8], _format: CvFormat) -> Option<String> {
        Some("stub cv text".to_string())
    }

    fn build_fact_sheet(&self, _text: &str) -> FactSheet {
        FactSheet {
            skills: vec!["python".to_string(), "sql".to_string()],
            experience_years: 5,
            education: Some("B.Sc".to_string()),
            projects_count: 3,
            ..FactSheet::default()
        }
    }
}

/// Extractor whose text extraction always fails.
pub(super) struct BrokenCvExtractor;

impl CvExtractor for BrokenCvExtractor {
    fn extract_text(&self, _bytes: &[u8], _format: CvFormat) -> Option<String> {
        None
    }

    fn build_fact_sheet(&self, _text: &str) -> FactSheet {
        FactSheet::default()
    }
}

pub(super) type TestService = RecruitmentService<MemoryJobs, MemoryApplicants, MemorySchedules>;

pub(super) fn build_service(
    job: JobProfile,
    score: Option<f64>,
) -> (Arc<TestService>, Arc<MemoryApplicants>, Arc<MemorySchedules>) {
    let jobs = Arc::new(MemoryJobs::with(job));
    let applicants = Arc::new(MemoryApplicants::default());
    let schedules = Arc::new(MemorySchedules::default());
    let service = Arc::new(RecruitmentService::new(
        jobs,
        applicants.clone(),
        schedules.clone(),
        Arc::new(StubScorer { score }),
        Arc::new(StubCvExtractor),
        VerdictPolicy::BucketBased,
    ));
    (service, applicants, schedules)
}

pub(super) fn router_with_service(service: Arc<TestService>) -> axum::Router {
    recruitment_router(service)
}

pub(super) async fn read_json_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn shortlisted_record(suffix: &str, applied_at: DateTime<Utc>) -> ApplicantRecord {
    ApplicantRecord {
        id: ApplicantId(format!("seed-{suffix}")),
        job_id: JobId("job-001".to_string()),
        name: format!("Applicant {suffix}"),
        email: format!("{suffix}@example.com"),
        answers: passing_answers(),
        status: ApplicantStatus::Shortlisted,
        screening: None,
        ai_score: Some(80),
        final_score: None,
        fact_sheet: None,
        applied_at,
    }
}
