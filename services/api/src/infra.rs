use chrono::{Duration, Local, NaiveTime};
use hireflow::workflows::recruitment::{
    ApplicantId, ApplicantRecord, ApplicantRepository, ApplicantStatus, Criterion,
    CriterionKind, CvExtractor, CvFormat, FactSheet, InterviewSlot, JobDirectory, JobId,
    JobProfile, RepositoryError, ScheduleRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobDirectory {
    jobs: Arc<Mutex<HashMap<JobId, JobProfile>>>,
}

impl InMemoryJobDirectory {
    pub(crate) fn seeded() -> Self {
        let directory = Self::default();
        {
            let mut guard = directory.jobs.lock().expect("job mutex poisoned");
            for job in default_jobs() {
                guard.insert(job.id.clone(), job);
            }
        }
        directory
    }
}

impl JobDirectory for InMemoryJobDirectory {
    fn fetch(&self, id: &JobId) -> Result<Option<JobProfile>, RepositoryError> {
        let guard = self.jobs.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicantRepository {
    records: Arc<Mutex<HashMap<ApplicantId, ApplicantRecord>>>,
}

impl ApplicantRepository for InMemoryApplicantRepository {
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

    fn passing_unscheduled(&self, job_id: &JobId) -> Result<Vec<ApplicantRecord>, RepositoryError> {
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
pub(crate) struct InMemoryScheduleRepository {
    slots: Arc<Mutex<HashMap<ApplicantId, InterviewSlot>>>,
}

impl ScheduleRepository for InMemoryScheduleRepository {
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

    fn booked_times(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<chrono::DateTime<chrono::Utc>>, RepositoryError> {
        let guard = self.slots.lock().expect("schedule mutex poisoned");
        Ok(guard
            .values()
            .filter(|slot| slot.job_id == *job_id)
            .map(|slot| slot.start_time)
            .collect())
    }
}

const KNOWN_SKILLS: &[&str] = &[
    "python", "sql", "rust", "java", "javascript", "spark", "airflow", "docker", "kubernetes",
    "excel", "tableau", "tensorflow", "pytorch",
];

const KNOWN_DEGREES: &[(&str, &str)] = &[
    ("phd", "PhD"),
    ("m.tech", "M.Tech"),
    ("mba", "MBA"),
    ("b.tech", "B.Tech"),
    ("b.sc", "B.Sc"),
];

/// Keyword-driven extractor standing in for the external CV parsing service.
/// It reads UTF-8 payloads only; binary formats need the real deployment.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KeywordCvExtractor;

impl CvExtractor for KeywordCvExtractor {
    fn extract_text(&self, bytes: &[u8], _format: CvFormat) -> Option<String> {
        String::from_utf8(bytes.to_vec()).ok()
    }

    fn build_fact_sheet(&self, text: &str) -> FactSheet {
        let lower = text.to_lowercase();

        let skills: Vec<String> = KNOWN_SKILLS
            .iter()
            .filter(|skill| lower.contains(*skill))
            .map(|skill| skill.to_string())
            .collect();

        let education = KNOWN_DEGREES
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, canonical)| canonical.to_string());

        // "<n> years" anywhere in the text sets the experience figure.
        let mut experience_years = 0u32;
        let tokens: Vec<&str> = lower.split_whitespace().collect();
        for pair in tokens.windows(2) {
            if pair[1].starts_with("year") {
                if let Ok(years) = pair[0].parse::<u32>() {
                    experience_years = experience_years.max(years);
                }
            }
        }

        let projects_count = lower.matches("project").count() as u32;

        FactSheet {
            skills,
            experience_years,
            education,
            projects_count,
            ..FactSheet::default()
        }
    }
}

/// Demo criteria mirroring a typical posting: a hard experience floor, a
/// location allow-list, and a tightened score threshold.
pub(crate) fn default_criteria() -> Vec<Criterion> {
    vec![
        Criterion {
            label: "experience_years".to_string(),
            kind: CriterionKind::Number,
            criteria: ">=3".to_string(),
            required: true,
            is_auto: true,
        },
        Criterion {
            label: "location".to_string(),
            kind: CriterionKind::Text,
            criteria: "jakarta, bandung, remote".to_string(),
            required: false,
            is_auto: true,
        },
        Criterion {
            label: "ai_score_threshold".to_string(),
            kind: CriterionKind::Number,
            criteria: "70".to_string(),
            required: false,
            is_auto: false,
        },
    ]
}

/// Seed postings for the in-memory directory. Interview windows start a week
/// out so a fresh process can always book slots.
pub(crate) fn default_jobs() -> Vec<JobProfile> {
    let start = Local::now().date_naive() + Duration::days(7);
    vec![
        JobProfile {
            id: JobId("ds-jakarta".to_string()),
            title: "Data Scientist".to_string(),
            description: "Analytics team, Jakarta office".to_string(),
            criteria: default_criteria(),
            start_date: Some(start),
            end_date: Some(start + Duration::days(4)),
            daily_start_time: NaiveTime::from_hms_opt(9, 0, 0),
            daily_end_time: NaiveTime::from_hms_opt(16, 0, 0),
            interview_duration_minutes: Some(45),
            utc_offset_minutes: 7 * 60,
        },
        JobProfile {
            id: JobId("be-remote".to_string()),
            title: "Backend Engineer".to_string(),
            description: "Platform team, remote".to_string(),
            criteria: default_criteria(),
            start_date: Some(start),
            end_date: Some(start + Duration::days(2)),
            daily_start_time: NaiveTime::from_hms_opt(13, 0, 0),
            daily_end_time: NaiveTime::from_hms_opt(17, 0, 0),
            interview_duration_minutes: Some(60),
            utc_offset_minutes: 0,
        },
    ]
}
