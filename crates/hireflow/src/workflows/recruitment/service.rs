use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::cv::{CvExtractor, CvFormat, merge_answers};
use super::domain::{
    AnswerSet, ApplicantId, ApplicantStatus, CvDocument, FactSheet, InterviewSlot, JobId,
    JobProfile,
};
use super::repository::{
    ApplicantRecord, ApplicantRepository, JobDirectory, RepositoryError, ScheduleRepository,
};
use super::scheduling::{InterviewWindow, SchedulingError, assign_slots};
use super::screening::{
    CvIngest, ScreeningEngine, ScreeningStatus, ScreeningVerdict, VerdictPolicy,
    preprocess_answers,
};
use super::scoring::ScoreProvider;

/// Inbound application payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSubmission {
    pub job_id: JobId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub answers: AnswerSet,
    #[serde(default)]
    pub cv: Option<CvDocument>,
}

/// Result of one scheduling pass over a job's shortlisted applicants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingReport {
    pub job_id: JobId,
    pub scheduled: Vec<InterviewSlot>,
    pub unplaced: Vec<ApplicantId>,
}

/// What one submission produced: the stored record (carrying its verdict)
/// plus the synchronous scheduling pass triggered by a Pass verdict.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub record: ApplicantRecord,
    pub scheduling: Option<SchedulingReport>,
    pub scheduling_error: Option<String>,
}

/// Result of rescreening an existing applicant.
#[derive(Debug)]
pub struct RescreenOutcome {
    pub record: ApplicantRecord,
    pub scheduling: Option<SchedulingReport>,
}

/// Error raised by the recruitment service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("job not found")]
    JobNotFound,
    #[error("applicant not found")]
    ApplicantNotFound,
    #[error("interview slot not found")]
    SlotNotFound,
    #[error("interview time already booked")]
    SlotTaken,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
}

static APPLICANT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_applicant_id() -> ApplicantId {
    let id = APPLICANT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicantId(format!("cand-{id:06}"))
}

/// Service composing screening, scoring, CV extraction, and scheduling over
/// injected persistence boundaries.
pub struct RecruitmentService<J, A, S> {
    jobs: Arc<J>,
    applicants: Arc<A>,
    schedules: Arc<S>,
    scorer: Arc<dyn ScoreProvider>,
    cv_extractor: Arc<dyn CvExtractor>,
    engine: ScreeningEngine,
    /// One lock per job serializes slot booking with status updates; two
    /// concurrent passes must not race on the booked set.
    scheduling_locks: Mutex<HashMap<JobId, Arc<Mutex<()>>>>,
}

impl<J, A, S> RecruitmentService<J, A, S>
where
    J: JobDirectory + 'static,
    A: ApplicantRepository + 'static,
    S: ScheduleRepository + 'static,
{
    pub fn new(
        jobs: Arc<J>,
        applicants: Arc<A>,
        schedules: Arc<S>,
        scorer: Arc<dyn ScoreProvider>,
        cv_extractor: Arc<dyn CvExtractor>,
        policy: VerdictPolicy,
    ) -> Self {
        Self {
            jobs,
            applicants,
            schedules,
            scorer,
            cv_extractor,
            engine: ScreeningEngine::new(policy),
            scheduling_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Submit a new application: parse the CV, score, screen, persist, and
    /// on a Pass verdict synchronously run the scheduler for the job.
    pub fn submit(
        &self,
        submission: ApplicationSubmission,
    ) -> Result<SubmissionOutcome, ServiceError> {
        let job = self
            .jobs
            .fetch(&submission.job_id)?
            .ok_or(ServiceError::JobNotFound)?;

        let (facts, cv_ingest) = self.ingest_cv(submission.cv.as_ref());
        let verdict = self.screen(&job, &submission.answers, facts.as_ref(), cv_ingest);
        let status = applicant_status_for(verdict.status);

        let record = ApplicantRecord {
            id: next_applicant_id(),
            job_id: job.id.clone(),
            name: submission.name,
            email: submission.email,
            answers: submission.answers,
            status,
            ai_score: verdict.ai_score.map(round_score),
            final_score: verdict.final_score.map(round_score),
            screening: Some(verdict),
            fact_sheet: facts,
            applied_at: Utc::now(),
        };

        // Trace the verdict before persisting so the run is never silently
        // lost when the write fails.
        info!(
            applicant = %record.id.0,
            job = %record.job_id.0,
            status = record.status.label(),
            ai_score = ?record.ai_score,
            "screening verdict"
        );

        let record = self.applicants.insert(record)?;

        let (scheduling, scheduling_error) = if record.status == ApplicantStatus::Shortlisted {
            self.try_schedule(&job)
        } else {
            (None, None)
        };

        // The applicant just inserted may have been re-read during the
        // scheduling pass; reflect its final status in the outcome.
        let record = self
            .applicants
            .fetch(&record.id)?
            .ok_or(ServiceError::ApplicantNotFound)?;

        Ok(SubmissionOutcome {
            record,
            scheduling,
            scheduling_error,
        })
    }

    /// Re-run screening for a stored applicant, replacing status, log, and
    /// scores. Facts come from the stored sheet; file storage is external.
    /// An existing booking is kept while the verdict passes and released
    /// when it no longer does.
    pub fn rescreen(&self, applicant_id: &ApplicantId) -> Result<RescreenOutcome, ServiceError> {
        let mut record = self
            .applicants
            .fetch(applicant_id)?
            .ok_or(ServiceError::ApplicantNotFound)?;
        let job = self
            .jobs
            .fetch(&record.job_id)?
            .ok_or(ServiceError::JobNotFound)?;

        let cv_ingest = if record.fact_sheet.is_some() {
            CvIngest::Parsed
        } else {
            CvIngest::NotProvided
        };
        let facts = record.fact_sheet.clone();
        let verdict = self.screen(&job, &record.answers, facts.as_ref(), cv_ingest);

        let mut status = applicant_status_for(verdict.status);
        if self.schedules.fetch(applicant_id)?.is_some() {
            if status == ApplicantStatus::Shortlisted {
                // An existing booking survives a still-passing verdict; the
                // applicant must never re-enter the pending queue.
                status = ApplicantStatus::Scheduled;
            } else {
                let lock = self.job_lock(&record.job_id);
                let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
                self.schedules.remove(applicant_id)?;
                info!(
                    applicant = %applicant_id.0,
                    "verdict no longer passes, interview slot released"
                );
            }
        }

        record.status = status;
        record.ai_score = verdict.ai_score.map(round_score);
        record.final_score = verdict.final_score.map(round_score);
        record.screening = Some(verdict);

        info!(
            applicant = %record.id.0,
            status = record.status.label(),
            "rescreen verdict"
        );
        self.applicants.update(record.clone())?;

        let scheduling = if record.status == ApplicantStatus::Shortlisted {
            self.try_schedule(&job).0
        } else {
            None
        };

        let record = self
            .applicants
            .fetch(applicant_id)?
            .ok_or(ServiceError::ApplicantNotFound)?;

        Ok(RescreenOutcome { record, scheduling })
    }

    /// Fetch an applicant record for API responses.
    pub fn get(&self, applicant_id: &ApplicantId) -> Result<ApplicantRecord, ServiceError> {
        self.applicants
            .fetch(applicant_id)?
            .ok_or(ServiceError::ApplicantNotFound)
    }

    /// Run one scheduling pass for a job: place every shortlisted,
    /// not-yet-scheduled applicant into the earliest free slot.
    ///
    /// Idempotent: already-booked times are skipped and already-scheduled
    /// applicants are never fed back in.
    pub fn schedule_job(&self, job_id: &JobId) -> Result<SchedulingReport, ServiceError> {
        let job = self.jobs.fetch(job_id)?.ok_or(ServiceError::JobNotFound)?;
        self.run_scheduling_pass(&job)
    }

    /// Move one existing slot to a new time without re-running the batch.
    pub fn reschedule(
        &self,
        applicant_id: &ApplicantId,
        new_time: DateTime<Utc>,
    ) -> Result<InterviewSlot, ServiceError> {
        let current = self
            .schedules
            .fetch(applicant_id)?
            .ok_or(ServiceError::SlotNotFound)?;

        let lock = self.job_lock(&current.job_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let booked = self.schedules.booked_times(&current.job_id)?;
        if booked
            .iter()
            .any(|time| *time == new_time && *time != current.start_time)
        {
            return Err(ServiceError::SlotTaken);
        }

        self.schedules.remove(applicant_id)?;
        let slot = InterviewSlot {
            applicant_id: applicant_id.clone(),
            job_id: current.job_id,
            start_time: new_time,
        };
        self.schedules.insert(slot.clone())?;
        info!(applicant = %applicant_id.0, time = %new_time, "interview rescheduled");
        Ok(slot)
    }

    /// Remove an applicant's slot and return them to the shortlist so the
    /// next scheduling pass picks them up again.
    pub fn cancel_slot(&self, applicant_id: &ApplicantId) -> Result<(), ServiceError> {
        let mut record = self
            .applicants
            .fetch(applicant_id)?
            .ok_or(ServiceError::ApplicantNotFound)?;

        let lock = self.job_lock(&record.job_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.schedules
            .remove(applicant_id)?
            .ok_or(ServiceError::SlotNotFound)?;
        record.status = ApplicantStatus::Shortlisted;
        self.applicants.update(record)?;
        info!(applicant = %applicant_id.0, "interview slot cancelled, applicant requeued");
        Ok(())
    }

    /// Score and screen outside any lock; collaborator failures degrade to
    /// "no score" and the engine records the gap as Review evidence.
    fn screen(
        &self,
        job: &JobProfile,
        answers: &AnswerSet,
        facts: Option<&FactSheet>,
        cv_ingest: CvIngest,
    ) -> ScreeningVerdict {
        let fitness = facts.and_then(|sheet| match self.scorer.score(sheet, job) {
            Ok(fitness) => Some(fitness.score),
            Err(error) => {
                warn!(%error, job = %job.id.0, "fitness scoring failed, screening without a score");
                None
            }
        });

        let merged = merge_answers(answers, facts);
        let processed = preprocess_answers(&job.criteria, &merged);
        self.engine.run(&job.criteria, &processed, fitness, cv_ingest)
    }

    fn ingest_cv(&self, cv: Option<&CvDocument>) -> (Option<FactSheet>, CvIngest) {
        let Some(document) = cv else {
            return (None, CvIngest::NotProvided);
        };

        let extracted = CvFormat::from_file_name(&document.file_name)
            .and_then(|format| self.cv_extractor.extract_text(&document.bytes, format));

        match extracted {
            Some(text) => {
                let sheet = self.cv_extractor.build_fact_sheet(&text);
                (Some(sheet), CvIngest::Parsed)
            }
            None => {
                warn!(file = %document.file_name, "CV text extraction failed");
                (None, CvIngest::Failed)
            }
        }
    }

    /// Scheduling attempt that never fails the surrounding screening flow:
    /// window configuration errors are reported, not escalated.
    fn try_schedule(&self, job: &JobProfile) -> (Option<SchedulingReport>, Option<String>) {
        match self.run_scheduling_pass(job) {
            Ok(report) => (Some(report), None),
            Err(error) => {
                warn!(job = %job.id.0, %error, "scheduling pass not run");
                (None, Some(error.to_string()))
            }
        }
    }

    fn run_scheduling_pass(&self, job: &JobProfile) -> Result<SchedulingReport, ServiceError> {
        let window = InterviewWindow::from_job(job)?;

        let lock = self.job_lock(&job.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let booked: BTreeSet<DateTime<Utc>> =
            self.schedules.booked_times(&job.id)?.into_iter().collect();
        let pending = self.applicants.passing_unscheduled(&job.id)?;
        let order: Vec<ApplicantId> = pending.iter().map(|record| record.id.clone()).collect();

        let assignment = assign_slots(&window, &order, &booked);

        let mut scheduled = Vec::with_capacity(assignment.scheduled.len());
        for (applicant_id, start_time) in assignment.scheduled {
            let slot = InterviewSlot {
                applicant_id: applicant_id.clone(),
                job_id: job.id.clone(),
                start_time,
            };
            // Booking and the status transition form one unit under the job
            // lock; a failure here aborts the pass and surfaces to the caller.
            self.schedules.insert(slot.clone())?;
            if let Some(mut record) = pending
                .iter()
                .find(|record| record.id == applicant_id)
                .cloned()
            {
                record.status = ApplicantStatus::Scheduled;
                self.applicants.update(record)?;
            }
            info!(applicant = %applicant_id.0, job = %job.id.0, time = %start_time, "interview booked");
            scheduled.push(slot);
        }

        Ok(SchedulingReport {
            job_id: job.id.clone(),
            scheduled,
            unplaced: assignment.unplaced,
        })
    }

    fn job_lock(&self, job_id: &JobId) -> Arc<Mutex<()>> {
        // The locks guard no data of their own, so a guard recovered from a
        // poisoned mutex is as good as a clean one.
        let mut locks = self
            .scheduling_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(job_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn applicant_status_for(status: ScreeningStatus) -> ApplicantStatus {
    match status {
        ScreeningStatus::Pass => ApplicantStatus::Shortlisted,
        ScreeningStatus::Fail => ApplicantStatus::Rejected,
        ScreeningStatus::NeedsReview => ApplicantStatus::NeedsReview,
    }
}

fn round_score(score: f64) -> i32 {
    score.round() as i32
}
