use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use tracing::warn;

use super::domain::{ApplicantId, JobProfile};

/// Fully specified interview window for one job, in the job's local zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_start: NaiveTime,
    pub daily_end: NaiveTime,
    pub duration_minutes: u32,
    pub utc_offset: chrono::FixedOffset,
}

/// Configuration errors reported to the caller; never retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("interview window is incomplete: missing {field}")]
    IncompleteWindow { field: &'static str },
    #[error("interview duration must be positive")]
    ZeroDuration,
    #[error("interview window ends before it starts")]
    InvertedWindow,
}

impl InterviewWindow {
    /// Validate a job's window configuration. Every field is required.
    pub fn from_job(job: &JobProfile) -> Result<Self, SchedulingError> {
        let start_date = job
            .start_date
            .ok_or(SchedulingError::IncompleteWindow { field: "start_date" })?;
        let end_date = job
            .end_date
            .ok_or(SchedulingError::IncompleteWindow { field: "end_date" })?;
        let daily_start = job
            .daily_start_time
            .ok_or(SchedulingError::IncompleteWindow {
                field: "daily_start_time",
            })?;
        let daily_end = job
            .daily_end_time
            .ok_or(SchedulingError::IncompleteWindow {
                field: "daily_end_time",
            })?;
        let duration_minutes =
            job.interview_duration_minutes
                .ok_or(SchedulingError::IncompleteWindow {
                    field: "interview_duration_minutes",
                })?;

        if duration_minutes == 0 {
            return Err(SchedulingError::ZeroDuration);
        }
        if end_date < start_date || daily_end <= daily_start {
            return Err(SchedulingError::InvertedWindow);
        }

        Ok(Self {
            start_date,
            end_date,
            daily_start,
            daily_end,
            duration_minutes,
            utc_offset: job.utc_offset(),
        })
    }

    fn duration(&self) -> Duration {
        Duration::minutes(self.duration_minutes as i64)
    }

    fn to_utc(&self, local: chrono::NaiveDateTime) -> DateTime<Utc> {
        DateTime::<Utc>::from_naive_utc_and_offset(local - self.utc_offset, Utc)
    }
}

/// Slot assignment for one scheduling pass. Applicants the window could not
/// hold are reported, never silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleAssignment {
    pub scheduled: Vec<(ApplicantId, DateTime<Utc>)>,
    pub unplaced: Vec<ApplicantId>,
}

/// Pack applicants into the earliest non-conflicting slots, in order.
///
/// A cursor walks the window in duration increments, skipping already-booked
/// times, rolling to the next day's start when the daily window is exhausted,
/// and giving up on an applicant once the cursor passes `end_date`. The
/// remaining applicants are still attempted individually so each failure is
/// reported on its own.
pub fn assign_slots(
    window: &InterviewWindow,
    applicants: &[ApplicantId],
    booked: &BTreeSet<DateTime<Utc>>,
) -> ScheduleAssignment {
    let duration = window.duration();
    let mut taken = booked.clone();
    let mut assignment = ScheduleAssignment::default();
    let mut cursor = window.start_date.and_time(window.daily_start);

    for applicant in applicants {
        let placed = loop {
            if cursor.date() > window.end_date {
                break None;
            }

            let slot_end = cursor + duration;
            let fits_today = cursor.time() >= window.daily_start
                && slot_end.date() == cursor.date()
                && slot_end.time() <= window.daily_end;
            if !fits_today {
                let next_day = match cursor.date().succ_opt() {
                    Some(day) => day,
                    None => break None,
                };
                cursor = next_day.and_time(window.daily_start);
                continue;
            }

            let start_utc = window.to_utc(cursor);
            cursor += duration;
            if taken.contains(&start_utc) {
                continue;
            }

            taken.insert(start_utc);
            break Some(start_utc);
        };

        match placed {
            Some(start_utc) => assignment
                .scheduled
                .push((applicant.clone(), start_utc)),
            None => {
                warn!(applicant = %applicant.0, "no interview slot available inside the window");
                assignment.unplaced.push(applicant.clone());
            }
        }
    }

    assignment
}
