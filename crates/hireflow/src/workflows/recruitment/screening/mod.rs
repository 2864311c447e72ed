pub mod criteria;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{AnswerSet, AnswerValue, Criterion, CriterionKind};
use criteria::{CriterionStatus, evaluate_boolean, evaluate_number, evaluate_text};

/// Reserved criterion label carrying the fitness-score threshold. Never
/// evaluated as a rule; its `criteria` value overrides the default threshold.
pub const SCORE_THRESHOLD_LABEL: &str = "ai_score_threshold";

/// Threshold applied to the fitness score when the job does not override it.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 70.0;

/// Total points split evenly across `is_auto` criteria under the
/// weighted-point policy.
const AUTO_POINTS_TOTAL: f64 = 10.0;

/// Final status of one screening run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreeningStatus {
    Pass,
    Fail,
    NeedsReview,
}

impl ScreeningStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ScreeningStatus::Pass => "pass",
            ScreeningStatus::Fail => "fail",
            ScreeningStatus::NeedsReview => "needs_review",
        }
    }
}

/// One categorized evidence line in the screening log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub reason: String,
}

impl LogEntry {
    fn new(reason: String) -> Self {
        Self { reason }
    }
}

/// Three-bucket evidence log. Every evaluated criterion contributes exactly
/// one entry to exactly one bucket; skipped criteria contribute none.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreeningLog {
    pub passed: Vec<LogEntry>,
    pub failed: Vec<LogEntry>,
    pub review: Vec<LogEntry>,
}

/// Immutable output of one screening run. A rescreen produces a fresh verdict
/// that replaces the applicant's stored one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningVerdict {
    pub status: ScreeningStatus,
    pub log: ScreeningLog,
    pub ai_score: Option<f64>,
    pub final_score: Option<f64>,
}

/// How the final status is derived from the per-criterion results.
///
/// The two policies have diverging semantics and stay separate strategies,
/// never merged. `BucketBased` is the primary policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerdictPolicy {
    /// Fail if any Fail entries exist, else NeedsReview if any Review entries
    /// exist, else Pass.
    #[default]
    BucketBased,
    /// Only `is_auto` criteria contribute: each earns an equal share of ten
    /// points, added to the fitness score to form `final_score`. Pass iff
    /// `final_score >= threshold`, regardless of logged entries.
    WeightedPoints,
}

/// Whether a CV accompanied the submission and survived extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvIngest {
    Parsed,
    NotProvided,
    /// A CV was uploaded but text extraction or parsing failed; screening
    /// continues on submitted answers alone.
    Failed,
}

/// Coerce raw answers toward their criterion's declared type: number-typed
/// answers become numeric when parseable, text-typed answers are trimmed.
/// Coercion failures leave the original value untouched; this never fails.
pub fn preprocess_answers(criteria: &[Criterion], answers: &AnswerSet) -> AnswerSet {
    let mut processed = answers.clone();
    for criterion in criteria {
        let Some(raw) = answers.get(&criterion.label) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        match criterion.kind {
            CriterionKind::Number => {
                if let AnswerValue::Text(text) = raw {
                    if let Ok(value) = text.trim().parse::<f64>() {
                        processed.insert(criterion.label.clone(), AnswerValue::Number(value));
                    }
                }
            }
            CriterionKind::Text => {
                if let AnswerValue::Text(text) = raw {
                    processed.insert(
                        criterion.label.clone(),
                        AnswerValue::Text(text.trim().to_string()),
                    );
                }
            }
            CriterionKind::Boolean => {}
        }
    }
    processed
}

/// Stateless rule interpreter producing one verdict per run.
#[derive(Debug, Clone, Default)]
pub struct ScreeningEngine {
    policy: VerdictPolicy,
}

impl ScreeningEngine {
    pub fn new(policy: VerdictPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> VerdictPolicy {
        self.policy
    }

    /// Evaluate every criterion against the answer set and derive a verdict.
    ///
    /// Malformed criteria degrade to Review entries; this never fails and
    /// always returns a verdict with a log.
    pub fn run(
        &self,
        criteria: &[Criterion],
        answers: &AnswerSet,
        fitness_score: Option<f64>,
        cv: CvIngest,
    ) -> ScreeningVerdict {
        let mut log = ScreeningLog::default();
        let threshold = score_threshold(criteria);

        if matches!(cv, CvIngest::Failed) {
            log.review
                .push(LogEntry::new("CV could not be processed.".to_string()));
        }

        match fitness_score {
            Some(score) => {
                log.passed
                    .push(LogEntry::new(format!("AI score computed: {score}.")));
                if score < threshold {
                    log.failed.push(LogEntry::new(format!(
                        "AI score ({score}) is below the threshold ({threshold})."
                    )));
                }
            }
            None => {
                log.review
                    .push(LogEntry::new("No AI score available.".to_string()));
            }
        }

        let mut auto_total = 0usize;
        let mut auto_passed = 0usize;

        for criterion in criteria {
            if criterion.label == SCORE_THRESHOLD_LABEL {
                continue;
            }
            if criterion.is_auto {
                auto_total += 1;
            }

            let answer = answers.get(&criterion.label);

            if criterion.required && answer.map_or(true, AnswerValue::is_empty) {
                log.failed.push(LogEntry::new(format!(
                    "Answer for {} is missing or empty.",
                    criterion.label
                )));
                continue;
            }
            let Some(answer) = answer else {
                // Optional criterion with no answer at all: silent skip.
                continue;
            };
            if criterion.criteria.trim().is_empty() {
                log.review.push(LogEntry::new(format!(
                    "Criteria for {} is not defined.",
                    criterion.label
                )));
                continue;
            }

            let outcome = match criterion.kind {
                CriterionKind::Number => {
                    evaluate_number(answer, &criterion.criteria, &criterion.label)
                }
                CriterionKind::Text => evaluate_text(answer, &criterion.criteria, &criterion.label),
                CriterionKind::Boolean => {
                    evaluate_boolean(answer, &criterion.criteria, &criterion.label)
                }
            };

            match outcome.status {
                CriterionStatus::Pass => {
                    if criterion.is_auto {
                        auto_passed += 1;
                    }
                    log.passed.push(LogEntry::new(outcome.reason));
                }
                CriterionStatus::Fail => log.failed.push(LogEntry::new(outcome.reason)),
                CriterionStatus::Error => log.review.push(LogEntry::new(outcome.reason)),
            }
        }

        let (status, final_score) = match self.policy {
            VerdictPolicy::BucketBased => (derive_bucket_status(&log), None),
            VerdictPolicy::WeightedPoints => {
                let share = if auto_total > 0 {
                    AUTO_POINTS_TOTAL / auto_total as f64
                } else {
                    0.0
                };
                let final_score = fitness_score.unwrap_or(0.0) + share * auto_passed as f64;
                let status = if final_score >= threshold {
                    ScreeningStatus::Pass
                } else {
                    ScreeningStatus::Fail
                };
                (status, Some(final_score))
            }
        };

        debug!(
            status = status.label(),
            passed = log.passed.len(),
            failed = log.failed.len(),
            review = log.review.len(),
            "screening run complete"
        );

        ScreeningVerdict {
            status,
            log,
            ai_score: fitness_score,
            final_score,
        }
    }
}

fn derive_bucket_status(log: &ScreeningLog) -> ScreeningStatus {
    if !log.failed.is_empty() {
        ScreeningStatus::Fail
    } else if !log.review.is_empty() {
        ScreeningStatus::NeedsReview
    } else {
        ScreeningStatus::Pass
    }
}

/// Threshold gating the fitness score: the reserved criterion's value when
/// present and numeric, the default otherwise.
fn score_threshold(criteria: &[Criterion]) -> f64 {
    for criterion in criteria {
        if criterion.label == SCORE_THRESHOLD_LABEL && !criterion.criteria.trim().is_empty() {
            if let Ok(value) = criterion.criteria.trim().parse::<f64>() {
                return value;
            }
        }
    }
    DEFAULT_SCORE_THRESHOLD
}
