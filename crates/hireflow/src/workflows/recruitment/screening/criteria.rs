use once_cell::sync::Lazy;
use regex::Regex;

use super::super::domain::AnswerValue;

/// Outcome of evaluating one `(answer, criterion)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionStatus {
    Pass,
    Fail,
    Error,
}

/// Evaluation result plus the natural-language reason logged verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionOutcome {
    pub status: CriterionStatus,
    pub reason: String,
}

impl CriterionOutcome {
    fn pass(reason: String) -> Self {
        Self {
            status: CriterionStatus::Pass,
            reason,
        }
    }

    fn fail(reason: String) -> Self {
        Self {
            status: CriterionStatus::Fail,
            reason,
        }
    }

    fn error(reason: String) -> Self {
        Self {
            status: CriterionStatus::Error,
            reason,
        }
    }
}

/// Grammar for numeric criteria: optional comparison operator, then a signed
/// decimal. Anything else is a malformed expression, never a panic.
static NUMBER_CRITERIA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(>=|<=|>|<|=)?\s*(-?\d+(?:\.\d+)?)$").expect("static pattern"));

/// Tolerance absorbing floating-point error in admin-authored thresholds.
///
/// The per-operator direction below is asymmetric on purpose: `>=` compares
/// against `value - eps` while `<=` compares against `value + eps`. Stored
/// verdicts depend on that exact behavior; do not normalize it.
const EPSILON: f64 = 1e-6;

fn operator_word(operator: &str) -> &'static str {
    match operator {
        ">=" => "minimal",
        ">" => "more than",
        "<=" => "at most",
        "<" => "less than",
        _ => "exactly",
    }
}

/// Evaluate a numeric criterion such as `>=25` or `= 3.5`.
pub fn evaluate_number(answer: &AnswerValue, criteria: &str, label: &str) -> CriterionOutcome {
    let applicant_value = match answer.as_number() {
        Some(value) => value,
        None => {
            return CriterionOutcome::error(format!(
                "Answer '{answer}' for {label} is not a valid number."
            ))
        }
    };

    let criteria_str = criteria.trim();
    let captures = match NUMBER_CRITERIA.captures(criteria_str) {
        Some(captures) => captures,
        None => {
            return CriterionOutcome::error(format!(
                "Criteria format '{criteria}' for {label} is not valid."
            ))
        }
    };

    let operator = captures.get(1).map(|m| m.as_str()).unwrap_or("=");
    let criteria_value: f64 = match captures[2].parse() {
        Ok(value) => value,
        Err(_) => {
            return CriterionOutcome::error(format!(
                "Criteria format '{criteria}' for {label} is not valid."
            ))
        }
    };

    let is_match = match operator {
        ">=" => applicant_value >= criteria_value - EPSILON,
        ">" => applicant_value > criteria_value + EPSILON,
        "<=" => applicant_value <= criteria_value + EPSILON,
        "<" => applicant_value < criteria_value - EPSILON,
        _ => (applicant_value - criteria_value).abs() < EPSILON,
    };

    // Debug formatting keeps the decimal point on whole numbers, matching the
    // wording stored in historical screening logs ("minimal 25.0").
    let word = operator_word(operator);
    if is_match {
        CriterionOutcome::pass(format!(
            "Answer {answer} for {label} meets the criterion {word} {criteria_value:?}."
        ))
    } else {
        CriterionOutcome::fail(format!(
            "Answer {answer} for {label} does not meet the requirement {word} {criteria_value:?}."
        ))
    }
}

/// Evaluate a text criterion: a comma-separated allow-list, matched
/// case-insensitively after trimming.
pub fn evaluate_text(answer: &AnswerValue, criteria: &str, label: &str) -> CriterionOutcome {
    let allowed: Vec<String> = criteria
        .split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect();

    if allowed.is_empty() {
        return CriterionOutcome::error(format!("Criteria for {label} is empty."));
    }

    let cleaned_answer = answer.to_string().trim().to_lowercase();
    if allowed.iter().any(|entry| entry == &cleaned_answer) {
        CriterionOutcome::pass(format!(
            "Answer '{answer}' for {label} is in the allowed list."
        ))
    } else {
        CriterionOutcome::fail(format!(
            "Answer '{answer}' for {label} is not in the allowed list: {}.",
            allowed.join(", ")
        ))
    }
}

/// Evaluate a boolean criterion by exact literal equality, no coercion: only
/// a text answer string-equal to the stored literal passes. A JSON boolean
/// answer never equals a string criterion.
pub fn evaluate_boolean(answer: &AnswerValue, criteria: &str, label: &str) -> CriterionOutcome {
    let is_match = matches!(answer, AnswerValue::Text(value) if value == criteria);
    if is_match {
        CriterionOutcome::pass(format!(
            "Answer '{answer}' for {label} matches the expected value."
        ))
    } else {
        CriterionOutcome::fail(format!(
            "Answer '{answer}' for {label} does not match the expected value."
        ))
    }
}
