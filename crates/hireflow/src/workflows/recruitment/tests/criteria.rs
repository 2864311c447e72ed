use crate::workflows::recruitment::domain::AnswerValue;
use crate::workflows::recruitment::screening::criteria::{
    CriterionStatus, evaluate_boolean, evaluate_number, evaluate_text,
};

fn number(value: f64) -> AnswerValue {
    AnswerValue::Number(value)
}

fn text(value: &str) -> AnswerValue {
    AnswerValue::Text(value.to_string())
}

#[test]
fn minimal_comparison_absorbs_epsilon_below_threshold() {
    let outcome = evaluate_number(&number(25.0), ">=25", "age");
    assert_eq!(outcome.status, CriterionStatus::Pass);
    assert_eq!(
        outcome.reason,
        "Answer 25 for age meets the criterion minimal 25.0."
    );

    // Just inside the tolerance band still passes.
    let outcome = evaluate_number(&number(24.999_999_5), ">=25", "age");
    assert_eq!(outcome.status, CriterionStatus::Pass);

    let outcome = evaluate_number(&number(24.99), ">=25", "age");
    assert_eq!(outcome.status, CriterionStatus::Fail);
    assert_eq!(
        outcome.reason,
        "Answer 24.99 for age does not meet the requirement minimal 25.0."
    );
}

#[test]
fn strict_greater_excludes_the_epsilon_band() {
    let outcome = evaluate_number(&number(5.000_000_5), ">5", "years");
    assert_eq!(outcome.status, CriterionStatus::Fail);

    let outcome = evaluate_number(&number(5.000_002), ">5", "years");
    assert_eq!(outcome.status, CriterionStatus::Pass);
    assert!(outcome.reason.contains("more than 5.0"));
}

#[test]
fn at_most_includes_the_epsilon_band() {
    let outcome = evaluate_number(&number(10.000_000_5), "<=10", "distance");
    assert_eq!(outcome.status, CriterionStatus::Pass);
    assert!(outcome.reason.contains("at most 10.0"));

    let outcome = evaluate_number(&number(10.01), "<=10", "distance");
    assert_eq!(outcome.status, CriterionStatus::Fail);
}

#[test]
fn less_than_excludes_the_epsilon_band() {
    let outcome = evaluate_number(&number(9.999_999_5), "<10", "distance");
    assert_eq!(outcome.status, CriterionStatus::Fail);

    let outcome = evaluate_number(&number(9.99), "<10", "distance");
    assert_eq!(outcome.status, CriterionStatus::Pass);
    assert!(outcome.reason.contains("less than 10.0"));
}

#[test]
fn equality_matches_within_epsilon() {
    let outcome = evaluate_number(&number(3.500_000_5), "=3.5", "gpa");
    assert_eq!(outcome.status, CriterionStatus::Pass);
    assert!(outcome.reason.contains("exactly 3.5"));

    let outcome = evaluate_number(&number(3.51), "=3.5", "gpa");
    assert_eq!(outcome.status, CriterionStatus::Fail);
}

#[test]
fn bare_number_defaults_to_equality() {
    let outcome = evaluate_number(&number(42.0), "42", "score");
    assert_eq!(outcome.status, CriterionStatus::Pass);
    assert!(outcome.reason.contains("exactly 42.0"));

    let outcome = evaluate_number(&number(41.0), "42", "score");
    assert_eq!(outcome.status, CriterionStatus::Fail);
}

#[test]
fn negative_thresholds_and_inner_whitespace_parse() {
    let outcome = evaluate_number(&number(-4.0), ">=-5", "balance");
    assert_eq!(outcome.status, CriterionStatus::Pass);

    let outcome = evaluate_number(&number(30.0), ">= 25", "age");
    assert_eq!(outcome.status, CriterionStatus::Pass);
}

#[test]
fn malformed_numeric_criteria_degrade_to_error() {
    let outcome = evaluate_number(&number(30.0), "at least 25", "age");
    assert_eq!(outcome.status, CriterionStatus::Error);
    assert_eq!(
        outcome.reason,
        "Criteria format 'at least 25' for age is not valid."
    );

    let outcome = evaluate_number(&number(30.0), ">= twenty", "age");
    assert_eq!(outcome.status, CriterionStatus::Error);
}

#[test]
fn non_numeric_answers_degrade_to_error() {
    let outcome = evaluate_number(&text("tall"), ">=25", "age");
    assert_eq!(outcome.status, CriterionStatus::Error);
    assert_eq!(outcome.reason, "Answer 'tall' for age is not a valid number.");

    let outcome = evaluate_number(&AnswerValue::Bool(true), ">=25", "age");
    assert_eq!(outcome.status, CriterionStatus::Error);
}

#[test]
fn numeric_text_answers_coerce() {
    let outcome = evaluate_number(&text(" 30 "), ">=25", "age");
    assert_eq!(outcome.status, CriterionStatus::Pass);
}

#[test]
fn text_allow_list_matches_case_insensitively() {
    let outcome = evaluate_text(&text("Jakarta"), "jakarta, bandung", "location");
    assert_eq!(outcome.status, CriterionStatus::Pass);

    let outcome = evaluate_text(&text(" bandung "), "jakarta, bandung", "location");
    assert_eq!(outcome.status, CriterionStatus::Pass);
}

#[test]
fn text_rejection_lists_the_allowed_values() {
    let outcome = evaluate_text(&text("Surabaya"), "jakarta, bandung", "location");
    assert_eq!(outcome.status, CriterionStatus::Fail);
    assert_eq!(
        outcome.reason,
        "Answer 'Surabaya' for location is not in the allowed list: jakarta, bandung."
    );
}

#[test]
fn blank_allow_list_is_an_error() {
    let outcome = evaluate_text(&text("Jakarta"), " , ", "location");
    assert_eq!(outcome.status, CriterionStatus::Error);
    assert_eq!(outcome.reason, "Criteria for location is empty.");
}

#[test]
fn boolean_requires_exact_text_literal() {
    let outcome = evaluate_boolean(&text("yes"), "yes", "relocation");
    assert_eq!(outcome.status, CriterionStatus::Pass);

    // Case differences and JSON booleans never satisfy a text literal.
    let outcome = evaluate_boolean(&text("Yes"), "yes", "relocation");
    assert_eq!(outcome.status, CriterionStatus::Fail);

    let outcome = evaluate_boolean(&AnswerValue::Bool(true), "true", "relocation");
    assert_eq!(outcome.status, CriterionStatus::Fail);
}
