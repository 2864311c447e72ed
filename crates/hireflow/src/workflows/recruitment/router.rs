use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicantId;
use super::repository::{
    ApplicantRepository, JobDirectory, RepositoryError, ScheduleRepository,
};
use super::service::{ApplicationSubmission, RecruitmentService, ServiceError};

/// Router builder exposing HTTP endpoints for intake, screening, and
/// interview scheduling.
pub fn recruitment_router<J, A, S>(service: Arc<RecruitmentService<J, A, S>>) -> Router
where
    J: JobDirectory + 'static,
    A: ApplicantRepository + 'static,
    S: ScheduleRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/recruitment/applications",
            post(submit_handler::<J, A, S>),
        )
        .route(
            "/api/v1/recruitment/applicants/:applicant_id",
            get(status_handler::<J, A, S>),
        )
        .route(
            "/api/v1/recruitment/applicants/:applicant_id/rescreen",
            post(rescreen_handler::<J, A, S>),
        )
        .route(
            "/api/v1/recruitment/jobs/:job_id/schedule",
            post(schedule_handler::<J, A, S>),
        )
        .route(
            "/api/v1/recruitment/applicants/:applicant_id/reschedule",
            post(reschedule_handler::<J, A, S>),
        )
        .route(
            "/api/v1/recruitment/applicants/:applicant_id/schedule",
            delete(cancel_handler::<J, A, S>),
        )
        .with_state(service)
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::JobNotFound
        | ServiceError::ApplicantNotFound
        | ServiceError::SlotNotFound => StatusCode::NOT_FOUND,
        ServiceError::SlotTaken => StatusCode::CONFLICT,
        ServiceError::Scheduling(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn submit_handler<J, A, S>(
    State(service): State<Arc<RecruitmentService<J, A, S>>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    J: JobDirectory + 'static,
    A: ApplicantRepository + 'static,
    S: ScheduleRepository + 'static,
{
    match service.submit(submission) {
        Ok(outcome) => {
            let payload = json!({
                "applicant": outcome.record.status_view(),
                "screening": outcome.record.screening,
                "scheduling": outcome.scheduling,
                "scheduling_error": outcome.scheduling_error,
            });
            (StatusCode::ACCEPTED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<J, A, S>(
    State(service): State<Arc<RecruitmentService<J, A, S>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    J: JobDirectory + 'static,
    A: ApplicantRepository + 'static,
    S: ScheduleRepository + 'static,
{
    match service.get(&ApplicantId(applicant_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn rescreen_handler<J, A, S>(
    State(service): State<Arc<RecruitmentService<J, A, S>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    J: JobDirectory + 'static,
    A: ApplicantRepository + 'static,
    S: ScheduleRepository + 'static,
{
    match service.rescreen(&ApplicantId(applicant_id)) {
        Ok(outcome) => {
            let payload = json!({
                "applicant": outcome.record.status_view(),
                "screening": outcome.record.screening,
                "scheduling": outcome.scheduling,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schedule_handler<J, A, S>(
    State(service): State<Arc<RecruitmentService<J, A, S>>>,
    Path(job_id): Path<String>,
) -> Response
where
    J: JobDirectory + 'static,
    A: ApplicantRepository + 'static,
    S: ScheduleRepository + 'static,
{
    match service.schedule_job(&super::domain::JobId(job_id)) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RescheduleRequest {
    pub(crate) interview_time: DateTime<Utc>,
}

pub(crate) async fn reschedule_handler<J, A, S>(
    State(service): State<Arc<RecruitmentService<J, A, S>>>,
    Path(applicant_id): Path<String>,
    axum::Json(request): axum::Json<RescheduleRequest>,
) -> Response
where
    J: JobDirectory + 'static,
    A: ApplicantRepository + 'static,
    S: ScheduleRepository + 'static,
{
    match service.reschedule(&ApplicantId(applicant_id), request.interview_time) {
        Ok(slot) => (StatusCode::OK, axum::Json(slot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn cancel_handler<J, A, S>(
    State(service): State<Arc<RecruitmentService<J, A, S>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    J: JobDirectory + 'static,
    A: ApplicantRepository + 'static,
    S: ScheduleRepository + 'static,
{
    match service.cancel_slot(&ApplicantId(applicant_id)) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "status": "requeued" })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}
