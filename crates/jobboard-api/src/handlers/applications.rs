//! Application lifecycle handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use jobboard_models::{
    validate_status, Application, ApplicationWithJob, JobDetail, ObjectId, Role,
};
use jobboard_mongo::{ApplicationRepo, JobRepo, UserRepo};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::FormPayload;
use crate::handlers::MessageResponse;
use crate::state::AppState;

/// Envelope carrying the caller's applications with jobs joined.
#[derive(Debug, Serialize)]
pub struct AppliedJobsResponse {
    pub message: String,
    pub applications: Vec<ApplicationWithJob>,
    pub success: bool,
}

/// Envelope carrying a job with its applicants joined.
#[derive(Debug, Serialize)]
pub struct ApplicantsResponse {
    pub message: String,
    pub job: JobDetail,
    pub success: bool,
}

/// GET /api/v1/application/apply/:id
pub async fn apply_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Job ID is required"));
    }

    let users = UserRepo::new(&state.db);
    let user = users
        .find_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;
    if user.role != Role::Student {
        return Err(ApiError::forbidden("Only students can apply for jobs."));
    }

    let job_id =
        ObjectId::parse_str(id.trim()).map_err(|_| ApiError::not_found("Job not found."))?;

    let applications = ApplicationRepo::new(&state.db);
    if applications.find_for(&job_id, &auth.user_id).await?.is_some() {
        return Err(ApiError::bad_request("You have already applied for this job."));
    }

    let jobs = JobRepo::new(&state.db);
    let job = jobs
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;

    let application = Application::new(job.id, auth.user_id);

    // The unique (job, applicant) index settles the check-then-create race.
    applications.insert(&application).await.map_err(|e| {
        if e.is_duplicate_key() {
            ApiError::bad_request("You have already applied for this job.")
        } else {
            e.into()
        }
    })?;

    jobs.push_application(&job.id, &application.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Job applied successfully.")),
    ))
}

/// GET /api/v1/application/get
///
/// The caller's applications, newest first. An empty list is a 200.
pub async fn get_applied_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AppliedJobsResponse>> {
    let applications = ApplicationRepo::new(&state.db)
        .find_by_applicant_with_jobs(&auth.user_id)
        .await?;

    Ok(Json(AppliedJobsResponse {
        message: "Applications fetched successfully.".to_string(),
        applications,
        success: true,
    }))
}

/// GET /api/v1/application/:id/applicants
///
/// Visible only to the job's creator; anyone else gets the same 404 as a
/// missing job.
pub async fn get_applicants(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<ApplicantsResponse>> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Job ID is required"));
    }

    let job = JobRepo::new(&state.db)
        .detail(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;

    if job.created_by != auth.user_id.to_hex() {
        return Err(ApiError::not_found("Job not found."));
    }

    Ok(Json(ApplicantsResponse {
        message: "Applicants fetched successfully.".to_string(),
        job,
        success: true,
    }))
}

/// POST /api/v1/application/status/:id/update
///
/// Only the creator of the application's job may move its status; others
/// get the same 404 as a missing application.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: FormPayload,
) -> ApiResult<Json<MessageResponse>> {
    let status = validate_status(&payload.fields)?;

    let applications = ApplicationRepo::new(&state.db);
    let application = applications
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found."))?;

    let jobs = JobRepo::new(&state.db);
    let owns_job = jobs
        .find_by_id(&application.job.to_hex())
        .await?
        .map(|job| job.created_by == auth.user_id)
        .unwrap_or(false);
    if !owns_job {
        return Err(ApiError::not_found("Application not found."));
    }

    applications.set_status(&application.id, status).await?;

    Ok(Json(MessageResponse::new("Status updated successfully.")))
}
