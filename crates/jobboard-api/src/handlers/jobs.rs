//! Job posting and browsing handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use jobboard_models::{validate_post_job, Job, JobDetail, JobWithCompany, ObjectId, Role};
use jobboard_mongo::{CompanyRepo, JobRepo, UserRepo};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::FormPayload;
use crate::state::AppState;

/// Envelope carrying a single job with its company joined.
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: JobWithCompany,
    pub success: bool,
}

/// Envelope carrying a job list.
#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub message: String,
    pub jobs: Vec<JobWithCompany>,
    pub success: bool,
}

/// Envelope carrying a fully populated job.
#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    pub message: String,
    pub job: JobDetail,
    pub success: bool,
}

#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    /// Substring to match against title or description. Empty matches all.
    #[serde(default)]
    pub keyword: String,
}

/// POST /api/v1/job
pub async fn post_job(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: FormPayload,
) -> ApiResult<impl IntoResponse> {
    let users = UserRepo::new(&state.db);
    let user = users
        .find_by_id(&auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found."))?;
    if user.role != Role::Recruiter {
        return Err(ApiError::forbidden("Only recruiters can post jobs."));
    }

    let input = validate_post_job(&payload.fields)?;

    let company_id = ObjectId::parse_str(&input.company_id)
        .map_err(|_| ApiError::bad_request("Invalid company ID."))?;

    let job = Job::new(
        input.title,
        input.description,
        input.requirements,
        input.salary,
        input.experience_level,
        input.location,
        input.job_type,
        input.position,
        company_id,
        auth.user_id,
    );

    let jobs = JobRepo::new(&state.db);
    jobs.insert(&job).await?;

    let companies = CompanyRepo::new(&state.db);
    let company = companies.find_by_id(&input.company_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            message: "New job created successfully.".to_string(),
            job: JobWithCompany::assemble(&job, company.as_ref()),
            success: true,
        }),
    ))
}

/// GET /api/v1/job?keyword=
///
/// Public listing. Unpaginated: the whole matching set comes back, newest
/// first.
pub async fn get_all_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> ApiResult<Json<JobsResponse>> {
    let jobs = JobRepo::new(&state.db)
        .search_with_company(&query.keyword)
        .await?;

    Ok(Json(JobsResponse {
        message: "Jobs fetched successfully.".to_string(),
        jobs,
        success: true,
    }))
}

/// GET /api/v1/job/:id
pub async fn get_job_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<JobDetailResponse>> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Job ID is required"));
    }

    let job = JobRepo::new(&state.db)
        .detail(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found."))?;

    Ok(Json(JobDetailResponse {
        message: "Job fetched successfully.".to_string(),
        job,
        success: true,
    }))
}

/// GET /api/v1/job/admin
///
/// The caller's own postings, newest first.
pub async fn get_admin_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<JobsResponse>> {
    let jobs = JobRepo::new(&state.db)
        .find_by_creator_with_company(&auth.user_id)
        .await?;

    Ok(Json(JobsResponse {
        message: "Jobs fetched successfully.".to_string(),
        jobs,
        success: true,
    }))
}
