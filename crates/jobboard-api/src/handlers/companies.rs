//! Company management handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::warn;

use jobboard_models::{validate_company_name, validate_company_update, Company, CompanyView};
use jobboard_mongo::CompanyRepo;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::extract::FormPayload;
use crate::state::AppState;

/// Envelope carrying a single company.
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub message: String,
    pub company: CompanyView,
    pub success: bool,
}

/// Envelope carrying the caller's companies.
#[derive(Debug, Serialize)]
pub struct CompaniesResponse {
    pub message: String,
    pub companies: Vec<CompanyView>,
    pub success: bool,
}

/// POST /api/v1/company/register
pub async fn register_company(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: FormPayload,
) -> ApiResult<impl IntoResponse> {
    let name = validate_company_name(&payload.fields)?;

    let companies = CompanyRepo::new(&state.db);
    if companies.find_by_name(&name).await?.is_some() {
        return Err(ApiError::bad_request("Company with this name already exists."));
    }

    let company = Company::new(name, auth.user_id);

    // The unique name index settles the check-then-create race.
    companies.insert(&company).await.map_err(|e| {
        if e.is_duplicate_key() {
            ApiError::bad_request("Company with this name already exists.")
        } else {
            e.into()
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CompanyResponse {
            message: "Company registered successfully.".to_string(),
            company: CompanyView::from(&company),
            success: true,
        }),
    ))
}

/// GET /api/v1/company
///
/// Scoped to the caller: only companies they own come back.
pub async fn get_companies(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CompaniesResponse>> {
    let companies = CompanyRepo::new(&state.db)
        .find_by_owner(&auth.user_id)
        .await?;

    Ok(Json(CompaniesResponse {
        message: "Companies fetched successfully.".to_string(),
        companies: companies.iter().map(CompanyView::from).collect(),
        success: true,
    }))
}

/// GET /api/v1/company/:id
///
/// No ownership check on this read path.
pub async fn get_company_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<CompanyResponse>> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Company ID is required"));
    }

    let company = CompanyRepo::new(&state.db)
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found."))?;

    Ok(Json(CompanyResponse {
        message: "Company fetched successfully.".to_string(),
        company: CompanyView::from(&company),
        success: true,
    }))
}

/// PUT/POST /api/v1/company/:id
///
/// Nonexistence and foreign ownership answer the same 404.
pub async fn update_company(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: FormPayload,
) -> ApiResult<Json<CompanyResponse>> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Company ID is required"));
    }

    // Ownership first: a bad payload against someone else's company still
    // answers 404.
    let companies = CompanyRepo::new(&state.db);
    let mut company = companies
        .find_by_id_and_owner(&id, &auth.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found("Company not found or you don't have permission to update it.")
        })?;

    if let Some(file) = payload.file {
        let url = state
            .storage
            .upload_attachment(&file.filename, file.data, &file.content_type)
            .await
            .map_err(|e| {
                warn!("Logo upload failed: {}", e);
                ApiError::upload("Error uploading logo")
            })?;
        company.logo = Some(url);
    }

    let input = validate_company_update(&payload.fields)?;

    if let Some(ref name) = input.name {
        if *name != company.name && companies.name_taken_by_other(name, &company.id).await? {
            return Err(ApiError::bad_request("Company name already exists"));
        }
    }

    if let Some(name) = input.name {
        company.name = name;
    }
    if let Some(description) = input.description {
        company.description = Some(description);
    }
    if let Some(website) = input.website {
        company.website = Some(website);
    }
    if let Some(location) = input.location {
        company.location = Some(location);
    }
    company.updated_at = Utc::now();

    companies.save(&company).await.map_err(|e| {
        if e.is_duplicate_key() {
            ApiError::bad_request("Company name already exists")
        } else {
            e.into()
        }
    })?;

    Ok(Json(CompanyResponse {
        message: "Company information updated successfully.".to_string(),
        company: CompanyView::from(&company),
        success: true,
    }))
}
