//! API routes.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::applications::{apply_job, get_applicants, get_applied_jobs, update_status};
use crate::handlers::companies::{
    get_companies, get_company_by_id, register_company, update_company,
};
use crate::handlers::health::{health, ready};
use crate::handlers::jobs::{get_admin_jobs, get_all_jobs, get_job_by_id, post_job};
use crate::handlers::users::{login, logout, register, update_profile};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let user_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/profile/update", post(update_profile));

    let company_routes = Router::new()
        .route("/register", post(register_company))
        .route("/", get(get_companies))
        // Update accepts both verbs; reads carry no ownership check.
        .route(
            "/:id",
            get(get_company_by_id)
                .put(update_company)
                .post(update_company),
        );

    let job_routes = Router::new()
        .route("/", post(post_job).get(get_all_jobs))
        .route("/admin", get(get_admin_jobs))
        .route("/:id", get(get_job_by_id));

    let application_routes = Router::new()
        .route("/apply/:id", get(apply_job))
        .route("/get", get(get_applied_jobs))
        .route("/:id/applicants", get(get_applicants))
        .route("/status/:id/update", post(update_status));

    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .nest("/user", user_routes)
        .nest("/company", company_routes)
        .nest("/job", job_routes)
        .nest("/application", application_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .fallback(not_found)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Unmatched routes answer with the standard envelope.
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "Route not found",
            "success": false,
        })),
    )
}
