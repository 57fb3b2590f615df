//! Job handlers.
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use jobboard_common::{JobCreatedResponse, JobRequest, JobView, MessageResponse};

use crate::auth::RequestIdentity;
use super::AppJson;
use crate::error::AppError;
use crate::AppState;

/// `POST /jobs` (admin)
pub async fn post_job(
    State(state): State<Arc<AppState>>,
    RequestIdentity(identity): RequestIdentity,
    AppJson(req): AppJson<JobRequest>,
) -> Result<(StatusCode, Json<JobCreatedResponse>), AppError> {
    let job = state.jobs.post_job(&identity, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(JobCreatedResponse {
            message: "Job posted successfully!".to_string(),
            job,
        }),
    ))
}

/// `GET /jobs`
pub async fn list_jobs(State(state): State<Arc<AppState>>) -> Result<Json<Vec<JobView>>, AppError> {
    Ok(Json(state.jobs.list_jobs().await?))
}

/// `DELETE /jobs/{id}` (admin)
pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    RequestIdentity(identity): RequestIdentity,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.jobs.delete_job(&identity, &id).await?;
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}
