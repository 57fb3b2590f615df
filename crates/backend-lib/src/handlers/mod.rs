// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers. Each one unpacks the request, calls a policy and wraps
//! the result; all decisions live in `auth` and `jobs`.

pub mod auth;
pub mod jobs;

use axum::{extract::FromRequest, Json};
use serde_json::{json, Value};

use crate::error::AppError;

/// `Json` whose rejections are reported as [`AppError`] bodies
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
