//! Axum extractor for the bearer identity.
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};

use super::Identity;
use crate::error::AppError;
use crate::AppState;

/// Identity resolved from the request's `Authorization` header
#[derive(Debug, Clone)]
pub struct RequestIdentity(pub Identity);

impl FromRequestParts<Arc<AppState>> for RequestIdentity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AppError::BadFormat)?),
            None => None,
        };
        state.auth.authenticate(header).map(RequestIdentity)
    }
}
