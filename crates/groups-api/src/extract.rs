//! Bearer-token authentication extractor

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use groups_core::Actor;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated actor behind a request
#[derive(Debug, Clone)]
pub struct CurrentActor(pub Actor);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Malformed authorization header".to_string()))?;

        let actor = state
            .jwt
            .authenticate(token)
            .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

        Ok(CurrentActor(actor))
    }
}
