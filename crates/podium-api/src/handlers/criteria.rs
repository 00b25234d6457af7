//! Rubric criteria save/load handlers.

use axum::extract::{Path as UrlPath, State};
use axum::Json;
use serde::Serialize;
use validator::Validate;

use podium_models::Criterion;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response for a saved rubric.
#[derive(Debug, Serialize)]
pub struct SaveCriteriaResponse {
    pub name: String,
    pub saved: usize,
}

/// Save a named rubric for later uploads.
pub async fn save_criteria(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
    Json(criteria): Json<Vec<Criterion>>,
) -> ApiResult<Json<SaveCriteriaResponse>> {
    if criteria.is_empty() {
        return Err(ApiError::validation("Criteria list is empty"));
    }
    for criterion in &criteria {
        criterion
            .validate()
            .map_err(|e| ApiError::validation(format!("Invalid criterion: {e}")))?;
    }

    state.criteria.save(&name, &criteria).await?;

    Ok(Json(SaveCriteriaResponse {
        saved: criteria.len(),
        name,
    }))
}

/// Load a previously saved rubric by name.
pub async fn load_criteria(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> ApiResult<Json<Vec<Criterion>>> {
    state
        .criteria
        .load(&name)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No criteria saved under '{name}'")))
}
