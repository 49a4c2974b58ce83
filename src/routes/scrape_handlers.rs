use crate::error::{AppError, AppResult};
use crate::middleware::RequestContext;
use crate::models::{ScrapeRequest, ScrapeResponse};
use crate::services::apply_sort;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::response::{IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use super::helpers::collect_videos;
use super::AppState;

/// Fetch a channel's uploads
pub async fn scrape_videos(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) =
        payload.map_err(|e| AppError::InvalidInput(format!("Invalid request body: {}", e.body_text())))?;

    payload
        .validate()
        .map_err(|e| AppError::InvalidInput(format!("Validation failed: {}", e)))?;

    let mut videos = collect_videos(&state, &context, &payload.url, payload.video_limit).await?;
    apply_sort(&mut videos, payload.sort_by, payload.order);

    Ok(Json(ScrapeResponse { videos }))
}
