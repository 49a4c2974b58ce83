use crate::error::{AppError, AppResult};
use crate::middleware::RequestContext;
use crate::models::ExportQuery;
use crate::services::apply_sort;
use crate::services::export::{videos_to_csv, CSV_FILE_NAME};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use std::sync::Arc;
use validator::Validate;

use super::helpers::collect_videos;
use super::AppState;

/// Download a channel's uploads as CSV
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Extension(context): Extension<RequestContext>,
    query: Result<Query<ExportQuery>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(query) =
        query.map_err(|e| AppError::InvalidInput(format!("Invalid query: {}", e.body_text())))?;

    query
        .validate()
        .map_err(|e| AppError::InvalidInput(format!("Validation failed: {}", e)))?;

    let mut videos = collect_videos(&state, &context, &query.url, query.video_limit).await?;
    apply_sort(&mut videos, query.sort_by, query.order);

    let body = videos_to_csv(&videos)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        body,
    ))
}
