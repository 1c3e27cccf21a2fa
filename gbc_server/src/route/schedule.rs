use axum::{extract::Query, http::StatusCode, Json};
use chrono::Datelike;
use gbc_core::bins_client::{self, SchedulePayload};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    year: Option<i32>,
}

/// Serve the extracted bin schedules as JSON.
///
/// The council site is re-fetched on every request; nothing is cached
/// server-side. `year` defaults to the current year.
pub async fn handler(
    Query(query_params): Query<QueryParams>,
) -> Result<Json<SchedulePayload>, (StatusCode, String)> {
    let year = query_params
        .year
        .unwrap_or_else(|| chrono::Local::now().year());
    let payload = bins_client::get(year).await.map_err(|err| {
        tracing::error!("schedule extraction failed: {err}");
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    })?;
    Ok(Json(payload))
}
