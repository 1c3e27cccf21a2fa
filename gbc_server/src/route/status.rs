use axum::{http::header::CACHE_CONTROL, response::IntoResponse, Json};
use gbc_core::status_client;

/// Serve the reachability map for the monitored services.
///
/// Clients may cache the answer for a minute.
pub async fn handler() -> impl IntoResponse {
    let statuses = status_client::check_all().await;
    ([(CACHE_CONTROL, "public, max-age=60")], Json(statuses))
}
