use axum::{extract::Query, http::StatusCode, response::Response};
use gbc_core::ics::BinTypeBitmask;

use crate::route::calendar::{handle, YearQueryParams};

pub async fn handler(
    Query(year_query_params): Query<YearQueryParams>,
) -> Result<Response, (StatusCode, String)> {
    handle(year_query_params.year, BinTypeBitmask::InvertedGlass).await
}
