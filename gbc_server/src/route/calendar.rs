pub mod food_garden;
pub mod general;
pub mod glass;
pub mod recycling;

use axum::{
    extract::Query,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
};
use chrono::{Datelike, Utc};
use gbc_core::{bins_client, ical::generator::Emitter, ics, ics::BinTypeBitmask};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QueryParams {
    year: Option<i32>,
    #[serde(default)]
    exclude_general: bool,
    #[serde(default)]
    exclude_recycling: bool,
    #[serde(default)]
    exclude_food_garden: bool,
    #[serde(default)]
    exclude_glass: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YearQueryParams {
    pub year: Option<i32>,
}

impl From<&QueryParams> for BinTypeBitmask {
    fn from(value: &QueryParams) -> Self {
        let mut bin_type_bitmask = BinTypeBitmask::none();
        if value.exclude_general {
            bin_type_bitmask |= BinTypeBitmask::General;
        }
        if value.exclude_recycling {
            bin_type_bitmask |= BinTypeBitmask::Recycling;
        }
        if value.exclude_food_garden {
            bin_type_bitmask |= BinTypeBitmask::FoodGarden;
        }
        if value.exclude_glass {
            bin_type_bitmask |= BinTypeBitmask::Glass;
        }
        bin_type_bitmask
    }
}

pub async fn handle(
    year: Option<i32>,
    excluded_bin_types: BinTypeBitmask,
) -> Result<Response, (StatusCode, String)> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let payload = bins_client::get(year).await.map_err(|err| {
        tracing::error!("calendar export failed: {err}");
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    })?;
    let calendar = ics::generate(&payload.bins, payload.year, Utc::now(), excluded_bin_types);
    let response = (
        [
            (CONTENT_TYPE, String::from("text/calendar")),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"bin-collections-{year}.ics\""),
            ),
        ],
        calendar.generate(),
    )
        .into_response();
    Ok(response)
}

/// Handle calendar requests.
///
/// `year` and the `exclude_*` switches may be given in the query string.
pub async fn handler(
    Query(query_params): Query<QueryParams>,
) -> Result<Response, (StatusCode, String)> {
    let response = handle(query_params.year, BinTypeBitmask::from(&query_params)).await?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use gbc_core::ics::BinTypeBitmask;

    use super::QueryParams;

    #[test]
    fn test_from_query_params_for_exclude_bin_type() {
        let exclude_query_params = QueryParams {
            year: None,
            exclude_general: false,
            exclude_recycling: false,
            exclude_food_garden: false,
            exclude_glass: false,
        };
        let exclude_from_query_params = BinTypeBitmask::from(&exclude_query_params);
        assert_eq!(exclude_from_query_params, BinTypeBitmask::none());
        let exclude_query_params = QueryParams {
            year: None,
            exclude_general: true,
            exclude_recycling: false,
            exclude_food_garden: false,
            exclude_glass: false,
        };
        let exclude_from_query_params = BinTypeBitmask::from(&exclude_query_params);
        assert_eq!(exclude_from_query_params, BinTypeBitmask::General);
        let exclude_query_params = QueryParams {
            year: Some(2025),
            exclude_general: false,
            exclude_recycling: true,
            exclude_food_garden: true,
            exclude_glass: true,
        };
        let exclude_from_query_params = BinTypeBitmask::from(&exclude_query_params);
        assert_eq!(
            exclude_from_query_params,
            BinTypeBitmask::Recycling
                .or(BinTypeBitmask::FoodGarden)
                .or(BinTypeBitmask::Glass)
        );
    }
}
