use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    domain::{ShiftAPIError, ShiftStats},
    utils::permissions::authenticate,
    AppState,
};

use super::{list_shifts::load_shifts, ShiftQueryParams};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub employee_id: Option<Uuid>,
}

/// Hours are taken from the scheduled windows, not from clock events.
#[tracing::instrument(name = "Shift stats route handler", skip_all)]
pub async fn shift_stats(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<StatsQueryParams>,
) -> Result<(StatusCode, CookieJar, Json<ShiftStats>), ShiftAPIError> {
    let worker = authenticate(&jar, &state).await?;
    let filter = ShiftQueryParams {
        start_date: params.start_date,
        end_date: params.end_date,
        employee_id: params.employee_id,
        status: None,
    }
    .into_filter(&worker)?;

    let shifts = load_shifts(&state, &filter).await?;
    let response = Json(ShiftStats::from_shifts(&shifts));

    Ok((StatusCode::OK, jar, response))
}
