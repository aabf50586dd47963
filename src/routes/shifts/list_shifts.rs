use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    domain::{
        parse_shift_date, Shift, ShiftAPIError, ShiftFilter, ShiftStatus,
        ValidationError, Worker, WorkerId,
    },
    utils::permissions::{authenticate, scope_to_worker},
    AppState,
};

use super::{describe_shifts, ShiftResponse};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftQueryParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub employee_id: Option<Uuid>,
    pub status: Option<ShiftStatus>,
}

impl ShiftQueryParams {
    /// Builds the store filter visible to `worker`.
    pub fn into_filter(self, worker: &Worker) -> Result<ShiftFilter, ShiftAPIError> {
        let start_date = self
            .start_date
            .as_deref()
            .map(parse_shift_date)
            .transpose()?;
        let end_date = self.end_date.as_deref().map(parse_shift_date).transpose()?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(ShiftAPIError::ValidationError(ValidationError::new(
                    "startDate must not be after endDate".to_string(),
                )));
            }
        }

        Ok(ShiftFilter {
            start_date,
            end_date,
            employee_id: scope_to_worker(worker, self.employee_id.map(WorkerId::new))?,
            status: self.status,
        })
    }
}

pub(super) async fn load_shifts(
    state: &AppState,
    filter: &ShiftFilter,
) -> Result<Vec<Shift>, ShiftAPIError> {
    state
        .shift_store
        .read()
        .await
        .get_shifts(filter)
        .await
        .map_err(|e| ShiftAPIError::UnexpectedError(eyre!(e)))
}

#[tracing::instrument(name = "List shifts route handler", skip_all)]
pub async fn list_shifts(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<ShiftQueryParams>,
) -> Result<(StatusCode, CookieJar, Json<Vec<ShiftResponse>>), ShiftAPIError> {
    let worker = authenticate(&jar, &state).await?;
    let filter = params.into_filter(&worker)?;

    let shifts = load_shifts(&state, &filter).await?;
    let response = Json(describe_shifts(&state.service_store, shifts).await?);

    Ok((StatusCode::OK, jar, response))
}

/// The caller's own shifts, whatever their role.
#[tracing::instrument(name = "List own shifts route handler", skip_all)]
pub async fn my_shifts(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<ShiftQueryParams>,
) -> Result<(StatusCode, CookieJar, Json<Vec<ShiftResponse>>), ShiftAPIError> {
    let worker = authenticate(&jar, &state).await?;
    let params = ShiftQueryParams {
        employee_id: Some(*worker.id.as_ref()),
        ..params
    };
    let filter = params.into_filter(&worker)?;

    let shifts = load_shifts(&state, &filter).await?;
    let response = Json(describe_shifts(&state.service_store, shifts).await?);

    Ok((StatusCode::OK, jar, response))
}
