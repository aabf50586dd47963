use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    domain::{ShiftAPIError, ShiftStoreError},
    utils::permissions::authenticate,
    AppState,
};

use super::{describe_shift, parse_shift_id, ShiftResponse};

#[tracing::instrument(name = "Get shift route handler", skip_all)]
pub async fn get_shift(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(StatusCode, CookieJar, Json<ShiftResponse>), ShiftAPIError> {
    let worker = authenticate(&jar, &state).await?;
    let shift_id = parse_shift_id(&id)?;

    let shift = state
        .shift_store
        .read()
        .await
        .get_shift(&shift_id)
        .await
        .map_err(|e| match e {
            ShiftStoreError::ShiftNotFound => {
                ShiftAPIError::NotFound(*shift_id.as_ref())
            }
            e => ShiftAPIError::UnexpectedError(eyre!(e)),
        })?;

    if !worker.is_manager() && !shift.is_assigned_to(&worker.id) {
        return Err(ShiftAPIError::Forbidden(
            "Employees can only view their own shifts".to_string(),
        ));
    }

    let response = Json(describe_shift(&state.service_store, shift).await?);

    Ok((StatusCode::OK, jar, response))
}
