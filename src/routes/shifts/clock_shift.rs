use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    domain::{ClockEvent, ShiftAPIError, ShiftStoreError},
    utils::permissions::authenticate,
    AppState,
};

use super::{describe_shift, parse_shift_id, ShiftResponse};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockAction {
    In,
    Out,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct ClockShiftRequest {
    pub action: ClockAction,
    pub location: Option<String>,
}

/// Clock events are stamped with the server clock; only the assigned
/// employee may record them.
#[tracing::instrument(name = "Clock shift route handler", skip_all)]
pub async fn clock_shift(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(request): Json<ClockShiftRequest>,
) -> Result<(StatusCode, CookieJar, Json<ShiftResponse>), ShiftAPIError> {
    let worker = authenticate(&jar, &state).await?;
    let shift_id = parse_shift_id(&id)?;
    let event = ClockEvent::new(state.clock.now(), request.location);

    let result = {
        let mut shift_store = state.shift_store.write().await;
        match request.action {
            ClockAction::In => shift_store.clock_in(&shift_id, &worker.id, event).await,
            ClockAction::Out => {
                shift_store.clock_out(&shift_id, &worker.id, event).await
            }
        }
    };

    let shift = result.map_err(|e| match e {
        ShiftStoreError::ShiftNotFound => ShiftAPIError::NotFound(*shift_id.as_ref()),
        ShiftStoreError::InvalidState(e) => ShiftAPIError::from(e),
        ShiftStoreError::StatusChanged => ShiftAPIError::ConcurrentModification,
        e => ShiftAPIError::UnexpectedError(eyre!(e)),
    })?;

    tracing::info!(shift_id = %shift.id, action = ?request.action, "clock event recorded");
    let response = Json(describe_shift(&state.service_store, shift).await?);

    Ok((StatusCode::OK, jar, response))
}
