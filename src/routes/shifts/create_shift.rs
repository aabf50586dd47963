use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    domain::{
        parse_shift_date, BreakWindow, NewShift, ServiceId, Shift, ShiftAPIError,
        ShiftStoreError, ShiftType, TimeWindow, WorkerId,
    },
    utils::permissions::{authenticate, require_manager},
    AppState,
};

use super::{
    ensure_assignable, resolve_services, BreakTimeRequest, ShiftResponse,
};

#[tracing::instrument(name = "Create shift route handler", skip_all)]
pub async fn create_shift(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CreateShiftRequest>,
) -> Result<(StatusCode, CookieJar, Json<ShiftResponse>), ShiftAPIError> {
    let manager = authenticate(&jar, &state).await?;
    require_manager(&manager)?;

    let employee_id = WorkerId::new(request.employee_id);
    let date = parse_shift_date(&request.date)?;
    let window = TimeWindow::parse(&request.start_time, &request.end_time)?;
    let break_window = request
        .break_time
        .map(BreakWindow::try_from)
        .transpose()?;
    let services: Vec<ServiceId> =
        request.services.into_iter().map(ServiceId::new).collect();

    ensure_assignable(&state.worker_store, &employee_id).await?;
    let summaries = resolve_services(&state.service_store, &services).await?;

    let shift = Shift::new(
        NewShift {
            employee_id,
            date,
            window,
            break_window,
            shift_type: request.shift_type.unwrap_or_default(),
            notes: request.notes,
            assigned_by: manager.id,
            services,
        },
        state.clock.now(),
    )?;

    state
        .shift_store
        .write()
        .await
        .add_shift(&shift)
        .await
        .map_err(|e| match e {
            ShiftStoreError::ShiftConflict => ShiftAPIError::ShiftConflict,
            e => ShiftAPIError::UnexpectedError(eyre!(e)),
        })?;

    tracing::info!(shift_id = %shift.id, employee_id = %shift.employee_id, "shift created");
    let response = Json(ShiftResponse::new(shift, summaries));

    Ok((StatusCode::CREATED, jar, response))
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShiftRequest {
    pub employee_id: Uuid,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub shift_type: Option<ShiftType>,
    pub notes: Option<String>,
    pub break_time: Option<BreakTimeRequest>,
    #[serde(default)]
    pub services: Vec<Uuid>,
}
