use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::{
    domain::{
        parse_shift_date, BreakWindow, ClockTime, ServiceId, ShiftAPIError,
        ShiftPatch, ShiftStatus, ShiftStoreError, ShiftType, WorkerId,
    },
    utils::permissions::{authenticate, require_manager},
    AppState,
};

use super::{
    describe_shift, ensure_assignable, parse_shift_id, resolve_services,
    BreakTimeRequest, ShiftResponse,
};

#[tracing::instrument(name = "Update shift route handler", skip_all)]
pub async fn update_shift(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Json(request): Json<UpdateShiftRequest>,
) -> Result<(StatusCode, CookieJar, Json<ShiftResponse>), ShiftAPIError> {
    let manager = authenticate(&jar, &state).await?;
    require_manager(&manager)?;

    let shift_id = parse_shift_id(&id)?;
    let patch = request.into_patch()?;

    let current = state
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

    if let Some(employee_id) = &patch.employee_id {
        if employee_id != &current.employee_id {
            ensure_assignable(&state.worker_store, employee_id).await?;
        }
    }
    if let Some(services) = &patch.services {
        resolve_services(&state.service_store, services).await?;
    }

    let updated = patch.apply_to(&current, state.clock.now())?;

    state
        .shift_store
        .write()
        .await
        .update_shift(&updated, current.status)
        .await
        .map_err(|e| match e {
            ShiftStoreError::ShiftNotFound => {
                ShiftAPIError::NotFound(*shift_id.as_ref())
            }
            ShiftStoreError::ShiftConflict => ShiftAPIError::ShiftConflict,
            ShiftStoreError::StatusChanged => {
                ShiftAPIError::ConcurrentModification
            }
            e => ShiftAPIError::UnexpectedError(eyre!(e)),
        })?;

    let response = Json(describe_shift(&state.service_store, updated).await?);

    Ok((StatusCode::OK, jar, response))
}

/// Every field is optional. `breakTime` and `notes` distinguish an absent
/// key (keep) from an explicit `null` (clear).
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShiftRequest {
    pub employee_id: Option<Uuid>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub break_time: Option<Option<BreakTimeRequest>>,
    pub shift_type: Option<ShiftType>,
    pub status: Option<ShiftStatus>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub notes: Option<Option<String>>,
    pub services: Option<Vec<Uuid>>,
}

impl UpdateShiftRequest {
    pub fn into_patch(self) -> Result<ShiftPatch, ShiftAPIError> {
        Ok(ShiftPatch {
            employee_id: self.employee_id.map(WorkerId::new),
            date: self.date.as_deref().map(parse_shift_date).transpose()?,
            start_time: self
                .start_time
                .as_deref()
                .map(ClockTime::parse)
                .transpose()?,
            end_time: self.end_time.as_deref().map(ClockTime::parse).transpose()?,
            break_window: match self.break_time {
                Some(Some(request)) => Some(Some(BreakWindow::try_from(request)?)),
                Some(None) => Some(None),
                None => None,
            },
            shift_type: self.shift_type,
            status: self.status,
            notes: self.notes,
            services: self
                .services
                .map(|ids| ids.into_iter().map(ServiceId::new).collect()),
        })
    }
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
