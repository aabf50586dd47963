use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{ShiftAPIError, ShiftStoreError},
    utils::permissions::{authenticate, require_manager},
    AppState,
};

use super::parse_shift_id;

#[tracing::instrument(name = "Delete shift route handler", skip_all)]
pub async fn delete_shift(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<(StatusCode, CookieJar, Json<DeleteShiftResponse>), ShiftAPIError> {
    let manager = authenticate(&jar, &state).await?;
    require_manager(&manager)?;
    let shift_id = parse_shift_id(&id)?;

    state
        .shift_store
        .write()
        .await
        .delete_shift(&shift_id)
        .await
        .map_err(|e| match e {
            ShiftStoreError::ShiftNotFound => {
                ShiftAPIError::NotFound(*shift_id.as_ref())
            }
            ShiftStoreError::InvalidState(e) => ShiftAPIError::from(e),
            ShiftStoreError::StatusChanged => {
                ShiftAPIError::ConcurrentModification
            }
            e => ShiftAPIError::UnexpectedError(eyre!(e)),
        })?;

    let response = Json(DeleteShiftResponse {
        message: "Shift deleted successfully".to_string(),
    });

    Ok((StatusCode::OK, jar, response))
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteShiftResponse {
    pub message: String,
}
