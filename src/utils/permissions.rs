use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    domain::{AuthAPIError, ShiftAPIError, Worker, WorkerId, WorkerStoreError},
    AppState,
};

use super::auth::get_claims;

/// Resolves the cookie's token to an active worker. Unknown or deactivated
/// workers are treated as holding an invalid token.
#[tracing::instrument(name = "Authenticating worker", skip_all)]
pub async fn authenticate(
    jar: &CookieJar,
    state: &AppState,
) -> Result<Worker, AuthAPIError> {
    let claims = get_claims(jar, &state.jwt_secret)?;
    let worker_id =
        WorkerId::parse(&claims.sub).map_err(|_| AuthAPIError::InvalidToken)?;

    match state.worker_store.read().await.get_worker(&worker_id).await {
        Ok(worker) if worker.is_active => Ok(worker),
        Ok(_) | Err(WorkerStoreError::WorkerNotFound) => {
            Err(AuthAPIError::InvalidToken)
        }
        Err(e) => Err(AuthAPIError::UnexpectedError(eyre!(e))),
    }
}

pub fn require_manager(worker: &Worker) -> Result<(), ShiftAPIError> {
    if worker.is_manager() {
        Ok(())
    } else {
        Err(ShiftAPIError::Forbidden(
            "Only managers can manage shifts".to_string(),
        ))
    }
}

/// Managers may read any employee's shifts; employees only their own.
pub fn scope_to_worker(
    worker: &Worker,
    requested: Option<WorkerId>,
) -> Result<Option<WorkerId>, ShiftAPIError> {
    if worker.is_manager() {
        return Ok(requested);
    }
    match requested {
        Some(id) if id != worker.id => Err(ShiftAPIError::Forbidden(
            "Employees can only view their own shifts".to_string(),
        )),
        _ => Ok(Some(worker.id)),
    }
}
