mod clock_shift;
mod create_shift;
mod delete_shift;
mod get_shift;
mod list_shifts;
mod payload;
mod shift_stats;
mod update_shift;

pub use clock_shift::*;
pub use create_shift::*;
pub use delete_shift::*;
pub use get_shift::*;
pub use list_shifts::*;
pub use payload::*;
pub use shift_stats::*;
pub use update_shift::*;

use color_eyre::eyre::eyre;

use crate::{
    app_state::WorkerStoreType,
    domain::{ShiftAPIError, ShiftId, ValidationError, WorkerId, WorkerStoreError},
};

/// Shifts may be assigned to any active worker, managers included.
#[tracing::instrument(name = "Checking assignable worker", skip_all)]
async fn ensure_assignable(
    worker_store: &WorkerStoreType,
    employee_id: &WorkerId,
) -> Result<(), ShiftAPIError> {
    let worker = worker_store
        .read()
        .await
        .get_worker(employee_id)
        .await
        .map_err(|e| match e {
            WorkerStoreError::WorkerNotFound => {
                ShiftAPIError::NotFound(*employee_id.as_ref())
            }
            e => ShiftAPIError::UnexpectedError(eyre!(e)),
        })?;

    if !worker.is_active {
        return Err(ShiftAPIError::ValidationError(ValidationError::new(
            "Shifts cannot be assigned to an inactive worker".to_string(),
        )));
    }
    Ok(())
}

fn parse_shift_id(raw: &str) -> Result<ShiftId, ShiftAPIError> {
    Ok(ShiftId::parse(raw)?)
}
