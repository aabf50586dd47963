use secrecy::Secret;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Clock, ServiceStore, ShiftStore, WorkerStore};

pub type ShiftStoreType = Arc<RwLock<dyn ShiftStore + Send + Sync>>;
pub type WorkerStoreType = Arc<RwLock<dyn WorkerStore + Send + Sync>>;
pub type ServiceStoreType = Arc<RwLock<dyn ServiceStore + Send + Sync>>;
pub type ClockType = Arc<dyn Clock + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub shift_store: ShiftStoreType,
    pub worker_store: WorkerStoreType,
    pub service_store: ServiceStoreType,
    pub clock: ClockType,
    pub jwt_secret: Arc<Secret<String>>,
}

impl AppState {
    pub fn new(
        shift_store: ShiftStoreType,
        worker_store: WorkerStoreType,
        service_store: ServiceStoreType,
        clock: ClockType,
        jwt_secret: Secret<String>,
    ) -> Self {
        Self {
            shift_store,
            worker_store,
            service_store,
            clock,
            jwt_secret: Arc::new(jwt_secret),
        }
    }
}
