use crate::domain::{Worker, WorkerId, WorkerStore, WorkerStoreError};
use std::collections::HashMap;

#[derive(Default)]
pub struct HashmapWorkerStore {
    workers: HashMap<WorkerId, Worker>,
}

#[async_trait::async_trait]
impl WorkerStore for HashmapWorkerStore {
    async fn add_worker(&mut self, worker: Worker) -> Result<(), WorkerStoreError> {
        if self.workers.contains_key(&worker.id) {
            return Err(WorkerStoreError::WorkerAlreadyExists);
        }

        self.workers.insert(worker.id, worker);
        Ok(())
    }

    async fn get_worker(&self, id: &WorkerId) -> Result<Worker, WorkerStoreError> {
        match self.workers.get(id) {
            Some(worker) => Ok(worker.clone()),
            None => Err(WorkerStoreError::WorkerNotFound),
        }
    }
}
