use chrono::NaiveDate;
use color_eyre::eyre::Report;
use thiserror::Error;

use super::{
    ClockEvent, SalonService, ServiceId, Shift, ShiftId, ShiftStateError,
    ShiftStatus, Worker, WorkerId,
};

/// Persistence for shifts. Every mutating method is atomic with respect to
/// other callers: guards are evaluated against the stored record in the same
/// critical section as the write.
#[async_trait::async_trait]
pub trait ShiftStore {
    /// Inserts the shift unless it overlaps another active shift of the same
    /// employee on the same date.
    async fn add_shift(&mut self, shift: &Shift) -> Result<(), ShiftStoreError>;
    async fn get_shift(&self, id: &ShiftId) -> Result<Shift, ShiftStoreError>;
    async fn get_shifts(
        &self,
        filter: &ShiftFilter,
    ) -> Result<Vec<Shift>, ShiftStoreError>;
    /// Scheduled or completed shifts of the employee on exactly `date`.
    async fn get_active_shifts(
        &self,
        employee_id: &WorkerId,
        date: NaiveDate,
    ) -> Result<Vec<Shift>, ShiftStoreError>;
    /// Replaces the stored shift if its status is still `expected_status`, its
    /// clock-in presence still matches `shift`, and the new placement does not
    /// overlap another active shift. Clock events are never overwritten.
    async fn update_shift(
        &mut self,
        shift: &Shift,
        expected_status: ShiftStatus,
    ) -> Result<(), ShiftStoreError>;
    async fn clock_in(
        &mut self,
        id: &ShiftId,
        employee_id: &WorkerId,
        event: ClockEvent,
    ) -> Result<Shift, ShiftStoreError>;
    async fn clock_out(
        &mut self,
        id: &ShiftId,
        employee_id: &WorkerId,
        event: ClockEvent,
    ) -> Result<Shift, ShiftStoreError>;
    async fn delete_shift(&mut self, id: &ShiftId) -> Result<(), ShiftStoreError>;
}

#[derive(Debug, Error)]
pub enum ShiftStoreError {
    #[error("Shift not found")]
    ShiftNotFound,
    #[error("Shift ID exists")]
    ShiftIdExists,
    #[error("Shift overlaps an existing shift")]
    ShiftConflict,
    #[error("Shift status changed concurrently")]
    StatusChanged,
    #[error("Shift state error")]
    InvalidState(#[from] ShiftStateError),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for ShiftStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            _ => matches!(
                (self, other),
                (Self::ShiftNotFound, Self::ShiftNotFound)
                    | (Self::ShiftIdExists, Self::ShiftIdExists)
                    | (Self::ShiftConflict, Self::ShiftConflict)
                    | (Self::StatusChanged, Self::StatusChanged)
                    | (Self::UnexpectedError(_), Self::UnexpectedError(_))
            ),
        }
    }
}

/// Query window for listings and stats. Every field narrows the result;
/// dates are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub employee_id: Option<WorkerId>,
    pub status: Option<ShiftStatus>,
}

impl ShiftFilter {
    pub fn matches(&self, shift: &Shift) -> bool {
        self.start_date.map_or(true, |start| shift.date >= start)
            && self.end_date.map_or(true, |end| shift.date <= end)
            && self
                .employee_id
                .map_or(true, |employee_id| shift.employee_id == employee_id)
            && self.status.map_or(true, |status| shift.status == status)
    }
}

#[async_trait::async_trait]
pub trait WorkerStore {
    async fn add_worker(&mut self, worker: Worker) -> Result<(), WorkerStoreError>;
    async fn get_worker(&self, id: &WorkerId) -> Result<Worker, WorkerStoreError>;
}

#[derive(Debug, Error)]
pub enum WorkerStoreError {
    #[error("Worker already exists")]
    WorkerAlreadyExists,
    #[error("Worker not found")]
    WorkerNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for WorkerStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::WorkerAlreadyExists, Self::WorkerAlreadyExists)
                | (Self::WorkerNotFound, Self::WorkerNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait ServiceStore {
    async fn add_service(
        &mut self,
        service: SalonService,
    ) -> Result<(), ServiceStoreError>;
    async fn get_service(
        &self,
        id: &ServiceId,
    ) -> Result<SalonService, ServiceStoreError>;
}

#[derive(Debug, Error)]
pub enum ServiceStoreError {
    #[error("Service already exists")]
    ServiceAlreadyExists,
    #[error("Service not found")]
    ServiceNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for ServiceStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::ServiceAlreadyExists, Self::ServiceAlreadyExists)
                | (Self::ServiceNotFound, Self::ServiceNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
