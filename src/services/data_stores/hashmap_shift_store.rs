use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::{
    has_conflict, ClockEvent, ConflictQuery, Shift, ShiftFilter, ShiftId,
    ShiftStatus, ShiftStore, ShiftStoreError, WorkerId,
};

/// In-memory store. Callers hold the surrounding `RwLock` write guard for
/// the whole of each mutating call, which makes check-and-write atomic.
#[derive(Default)]
pub struct HashmapShiftStore {
    shifts: HashMap<ShiftId, Shift>,
}

impl HashmapShiftStore {
    async fn ensure_no_conflict(&self, shift: &Shift) -> Result<(), ShiftStoreError> {
        if !shift.status.occupies_schedule() {
            return Ok(());
        }
        let existing = self.get_active_shifts(&shift.employee_id, shift.date).await?;
        if has_conflict(&ConflictQuery::for_shift(shift), &existing) {
            return Err(ShiftStoreError::ShiftConflict);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ShiftStore for HashmapShiftStore {
    async fn add_shift(&mut self, shift: &Shift) -> Result<(), ShiftStoreError> {
        if self.shifts.contains_key(&shift.id) {
            return Err(ShiftStoreError::ShiftIdExists);
        }
        self.ensure_no_conflict(shift).await?;

        self.shifts.insert(shift.id, shift.clone());
        Ok(())
    }

    async fn get_shift(&self, id: &ShiftId) -> Result<Shift, ShiftStoreError> {
        match self.shifts.get(id) {
            Some(shift) => Ok(shift.clone()),
            None => Err(ShiftStoreError::ShiftNotFound),
        }
    }

    async fn get_shifts(
        &self,
        filter: &ShiftFilter,
    ) -> Result<Vec<Shift>, ShiftStoreError> {
        let mut shifts: Vec<Shift> = self
            .shifts
            .values()
            .filter(|shift| filter.matches(shift))
            .cloned()
            .collect();
        shifts.sort_by_key(|shift| (shift.date, shift.window.start()));
        Ok(shifts)
    }

    async fn get_active_shifts(
        &self,
        employee_id: &WorkerId,
        date: NaiveDate,
    ) -> Result<Vec<Shift>, ShiftStoreError> {
        Ok(self
            .shifts
            .values()
            .filter(|shift| &shift.employee_id == employee_id)
            .filter(|shift| shift.date == date)
            .filter(|shift| shift.status.occupies_schedule())
            .cloned()
            .collect())
    }

    async fn update_shift(
        &mut self,
        shift: &Shift,
        expected_status: ShiftStatus,
    ) -> Result<(), ShiftStoreError> {
        let current = self
            .shifts
            .get(&shift.id)
            .ok_or(ShiftStoreError::ShiftNotFound)?;
        if current.status != expected_status
            || current.clock_in.is_some() != shift.clock_in.is_some()
        {
            return Err(ShiftStoreError::StatusChanged);
        }
        let mut updated = shift.clone();
        updated.clock_in = current.clock_in.clone();
        updated.clock_out = current.clock_out.clone();
        self.ensure_no_conflict(&updated).await?;

        self.shifts.insert(updated.id, updated);
        Ok(())
    }

    async fn clock_in(
        &mut self,
        id: &ShiftId,
        employee_id: &WorkerId,
        event: ClockEvent,
    ) -> Result<Shift, ShiftStoreError> {
        let shift = self
            .shifts
            .get_mut(id)
            .ok_or(ShiftStoreError::ShiftNotFound)?;
        shift.clock_in(employee_id, event)?;
        Ok(shift.clone())
    }

    async fn clock_out(
        &mut self,
        id: &ShiftId,
        employee_id: &WorkerId,
        event: ClockEvent,
    ) -> Result<Shift, ShiftStoreError> {
        let shift = self
            .shifts
            .get_mut(id)
            .ok_or(ShiftStoreError::ShiftNotFound)?;
        shift.clock_out(employee_id, event)?;
        Ok(shift.clone())
    }

    async fn delete_shift(&mut self, id: &ShiftId) -> Result<(), ShiftStoreError> {
        self.shifts
            .get(id)
            .ok_or(ShiftStoreError::ShiftNotFound)?
            .ensure_deletable()?;
        self.shifts.remove(id);
        Ok(())
    }
}
