use chrono::{DateTime, NaiveDate, Utc};

use super::{
    validate_break, BreakWindow, ClockTime, ServiceId, Shift, ShiftAPIError,
    ShiftStatus, ShiftType, TimeWindow, ValidationError, WorkerId,
};

/// Partial update of a shift. `None` leaves a field untouched; for the
/// clearable fields `Some(None)` removes the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShiftPatch {
    pub employee_id: Option<WorkerId>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub break_window: Option<Option<BreakWindow>>,
    pub shift_type: Option<ShiftType>,
    pub status: Option<ShiftStatus>,
    pub notes: Option<Option<String>>,
    pub services: Option<Vec<ServiceId>>,
}

impl ShiftPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Returns the merged shift, leaving `shift` untouched. Window, break and
    /// status rules are checked against the merged result.
    pub fn apply_to(
        &self,
        shift: &Shift,
        now: DateTime<Utc>,
    ) -> Result<Shift, ShiftAPIError> {
        shift.ensure_editable()?;
        let mut updated = shift.clone();

        if let Some(employee_id) = self.employee_id {
            if employee_id != shift.employee_id && shift.clock_in.is_some() {
                return Err(ShiftAPIError::ValidationError(
                    ValidationError::new(
                        "Cannot reassign a shift after clock-in".to_string(),
                    ),
                ));
            }
            updated.employee_id = employee_id;
        }

        if let Some(date) = self.date {
            updated.date = date;
        }

        if self.start_time.is_some() || self.end_time.is_some() {
            updated.window = TimeWindow::new(
                self.start_time.unwrap_or(shift.window.start()),
                self.end_time.unwrap_or(shift.window.end()),
            )?;
        }

        if let Some(break_window) = &self.break_window {
            updated.break_window = break_window.clone();
        }
        validate_break(&updated.window, updated.break_window.as_ref())?;

        if let Some(shift_type) = self.shift_type {
            updated.shift_type = shift_type;
        }

        if let Some(notes) = &self.notes {
            updated.notes = notes.clone();
        }

        if let Some(services) = &self.services {
            updated.services = services.clone();
        }

        if let Some(status) = self.status {
            updated.transition_to(status)?;
        }

        updated.updated_at = now;
        Ok(updated)
    }
}
