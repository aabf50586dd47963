use chrono::NaiveDate;

use super::{Shift, ShiftId, TimeWindow, WorkerId};

/// Candidate placement of a shift, checked against what is already booked.
#[derive(Debug, Clone, Copy)]
pub struct ConflictQuery<'a> {
    pub employee_id: &'a WorkerId,
    pub date: NaiveDate,
    pub window: &'a TimeWindow,
    pub exclude: Option<&'a ShiftId>,
}

impl<'a> ConflictQuery<'a> {
    /// Query for a shift's own placement, skipping its stored record.
    pub fn for_shift(shift: &'a Shift) -> Self {
        Self {
            employee_id: &shift.employee_id,
            date: shift.date,
            window: &shift.window,
            exclude: Some(&shift.id),
        }
    }
}

/// First shift in `existing` that collides with the query: same employee,
/// same date, a schedule-occupying status, not excluded, and an overlapping
/// window.
pub fn find_conflict<'s>(
    query: &ConflictQuery<'_>,
    existing: &'s [Shift],
) -> Option<&'s Shift> {
    existing
        .iter()
        .filter(|shift| &shift.employee_id == query.employee_id)
        .filter(|shift| shift.date == query.date)
        .filter(|shift| shift.status.occupies_schedule())
        .filter(|shift| Some(&shift.id) != query.exclude)
        .find(|shift| shift.window.overlaps(query.window))
}

pub fn has_conflict(query: &ConflictQuery<'_>, existing: &[Shift]) -> bool {
    find_conflict(query, existing).is_some()
}
