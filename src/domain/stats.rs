use serde::Serialize;
use std::collections::BTreeMap;

use super::{Shift, ShiftStatus, ShiftType};

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Hours from the scheduled window less the break. Clock-in/out times are
/// recorded but not used here.
pub fn shift_duration_hours(shift: &Shift) -> f64 {
    round_to(f64::from(shift.net_minutes()) / 60.0, 2)
}

pub fn total_working_hours(shifts: &[Shift]) -> f64 {
    let total: f64 = shifts
        .iter()
        .filter(|shift| shift.status == ShiftStatus::Completed)
        .map(shift_duration_hours)
        .sum();
    round_to(total, 2)
}

pub fn completion_rate(shifts: &[Shift]) -> f64 {
    if shifts.is_empty() {
        return 0.0;
    }
    let completed = count_with_status(shifts, ShiftStatus::Completed);
    round_to(completed as f64 / shifts.len() as f64 * 100.0, 1)
}

pub fn shifts_by_type(shifts: &[Shift]) -> BTreeMap<ShiftType, usize> {
    shifts.iter().fold(BTreeMap::new(), |mut counts, shift| {
        *counts.entry(shift.shift_type).or_insert(0) += 1;
        counts
    })
}

fn count_with_status(shifts: &[Shift], status: ShiftStatus) -> usize {
    shifts.iter().filter(|shift| shift.status == status).count()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftStats {
    pub total_shifts: usize,
    pub scheduled_shifts: usize,
    pub completed_shifts: usize,
    pub cancelled_shifts: usize,
    pub no_show_shifts: usize,
    pub total_working_hours: f64,
    pub completion_rate: f64,
    pub shifts_by_type: BTreeMap<ShiftType, usize>,
}

impl ShiftStats {
    pub fn from_shifts(shifts: &[Shift]) -> Self {
        Self {
            total_shifts: shifts.len(),
            scheduled_shifts: count_with_status(shifts, ShiftStatus::Scheduled),
            completed_shifts: count_with_status(shifts, ShiftStatus::Completed),
            cancelled_shifts: count_with_status(shifts, ShiftStatus::Cancelled),
            no_show_shifts: count_with_status(shifts, ShiftStatus::NoShow),
            total_working_hours: total_working_hours(shifts),
            completion_rate: completion_rate(shifts),
            shifts_by_type: shifts_by_type(shifts),
        }
    }
}
