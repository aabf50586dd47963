use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use super::{
    BreakWindow, ServiceId, TimeWindow, TimeWindowError, ValidationError,
    WorkerId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    pub id: ShiftId,
    pub employee_id: WorkerId,
    pub date: NaiveDate,
    pub window: TimeWindow,
    pub break_window: Option<BreakWindow>,
    pub status: ShiftStatus,
    pub shift_type: ShiftType,
    pub notes: Option<String>,
    pub clock_in: Option<ClockEvent>,
    pub clock_out: Option<ClockEvent>,
    pub assigned_by: WorkerId,
    pub services: Vec<ServiceId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Manager-supplied fields of a shift that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewShift {
    pub employee_id: WorkerId,
    pub date: NaiveDate,
    pub window: TimeWindow,
    pub break_window: Option<BreakWindow>,
    pub shift_type: ShiftType,
    pub notes: Option<String>,
    pub assigned_by: WorkerId,
    pub services: Vec<ServiceId>,
}

impl Shift {
    pub fn new(
        new_shift: NewShift,
        now: DateTime<Utc>,
    ) -> Result<Self, TimeWindowError> {
        validate_break(&new_shift.window, new_shift.break_window.as_ref())?;

        Ok(Self {
            id: ShiftId::default(),
            employee_id: new_shift.employee_id,
            date: new_shift.date,
            window: new_shift.window,
            break_window: new_shift.break_window,
            status: ShiftStatus::Scheduled,
            shift_type: new_shift.shift_type,
            notes: new_shift.notes,
            clock_in: None,
            clock_out: None,
            assigned_by: new_shift.assigned_by,
            services: new_shift.services,
            created_at: now,
            updated_at: now,
        })
    }

    /// Scheduled minutes less the break. Construction guarantees this is
    /// never negative.
    pub fn net_minutes(&self) -> i32 {
        self.window
            .net_minutes(self.break_window.as_ref())
            .unwrap_or(0)
    }

    pub fn is_assigned_to(&self, worker_id: &WorkerId) -> bool {
        &self.employee_id == worker_id
    }

    pub fn clock_in(
        &mut self,
        worker_id: &WorkerId,
        event: ClockEvent,
    ) -> Result<(), ShiftStateError> {
        if !self.is_assigned_to(worker_id) {
            return Err(ShiftStateError::NotAssignedEmployee);
        }
        if self.clock_in.is_some() {
            return Err(ShiftStateError::AlreadyClockedIn);
        }
        if self.status != ShiftStatus::Scheduled {
            return Err(ShiftStateError::Finalized(self.status));
        }

        self.updated_at = event.time;
        self.clock_in = Some(event);
        Ok(())
    }

    pub fn clock_out(
        &mut self,
        worker_id: &WorkerId,
        event: ClockEvent,
    ) -> Result<(), ShiftStateError> {
        if !self.is_assigned_to(worker_id) {
            return Err(ShiftStateError::NotAssignedEmployee);
        }
        if self.clock_out.is_some() {
            return Err(ShiftStateError::AlreadyClockedOut);
        }
        if self.status != ShiftStatus::Scheduled {
            return Err(ShiftStateError::Finalized(self.status));
        }
        let clocked_in_at = match &self.clock_in {
            Some(clock_in) => clock_in.time,
            None => return Err(ShiftStateError::NotClockedIn),
        };
        if event.time <= clocked_in_at {
            return Err(ShiftStateError::ClockOutBeforeClockIn);
        }

        self.updated_at = event.time;
        self.clock_out = Some(event);
        self.status = ShiftStatus::Completed;
        Ok(())
    }

    /// Manager-driven status change. `Completed` is only reachable through
    /// clock-out.
    pub fn transition_to(
        &mut self,
        status: ShiftStatus,
    ) -> Result<(), ShiftStateError> {
        if self.status.is_terminal() {
            return Err(ShiftStateError::Finalized(self.status));
        }

        match status {
            ShiftStatus::Scheduled | ShiftStatus::Cancelled => (),
            ShiftStatus::NoShow if self.clock_in.is_none() => (),
            to => {
                return Err(ShiftStateError::InvalidTransition {
                    from: self.status,
                    to,
                })
            }
        }

        self.status = status;
        Ok(())
    }

    pub fn ensure_editable(&self) -> Result<(), ShiftStateError> {
        if self.status.is_terminal() {
            return Err(ShiftStateError::Finalized(self.status));
        }
        Ok(())
    }

    pub fn ensure_deletable(&self) -> Result<(), ShiftStateError> {
        if self.status == ShiftStatus::Completed {
            return Err(ShiftStateError::CannotDeleteCompleted);
        }
        Ok(())
    }
}

pub fn validate_break(
    window: &TimeWindow,
    break_window: Option<&BreakWindow>,
) -> Result<(), TimeWindowError> {
    window.net_minutes(break_window).map(|_| ())
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; the time of day is dropped.
pub fn parse_shift_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| {
            DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive())
        })
        .map_err(|_| {
            ValidationError::new(format!(
                "Invalid date: {raw:?}, expected YYYY-MM-DD"
            ))
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShiftStateError {
    #[error("Only the assigned employee can clock in or out of this shift")]
    NotAssignedEmployee,
    #[error("Employee has already clocked in for this shift")]
    AlreadyClockedIn,
    #[error("Employee has not clocked in for this shift")]
    NotClockedIn,
    #[error("Employee has already clocked out for this shift")]
    AlreadyClockedOut,
    #[error("Clock-out time must be after clock-in time")]
    ClockOutBeforeClockIn,
    #[error("Shift is {0} and can no longer be changed")]
    Finalized(ShiftStatus),
    #[error("Shift cannot move from {from} to {to}")]
    InvalidTransition { from: ShiftStatus, to: ShiftStatus },
    #[error("Completed shifts cannot be deleted")]
    CannotDeleteCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(Uuid);

impl ShiftId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = uuid::Uuid::try_parse(id).map_err(|e| {
            ValidationError::new(format!("Invalid shift ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ShiftId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for ShiftId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftStatus {
    Scheduled,
    Completed,
    Cancelled,
    #[serde(rename = "No-Show")]
    NoShow,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "Scheduled",
            ShiftStatus::Completed => "Completed",
            ShiftStatus::Cancelled => "Cancelled",
            ShiftStatus::NoShow => "No-Show",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ShiftStatus::Scheduled)
    }

    /// Statuses that hold the employee's time and take part in conflict
    /// checks.
    pub fn occupies_schedule(&self) -> bool {
        matches!(self, ShiftStatus::Scheduled | ShiftStatus::Completed)
    }
}

impl Default for ShiftStatus {
    fn default() -> Self {
        ShiftStatus::Scheduled
    }
}

impl FromStr for ShiftStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" | "scheduled" => Ok(ShiftStatus::Scheduled),
            "Completed" | "completed" => Ok(ShiftStatus::Completed),
            "Cancelled" | "cancelled" => Ok(ShiftStatus::Cancelled),
            "No-Show" | "no-show" => Ok(ShiftStatus::NoShow),
            _ => Err(ValidationError::new(format!("Invalid shift status: {s}"))),
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ShiftType {
    Regular,
    Overtime,
    Holiday,
    Training,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Regular => "Regular",
            ShiftType::Overtime => "Overtime",
            ShiftType::Holiday => "Holiday",
            ShiftType::Training => "Training",
        }
    }
}

impl Default for ShiftType {
    fn default() -> Self {
        ShiftType::Regular
    }
}

impl FromStr for ShiftType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Regular" | "regular" => Ok(ShiftType::Regular),
            "Overtime" | "overtime" => Ok(ShiftType::Overtime),
            "Holiday" | "holiday" => Ok(ShiftType::Holiday),
            "Training" | "training" => Ok(ShiftType::Training),
            _ => Err(ValidationError::new(format!("Invalid shift type: {s}"))),
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockEvent {
    pub time: DateTime<Utc>,
    pub location: Option<String>,
}

impl ClockEvent {
    pub fn new(time: DateTime<Utc>, location: Option<String>) -> Self {
        Self { time, location }
    }
}
