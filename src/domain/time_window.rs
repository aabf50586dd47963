use serde::Serialize;
use thiserror::Error;

use super::{ClockTime, MINUTES_PER_DAY};

pub const MIN_SHIFT_MINUTES: i32 = 30;
pub const MAX_SHIFT_MINUTES: i32 = 16 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeWindowError {
    #[error("Invalid time format: {0:?}, expected HH:MM")]
    InvalidTimeFormat(String),
    #[error("Shift duration must be between 30 minutes and 16 hours, got {0} minutes")]
    DurationOutOfBounds(i32),
    #[error("Break duration cannot be negative")]
    NegativeBreak,
    #[error("Break of {break_minutes} minutes exceeds the {scheduled_minutes} minute shift")]
    BreakExceedsShift {
        scheduled_minutes: i32,
        break_minutes: i32,
    },
}

/// Minutes from `start` to `end`, wrapping past midnight at most once.
pub fn scheduled_minutes(start: &ClockTime, end: &ClockTime) -> i32 {
    let minutes = end.value_of() - start.value_of();
    if minutes < 0 {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

pub fn net_minutes(
    start: &ClockTime,
    end: &ClockTime,
    break_minutes: i32,
) -> Result<i32, TimeWindowError> {
    if break_minutes < 0 {
        return Err(TimeWindowError::NegativeBreak);
    }
    let scheduled = scheduled_minutes(start, end);
    match scheduled - break_minutes {
        net if net < 0 => Err(TimeWindowError::BreakExceedsShift {
            scheduled_minutes: scheduled,
            break_minutes,
        }),
        net => Ok(net),
    }
}

/// Start/end pair of a shift. `end` before `start` means the shift runs
/// past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: ClockTime,
    end: ClockTime,
}

impl TimeWindow {
    /// The 30 minute / 16 hour bound applies to the scheduled span, before
    /// any break is taken off.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self, TimeWindowError> {
        let window = Self { start, end };
        match window.scheduled_minutes() {
            m if !(MIN_SHIFT_MINUTES..=MAX_SHIFT_MINUTES).contains(&m) => {
                Err(TimeWindowError::DurationOutOfBounds(m))
            }
            _ => Ok(window),
        }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, TimeWindowError> {
        Self::new(ClockTime::parse(start)?, ClockTime::parse(end)?)
    }

    pub fn start(&self) -> ClockTime {
        self.start
    }

    pub fn end(&self) -> ClockTime {
        self.end
    }

    pub fn is_overnight(&self) -> bool {
        self.end.is_before(&self.start)
    }

    pub fn scheduled_minutes(&self) -> i32 {
        scheduled_minutes(&self.start, &self.end)
    }

    pub fn net_minutes(
        &self,
        break_window: Option<&BreakWindow>,
    ) -> Result<i32, TimeWindowError> {
        let break_minutes =
            break_window.map(|b| b.duration_minutes()).unwrap_or(0);
        net_minutes(&self.start, &self.end, break_minutes)
    }

    /// Half-open overlap on the raw minute offsets. Touching windows do not
    /// overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start.value_of() < other.end.value_of()
            && self.end.value_of() > other.start.value_of()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakWindow {
    start: Option<ClockTime>,
    end: Option<ClockTime>,
    duration_minutes: i32,
}

impl BreakWindow {
    pub fn new(
        start: Option<ClockTime>,
        end: Option<ClockTime>,
        duration_minutes: i32,
    ) -> Result<Self, TimeWindowError> {
        if duration_minutes < 0 {
            return Err(TimeWindowError::NegativeBreak);
        }
        Ok(Self {
            start,
            end,
            duration_minutes,
        })
    }

    pub fn start(&self) -> Option<ClockTime> {
        self.start
    }

    pub fn end(&self) -> Option<ClockTime> {
        self.end
    }

    pub fn duration_minutes(&self) -> i32 {
        self.duration_minutes
    }
}
