use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::TimeWindowError;

pub const MINUTES_PER_DAY: i32 = 1440;

lazy_static! {
    static ref CLOCK_TIME_REGEX: Regex =
        Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$")
            .expect("Regex for ClockTime parser is invalid");
}

/// Wall-clock time of day, stored as minutes after midnight (0..=1439).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(i32);

impl ClockTime {
    pub fn parse(time: &str) -> Result<Self, TimeWindowError> {
        if !CLOCK_TIME_REGEX.is_match(time) {
            return Err(TimeWindowError::InvalidTimeFormat(time.to_owned()));
        }

        let invalid = || TimeWindowError::InvalidTimeFormat(time.to_owned());
        let (hours, minutes) = time.split_once(':').ok_or_else(invalid)?;
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;

        Ok(Self(hours * 60 + minutes))
    }

    pub fn from_minutes(minutes: i32) -> Result<Self, TimeWindowError> {
        match minutes {
            m if m < 0 => Err(TimeWindowError::InvalidTimeFormat(format!(
                "{m} minutes is before midnight"
            ))),
            m if m >= MINUTES_PER_DAY => {
                Err(TimeWindowError::InvalidTimeFormat(format!(
                    "{m} minutes is after midnight"
                )))
            }
            m => Ok(Self(m)),
        }
    }

    pub fn value_of(&self) -> i32 {
        self.0
    }

    pub fn is_before(&self, other: &ClockTime) -> bool {
        self.0 < other.0
    }

    pub fn to_hours(&self) -> (i32, i32) {
        (self.0 / 60, self.0 % 60)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hours, minutes) = self.to_hours();
        write!(f, "{hours:02}:{minutes:02}")
    }
}

impl FromStr for ClockTime {
    type Err = TimeWindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
