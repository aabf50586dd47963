use chrono::{DateTime, Utc};

/// Source of "now" for clock events and audit timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}
