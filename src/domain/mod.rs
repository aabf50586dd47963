mod clock;
mod clock_time;
mod conflict;
mod data_stores;
mod error;
mod salon_service;
mod shift;
mod shift_patch;
mod stats;
mod time_window;
mod worker;

pub use clock::*;
pub use clock_time::*;
pub use conflict::*;
pub use data_stores::*;
pub use error::*;
pub use salon_service::*;
pub use shift::*;
pub use shift_patch::*;
pub use stats::*;
pub use time_window::*;
pub use worker::*;

#[cfg(test)]
pub(crate) use shift::fixtures;
