pub mod data_stores;
mod system_clock;

pub use system_clock::*;
