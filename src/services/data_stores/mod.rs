mod hashmap_service_store;
mod hashmap_shift_store;
mod hashmap_worker_store;
mod postgres_service_store;
mod postgres_shift_store;
mod postgres_worker_store;

pub use hashmap_service_store::*;
pub use hashmap_shift_store::*;
pub use hashmap_worker_store::*;
pub use postgres_service_store::*;
pub use postgres_shift_store::*;
pub use postgres_worker_store::*;
