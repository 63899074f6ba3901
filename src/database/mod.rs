pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod record;
pub mod repository;
pub mod users;

pub use manager::{DatabaseError, DatabaseManager, MIGRATOR};
pub use memory::{MemoryRepository, MemoryUserStore};
pub use record::{Record, Resource};
pub use repository::{RecordStore, Repository};
pub use users::{PgUserStore, UserStore};
