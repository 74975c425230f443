pub mod memory;
pub mod mysql;

pub use burrow_core::repository::{ReadRepository, Repository};
pub use burrow_core::StorageError;
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
