//! Persistence Adapters - Repository implementations
//!
//! These implement `GameRepository` from ttt-domain.

pub mod file_system;
pub mod in_memory;
pub mod record;

pub use file_system::FileGameRepository;
pub use in_memory::InMemoryGameRepository;
pub use record::{GameRecord, StoreError};
