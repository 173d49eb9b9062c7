pub mod clock;
pub mod memory_state;
#[cfg(feature = "rocksdb")]
pub mod rocksdb_state;

pub use clock::{ManualClock, SystemClock};
pub use memory_state::InMemoryWorldState;
#[cfg(feature = "rocksdb")]
pub use rocksdb_state::{RocksDbConfig, RocksDbWorldState};
