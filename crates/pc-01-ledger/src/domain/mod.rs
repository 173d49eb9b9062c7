pub mod cutter;
pub mod entities;
pub mod errors;
pub mod mvcc;
pub mod rwset;
pub mod transaction;

pub use cutter::BlockCutter;
pub use entities::*;
pub use errors::*;
pub use mvcc::validate_block;
pub use rwset::ReadWriteSet;
pub use transaction::*;
