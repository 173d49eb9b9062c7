pub mod committer;
pub mod service;
pub mod simulator;

pub use committer::{CommittedBlock, Committer};
pub use service::{Ledger, LedgerStats};
pub use simulator::TxSimulator;
