//! End-to-end flows through `ProvenanceService` and `Ledger`.

pub mod concurrency;
pub mod history;
pub mod lifecycle;
pub mod payload;
