//! # Provenance-Chain Test Suite
//!
//! Cross-crate tests that run the provenance contract on a live ledger.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs       # Ledger/service builders and request factories
//! │   └── integration/      # End-to-end flows
//! │       ├── lifecycle.rs  # Scenario flows, certified and rejected
//! │       ├── concurrency.rs# MVCC races between submitters
//! │       ├── history.rs    # Corrupt and missing history entries
//! │       ├── payload.rs    # Lightweight vs naive evidence
//! │       └── dispatch.rs   # String-argument invocation
//! └── benches/
//!     └── payload_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pc-tests
//! cargo test -p pc-tests integration::concurrency::
//! cargo bench -p pc-tests
//! ```

pub mod fixtures;
pub mod integration;
