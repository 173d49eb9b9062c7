//! # pc-01-ledger
//!
//! Replicated Ledger subsystem for Provenance-Chain.
//!
//! ## Role in System
//!
//! - **Execution substrate**: contracts run against a [`ChaincodeStub`] that
//!   records a read/write set instead of mutating state
//! - **Ordering**: envelopes are cut into blocks by message count, byte size
//!   and batch timeout
//! - **Commit**: multi-version concurrency control rejects any transaction
//!   whose reads went stale before it was ordered
//!
//! ## Transaction Flow
//!
//! ```text
//! new_context() → simulator() → [contract code] → into_envelope()
//!                                                      │
//!                                                      ↓
//!                                   submit() → BlockCutter → validate_block()
//!                                                                 │
//!                                        CommitReceipt ←──────────┤
//!                                        BlockCommitted ←─────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Blocks are committed strictly in sequence; each is applied atomically
//! - Invalid transactions leave no state behind
//! - Two transactions that read the same key and are ordered together or
//!   back to back: at most one commits
//! - Transaction timestamps come from the ledger's [`TimeSource`], never from
//!   the client

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod events;
pub mod ports;

pub use adapters::*;
pub use application::*;
pub use config::{BatchConfig, LedgerConfig};
pub use domain::*;
pub use events::*;
pub use ports::*;

/// Subsystem identifier used in log fields.
pub const SUBSYSTEM_ID: u8 = 1;
