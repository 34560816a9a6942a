//! Bitea - a tamper-evident ledger of social-media actions
//!
//! Every registration, post, like, comment and follow is recorded as a
//! [`transaction::Transaction`], batched into blocks and sealed with a
//! proof-of-work hash. The ledger is a single local writer; proof-of-work is
//! a computational throttle and tamper-evidence mechanism, not consensus.
//!
//! # Architecture
//!
//! ## Core Ledger
//! - [`transaction`] - Immutable user-action records and their hash input
//! - [`blockchain`] - Blocks, the ledger (chain + pending queue) and validation
//! - [`miner`] - Proof-of-work nonce search
//!
//! ## Integration
//! - `api` - REST endpoints over a shared ledger (feature `api`)
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod blockchain;
pub mod miner;
pub mod transaction;

// ============================================================================
// Integration
// ============================================================================
#[cfg(feature = "api")]
pub mod api;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;

pub use blockchain::{Block, ChainInfo, ChainValidity, InvalidReason, Ledger};
pub use error::{ChainError, Result};
pub use transaction::{Transaction, TransactionType};
