// Thin re-export module: the ledger lives in `blockchain/core.rs`, split into
// block sealing, chain ownership and chain validation.

pub mod core;
pub use core::*;
