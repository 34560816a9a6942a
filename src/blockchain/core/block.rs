use crate::miner::{self, MiningStats};
use crate::transaction::Transaction;
use serde::Serialize;
use std::fmt;

/// `previous_hash` of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// A batch of transactions sealed by proof-of-work.
///
/// `hash` caches the mined digest of
/// `index || previous_hash || timestamp || tx.serialize()... || nonce`.
/// The timestamp is taken at construction, before mining starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    pub hash: String,
    pub timestamp: i64,
    pub nonce: u64,
    pub difficulty: u32,
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(
        index: u64,
        previous_hash: impl Into<String>,
        transactions: Vec<Transaction>,
        difficulty: u32,
    ) -> Self {
        Self::new_at(
            index,
            previous_hash,
            transactions,
            difficulty,
            chrono::Utc::now().timestamp(),
        )
    }

    pub fn new_at(
        index: u64,
        previous_hash: impl Into<String>,
        transactions: Vec<Transaction>,
        difficulty: u32,
        timestamp: i64,
    ) -> Self {
        let mut block = Block {
            index,
            previous_hash: previous_hash.into(),
            hash: String::new(),
            timestamp,
            nonce: 0,
            difficulty,
            transactions,
        };
        block.hash = block.compute_hash();
        block
    }

    /// Every hashed field except the nonce, in hashing order.
    pub fn hash_prefix(&self) -> String {
        let mut prefix = format!("{}{}{}", self.index, self.previous_hash, self.timestamp);
        for tx in &self.transactions {
            prefix.push_str(&tx.serialize());
        }
        prefix
    }

    /// Recompute the digest from the stored fields.
    pub fn compute_hash(&self) -> String {
        miner::hash_with_nonce(&self.hash_prefix(), self.nonce)
    }

    /// Search for a nonce satisfying `difficulty` and cache the result.
    pub fn mine(&mut self) -> MiningStats {
        miner::mine_block(self)
    }

    pub fn meets_difficulty(&self) -> bool {
        miner::meets_difficulty(&self.hash, self.difficulty)
    }

    /// The stored hash satisfies the difficulty and matches a fresh
    /// recomputation, so any edit after mining is caught.
    pub fn is_valid(&self) -> bool {
        self.meets_difficulty() && self.hash == self.compute_hash()
    }
}

impl AsRef<Block> for Block {
    fn as_ref(&self) -> &Block {
        self
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Block #{} [", self.index)?;
        writeln!(f, "  Hash: {}", self.hash)?;
        writeln!(f, "  Previous Hash: {}", self.previous_hash)?;
        writeln!(f, "  Timestamp: {}", self.timestamp)?;
        writeln!(f, "  Nonce: {}", self.nonce)?;
        writeln!(f, "  Transactions: {}", self.transactions.len())?;
        write!(f, "]")
    }
}
