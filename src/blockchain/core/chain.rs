use super::block::{Block, GENESIS_PREVIOUS_HASH};
use super::validation::{validate_chain, ChainValidity};
use crate::config::LedgerConfig;
use crate::error::Result;
use crate::transaction::{Transaction, TransactionType};
use parking_lot::{Mutex, MutexGuard, RwLock};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const GENESIS_SENDER: &str = "SYSTEM";
pub const GENESIS_PAYLOAD: &str = r#"{"message":"Genesis Block - Bitea Social Media Blockchain"}"#;

/// Chain and pending queue, always locked together.
#[derive(Debug)]
struct LedgerState {
    chain: Vec<Arc<Block>>,
    pending: VecDeque<Transaction>,
}

#[derive(Debug)]
struct LedgerInner {
    state: RwLock<LedgerState>,
    /// Held for the whole of a mine-and-append cycle. At most one candidate
    /// block exists at a time, so no two miners build on the same tip.
    mining: Mutex<()>,
    difficulty: u32,
    max_transactions_per_block: usize,
}

/// The append-only ledger of user actions.
///
/// Cloning yields another handle to the same ledger. Construct one at
/// startup and hand clones to every request handler.
///
/// Mining happens on a local candidate outside the state lock; only the
/// append (together with draining the consumed transactions) takes the
/// write lock. Readers therefore see either the old tip with the batch
/// still pending, or the new tip with the batch gone.
#[derive(Debug, Clone)]
pub struct Ledger {
    inner: Arc<LedgerInner>,
}

/// Point-in-time summary of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainInfo {
    pub blocks: usize,
    pub pending: usize,
    pub difficulty: u32,
    pub max_transactions_per_block: usize,
    pub valid: bool,
}

impl fmt::Display for ChainInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Blockchain Info:")?;
        writeln!(f, "  Blocks: {}", self.blocks)?;
        writeln!(f, "  Pending Transactions: {}", self.pending)?;
        writeln!(f, "  Difficulty: {}", self.difficulty)?;
        writeln!(f, "  Batch Size: {}", self.max_transactions_per_block)?;
        write!(f, "  Valid: {}", if self.valid { "Yes" } else { "No" })
    }
}

impl Ledger {
    /// Build a ledger, mining its genesis block before returning.
    pub fn new(difficulty: u32, max_transactions_per_block: usize) -> Result<Self> {
        let config = LedgerConfig {
            difficulty,
            max_transactions_per_block,
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        config.validate()?;

        let genesis = Self::create_genesis_block(config.difficulty);
        info!(
            hash = %genesis.hash,
            nonce = genesis.nonce,
            difficulty = config.difficulty,
            "Genesis block mined"
        );

        Ok(Ledger {
            inner: Arc::new(LedgerInner {
                state: RwLock::new(LedgerState {
                    chain: vec![Arc::new(genesis)],
                    pending: VecDeque::new(),
                }),
                mining: Mutex::new(()),
                difficulty: config.difficulty,
                max_transactions_per_block: config.max_transactions_per_block,
            }),
        })
    }

    fn create_genesis_block(difficulty: u32) -> Block {
        let genesis_tx = Transaction::new(
            GENESIS_SENDER,
            TransactionType::UserRegistration,
            GENESIS_PAYLOAD,
        );
        let mut block = Block::new(0, GENESIS_PREVIOUS_HASH, vec![genesis_tx], difficulty);
        block.mine();
        block
    }

    pub fn difficulty(&self) -> u32 {
        self.inner.difficulty
    }

    pub fn max_transactions_per_block(&self) -> usize {
        self.inner.max_transactions_per_block
    }

    /// Queue `tx`. When the queue reaches the batch size this call also
    /// mines, blocking until the batch is sealed. Returns the blocks sealed
    /// by this call, oldest first.
    pub fn submit_transaction(&self, tx: Transaction) -> Vec<Arc<Block>> {
        let pending = {
            let mut state = self.inner.state.write();
            debug!(
                id = tx.id(),
                tx_type = %tx.tx_type(),
                pending = state.pending.len() + 1,
                "Transaction queued"
            );
            state.pending.push_back(tx);
            state.pending.len()
        };

        if pending < self.inner.max_transactions_per_block {
            return Vec::new();
        }

        // Another submitter may have mined our batch while we waited for the
        // mining lock, so the threshold is checked again under it.
        let guard = self.inner.mining.lock();
        let mut sealed = Vec::new();
        while self.pending_count() >= self.inner.max_transactions_per_block {
            match self.mine_next(&guard) {
                Some(block) => sealed.push(block),
                None => break,
            }
        }
        sealed
    }

    /// Mine the oldest pending transactions (up to the batch size) into one
    /// block. A no-op returning `None` when nothing is pending.
    pub fn mine_batch(&self) -> Option<Arc<Block>> {
        let guard = self.inner.mining.lock();
        self.mine_next(&guard)
    }

    fn mine_next(&self, _guard: &MutexGuard<'_, ()>) -> Option<Arc<Block>> {
        loop {
            let (mut candidate, count) = {
                let state = self.inner.state.read();
                if state.pending.is_empty() {
                    debug!("No pending transactions to mine");
                    return None;
                }

                let count = state.pending.len().min(self.inner.max_transactions_per_block);
                let batch: Vec<Transaction> = state.pending.iter().take(count).cloned().collect();
                let tip = Self::tip(&state);
                let candidate = Block::new(
                    tip.index + 1,
                    tip.hash.clone(),
                    batch,
                    self.inner.difficulty,
                );
                (candidate, count)
            };

            info!(
                index = candidate.index,
                transactions = count,
                difficulty = candidate.difficulty,
                "Mining block"
            );
            let stats = candidate.mine();

            let mut state = self.inner.state.write();
            let tip_unchanged = Self::tip(&state).hash == candidate.previous_hash;
            let batch_unchanged = state
                .pending
                .iter()
                .take(count)
                .eq(candidate.transactions.iter());
            if !(tip_unchanged && batch_unchanged) {
                warn!(
                    index = candidate.index,
                    "Chain moved during mining, discarding candidate"
                );
                continue;
            }

            let block = Arc::new(candidate);
            state.chain.push(Arc::clone(&block));
            state.pending.drain(..count);

            info!(
                index = block.index,
                hash = %block.hash,
                nonce = block.nonce,
                attempts = stats.attempts,
                elapsed_ms = stats.elapsed.as_millis() as u64,
                "Block mined"
            );
            return Some(block);
        }
    }

    fn tip(state: &LedgerState) -> &Arc<Block> {
        // The chain always holds at least the genesis block.
        &state.chain[state.chain.len() - 1]
    }

    pub fn chain_length(&self) -> usize {
        self.inner.state.read().chain.len()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.state.read().pending.len()
    }

    /// Snapshot of the whole chain, genesis first.
    pub fn chain(&self) -> Vec<Arc<Block>> {
        self.inner.state.read().chain.clone()
    }

    pub fn latest_block(&self) -> Arc<Block> {
        Arc::clone(Self::tip(&self.inner.state.read()))
    }

    pub fn block(&self, index: usize) -> Option<Arc<Block>> {
        self.inner.state.read().chain.get(index).cloned()
    }

    /// Snapshot of the pending queue, oldest first.
    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.inner.state.read().pending.iter().cloned().collect()
    }

    /// Walk the chain and report the first offending block.
    pub fn validate(&self) -> ChainValidity {
        let chain = self.chain();
        let validity = validate_chain(&chain);
        if let ChainValidity::Invalid { index, reason } = validity {
            warn!(index, reason = %reason, "Chain validation failed");
        }
        validity
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    /// Summary of one consistent snapshot: counts and validity all describe
    /// the same chain.
    pub fn info(&self) -> ChainInfo {
        let (chain, pending) = {
            let state = self.inner.state.read();
            (state.chain.clone(), state.pending.len())
        };
        let validity = validate_chain(&chain);
        if let ChainValidity::Invalid { index, reason } = validity {
            warn!(index, reason = %reason, "Chain validation failed");
        }
        ChainInfo {
            blocks: chain.len(),
            pending,
            difficulty: self.inner.difficulty,
            max_transactions_per_block: self.inner.max_transactions_per_block,
            valid: validity.is_valid(),
        }
    }
}
