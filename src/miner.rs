//! Proof-of-work nonce search
//!
//! A block hash is the lowercase hex SHA-256 of the block's canonical string
//! with the decimal nonce appended last. Everything before the nonce is fixed
//! for a candidate, so the search hashes that prefix once and clones the
//! hasher state for each attempt.

use crate::blockchain::Block;
use sha2::{Digest, Sha256};
use std::time::{Duration, Instant};

/// Outcome of one completed nonce search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningStats {
    pub nonce: u64,
    pub attempts: u64,
    pub elapsed: Duration,
}

/// True when `hash` starts with `difficulty` `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: u32) -> bool {
    let difficulty = difficulty as usize;
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}

/// Hex digest of `prefix` followed by the decimal `nonce`.
pub fn hash_with_nonce(prefix: &str, nonce: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    finish(hasher, nonce)
}

fn finish(mut hasher: Sha256, nonce: u64) -> String {
    hasher.update(nonce.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Increment the nonce from `start` and hash until the digest meets
/// `difficulty`. The first candidate tried is `start + 1`.
///
/// Unbounded: expected attempts grow as 16^difficulty.
pub fn search_nonce(prefix: &str, start: u64, difficulty: u32) -> (u64, String, u64) {
    let mut base = Sha256::new();
    base.update(prefix.as_bytes());

    let mut nonce = start;
    let mut attempts = 0u64;
    loop {
        nonce = nonce.wrapping_add(1);
        attempts += 1;
        let hash = finish(base.clone(), nonce);
        if meets_difficulty(&hash, difficulty) {
            return (nonce, hash, attempts);
        }
    }
}

/// Mine `block` in place, storing the winning nonce and hash.
pub fn mine_block(block: &mut Block) -> MiningStats {
    let start = Instant::now();
    let prefix = block.hash_prefix();
    let (nonce, hash, attempts) = search_nonce(&prefix, block.nonce, block.difficulty);
    block.nonce = nonce;
    block.hash = hash;

    MiningStats {
        nonce,
        attempts,
        elapsed: start.elapsed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meets_difficulty() {
        assert!(meets_difficulty("00ab", 2));
        assert!(meets_difficulty("000b", 2));
        assert!(!meets_difficulty("0a0b", 2));
        assert!(meets_difficulty("anything", 0));
        assert!(!meets_difficulty("00", 3));
    }

    #[test]
    fn test_hash_with_nonce_is_plain_sha256_of_concatenation() {
        // sha256("abc1")
        let mut hasher = Sha256::new();
        hasher.update(b"abc1");
        let expected = hex::encode(hasher.finalize());
        assert_eq!(hash_with_nonce("abc", 1), expected);
        assert_eq!(expected.len(), 64);
        assert!(expected.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_search_nonce_finds_valid_hash() {
        let (nonce, hash, attempts) = search_nonce("bitea", 0, 2);
        assert!(nonce >= 1);
        assert_eq!(attempts, nonce);
        assert!(hash.starts_with("00"));
        assert_eq!(hash, hash_with_nonce("bitea", nonce));
    }

    #[test]
    fn test_difficulty_zero_takes_one_step() {
        let (nonce, hash, attempts) = search_nonce("bitea", 0, 0);
        assert_eq!(nonce, 1);
        assert_eq!(attempts, 1);
        assert_eq!(hash, hash_with_nonce("bitea", 1));
    }
}
