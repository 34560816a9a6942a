use super::block::Block;
use serde::Serialize;
use std::fmt;

/// Why a block failed chain validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Stored hash misses the difficulty prefix or no longer matches the fields
    InvalidHash,
    /// `previous_hash` differs from the predecessor's stored hash
    BrokenLink,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::InvalidHash => write!(f, "invalid hash"),
            InvalidReason::BrokenLink => write!(f, "invalid previous hash"),
        }
    }
}

/// Result of walking the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainValidity {
    Valid,
    Invalid { index: usize, reason: InvalidReason },
}

impl ChainValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, ChainValidity::Valid)
    }

    /// Position of the first offending block, if any.
    pub fn invalid_index(&self) -> Option<usize> {
        match self {
            ChainValidity::Valid => None,
            ChainValidity::Invalid { index, .. } => Some(*index),
        }
    }
}

/// Check every block from position 1 onward, stopping at the first
/// violation.
///
/// Genesis is trusted as the anchor and is not re-verified: edits to block 0
/// alone go unnoticed. An edit that changes its stored hash still surfaces
/// as a broken link at block 1.
pub fn validate_chain<B: AsRef<Block>>(blocks: &[B]) -> ChainValidity {
    for (i, pair) in blocks.windows(2).enumerate() {
        let previous = pair[0].as_ref();
        let current = pair[1].as_ref();
        let index = i + 1;

        if !current.is_valid() {
            return ChainValidity::Invalid {
                index,
                reason: InvalidReason::InvalidHash,
            };
        }

        if current.previous_hash != previous.hash {
            return ChainValidity::Invalid {
                index,
                reason: InvalidReason::BrokenLink,
            };
        }
    }
    ChainValidity::Valid
}
