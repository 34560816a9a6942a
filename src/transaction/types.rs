//! Kinds of user action recorded on the ledger

use crate::error::ChainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Social actions that can be recorded.
///
/// The numeric code of each variant is part of the hashed serialization of a
/// [`Transaction`](super::Transaction); reordering variants changes every
/// block hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Post,
    Like,
    Comment,
    Follow,
    UserRegistration,
    TopicCreate,
    TopicComment,
    TopicLike,
    TopicReshare,
}

impl TransactionType {
    pub const ALL: [TransactionType; 9] = [
        TransactionType::Post,
        TransactionType::Like,
        TransactionType::Comment,
        TransactionType::Follow,
        TransactionType::UserRegistration,
        TransactionType::TopicCreate,
        TransactionType::TopicComment,
        TransactionType::TopicLike,
        TransactionType::TopicReshare,
    ];

    pub fn code(self) -> u8 {
        match self {
            TransactionType::Post => 0,
            TransactionType::Like => 1,
            TransactionType::Comment => 2,
            TransactionType::Follow => 3,
            TransactionType::UserRegistration => 4,
            TransactionType::TopicCreate => 5,
            TransactionType::TopicComment => 6,
            TransactionType::TopicLike => 7,
            TransactionType::TopicReshare => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Post => "POST",
            TransactionType::Like => "LIKE",
            TransactionType::Comment => "COMMENT",
            TransactionType::Follow => "FOLLOW",
            TransactionType::UserRegistration => "USER_REGISTRATION",
            TransactionType::TopicCreate => "TOPIC_CREATE",
            TransactionType::TopicComment => "TOPIC_COMMENT",
            TransactionType::TopicLike => "TOPIC_LIKE",
            TransactionType::TopicReshare => "TOPIC_RESHARE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChainError::InvalidTransaction(format!("unknown transaction type '{}'", s)))
    }
}
