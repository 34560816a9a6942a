//! The transaction record sealed into blocks

use super::types::TransactionType;
use serde::Serialize;
use std::fmt;

/// One immutable user action.
///
/// Fields are fixed at construction; the only output that matters for
/// hashing is [`Transaction::serialize`].
///
/// The id is `sender-code-timestamp` and is not unique: the same sender
/// submitting two actions of the same type within one second produces two
/// records with equal ids. Nothing in the ledger keys on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    id: String,
    sender: String,
    #[serde(rename = "type")]
    tx_type: TransactionType,
    payload: String,
    timestamp: i64,
}

impl Transaction {
    /// Record an action happening now.
    pub fn new(sender: impl Into<String>, tx_type: TransactionType, payload: impl Into<String>) -> Self {
        Self::new_at(sender, tx_type, payload, chrono::Utc::now().timestamp())
    }

    /// Record an action at an explicit Unix timestamp (seconds).
    pub fn new_at(
        sender: impl Into<String>,
        tx_type: TransactionType,
        payload: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        let sender = sender.into();
        let id = format!("{}-{}-{}", sender, tx_type.code(), timestamp);
        Transaction {
            id,
            sender,
            tx_type,
            payload: payload.into(),
            timestamp,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn tx_type(&self) -> TransactionType {
        self.tx_type
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Canonical hash input: sender, type code, timestamp, payload, with no
    /// separators.
    pub fn serialize(&self) -> String {
        format!(
            "{}{}{}{}",
            self.sender,
            self.tx_type.code(),
            self.timestamp,
            self.payload
        )
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction{{id={}, sender={}, type={}, timestamp={}, data={}}}",
            self.id,
            self.sender,
            self.tx_type.code(),
            self.timestamp,
            self.payload
        )
    }
}
