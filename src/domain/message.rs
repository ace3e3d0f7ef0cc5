use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type TimestampMs = i64;

/// An inbound notification as delivered by the carrier listener.
///
/// Immutable once captured: all fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    sender: String,
    timestamp: TimestampMs,
}

impl Message {
    pub fn new(text: impl Into<String>, sender: impl Into<String>, timestamp: TimestampMs) -> Self {
        Self {
            text: text.into(),
            sender: sender.into(),
            timestamp,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn timestamp(&self) -> TimestampMs {
        self.timestamp
    }
}

/// A transaction as kept by the record store and compared by the conflict
/// detector. `phone` is always in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub phone: String,
    pub amount: Decimal,
    pub raw_message: String,
    pub timestamp: TimestampMs,
}

impl TransactionRecord {
    pub fn new(
        phone: impl Into<String>,
        amount: Decimal,
        raw_message: impl Into<String>,
        timestamp: TimestampMs,
    ) -> Self {
        Self {
            phone: phone.into(),
            amount,
            raw_message: raw_message.into(),
            timestamp,
        }
    }
}
