use super::message::{TimestampMs, TransactionRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tokens pulled out of a message for similarity checks only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageSignature {
    pub amounts: BTreeSet<Decimal>,
    pub references: BTreeSet<String>,
    pub phones: BTreeSet<String>,
}

impl MessageSignature {
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty() && self.references.is_empty() && self.phones.is_empty()
    }

    pub fn shares_reference(&self, other: &MessageSignature) -> bool {
        !self.references.is_disjoint(&other.references)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    #[default]
    None,
    SimilarTransaction,
    ExactDuplicate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConflictResult {
    pub has_conflict: bool,
    pub conflict_type: ConflictType,
    pub matched_record: Option<TransactionRecord>,
    /// 0..=100
    pub confidence_score: u8,
}

impl ConflictResult {
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DuplicateType {
    #[default]
    None,
    Exact,
    Similar,
    Burst,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DuplicateCheckResult {
    pub is_duplicate: bool,
    pub duplicate_type: DuplicateType,
    pub previous_message: Option<String>,
    pub time_since_last_ms: Option<u64>,
}

impl DuplicateCheckResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn matched(
        duplicate_type: DuplicateType,
        previous_message: &str,
        time_since_last_ms: u64,
    ) -> Self {
        Self {
            is_duplicate: true,
            duplicate_type,
            previous_message: Some(previous_message.to_string()),
            time_since_last_ms: Some(time_since_last_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectorStats {
    pub total_hashes: usize,
    pub phones_tracked: usize,
    pub avg_per_phone: f64,
}

/// Absolute distance between two timestamps.
pub fn elapsed_ms(a: TimestampMs, b: TimestampMs) -> u64 {
    a.abs_diff(b)
}
