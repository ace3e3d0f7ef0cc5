//! Whole-list helpers for cleaning up a backlog of records at once.

use super::hasher::ContentHasher;
use crate::config::BURST_THRESHOLD;
use crate::domain::message::TransactionRecord;
use crate::validation::phone::normalize_lossy;
use std::collections::{BTreeMap, HashSet};

/// Keeps the first record for each distinct message body, in input order.
pub fn deduplicate_messages(records: &[TransactionRecord]) -> Vec<TransactionRecord> {
    let hasher = ContentHasher::new();
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(hasher.hash(&r.raw_message)))
        .cloned()
        .collect()
}

/// Partitions records by normalized phone. Each list keeps input order.
pub fn group_messages_by_phone(
    records: &[TransactionRecord],
) -> BTreeMap<String, Vec<TransactionRecord>> {
    let mut groups: BTreeMap<String, Vec<TransactionRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(normalize_lossy(&record.phone))
            .or_default()
            .push(record.clone());
    }
    groups
}

/// Runs of at least [`BURST_THRESHOLD`] same-phone records whose first and
/// last timestamps are no more than `window_ms` apart.
///
/// Groups do not overlap; each is returned oldest first.
pub fn find_duplicate_groups(
    records: &[TransactionRecord],
    window_ms: u64,
) -> Vec<Vec<TransactionRecord>> {
    let mut bursts = Vec::new();

    for (_, mut group) in group_messages_by_phone(records) {
        group.sort_by_key(|r| r.timestamp);

        let mut start = 0;
        while start < group.len() {
            let mut end = start + 1;
            while end < group.len()
                && group[end].timestamp.abs_diff(group[start].timestamp) <= window_ms
            {
                end += 1;
            }
            if end - start >= BURST_THRESHOLD {
                bursts.push(group[start..end].to_vec());
                start = end;
            } else {
                start += 1;
            }
        }
    }

    bursts
}
