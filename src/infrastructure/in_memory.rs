use crate::domain::message::{TimestampMs, TransactionRecord};
use crate::domain::ports::RecordStore;
use crate::error::Result;
use crate::validation::phone::normalize_lossy;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for accepted transactions.
///
/// Records are grouped by normalized phone in
/// `Arc<RwLock<HashMap<String, Vec<TransactionRecord>>>>`, each list kept
/// sorted by timestamp. Clones share the same map. Suited to tests and single
/// runs without `--db-path`.
#[derive(Default, Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<String, Vec<TransactionRecord>>>>,
}

impl InMemoryRecordStore {
    /// Creates a new, empty in-memory record store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn store(&self, record: TransactionRecord) -> Result<()> {
        let mut records = self.records.write().await;
        let list = records.entry(normalize_lossy(&record.phone)).or_default();
        let at = list.partition_point(|r| r.timestamp <= record.timestamp);
        list.insert(at, record);
        Ok(())
    }

    async fn recent(&self, phone: &str, since: TimestampMs) -> Result<Vec<TransactionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .get(&normalize_lossy(phone))
            .map(|list| {
                let start = list.partition_point(|r| r.timestamp < since);
                list[start..].to_vec()
            })
            .unwrap_or_default())
    }

    async fn all(&self) -> Result<Vec<TransactionRecord>> {
        let records = self.records.read().await;
        let mut all: Vec<TransactionRecord> = records.values().flatten().cloned().collect();
        all.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.phone.cmp(&b.phone)));
        Ok(all)
    }
}
