use super::message::{TimestampMs, TransactionRecord};
use crate::error::Result;
use async_trait::async_trait;

/// Persistence port for accepted transactions.
///
/// The engine only ever appends and reads back recent history; schema and
/// retention beyond that belong to the adapter.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn store(&self, record: TransactionRecord) -> Result<()>;
    /// Records for `phone` with `timestamp >= since`, oldest first.
    async fn recent(&self, phone: &str, since: TimestampMs) -> Result<Vec<TransactionRecord>>;
    async fn all(&self) -> Result<Vec<TransactionRecord>>;
}

pub type RecordStoreBox = Box<dyn RecordStore>;
pub type RecordStoreFactory = Box<dyn Fn() -> RecordStoreBox + Send + Sync>;
