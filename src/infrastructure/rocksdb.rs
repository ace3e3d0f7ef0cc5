use crate::dedup::ContentHasher;
use crate::domain::message::{TimestampMs, TransactionRecord};
use crate::domain::ports::RecordStore;
use crate::error::{GuardError, Result};
use crate::validation::phone::normalize_lossy;
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding accepted transaction records.
pub const CF_RECORDS: &str = "records";

/// Hex digits of the content hash appended to each key.
const KEY_HASH_LEN: usize = 16;

/// A persistent record store backed by RocksDB.
///
/// Keys are `<phone>/<timestamp>/<content hash>` so that one phone's records
/// are contiguous and sorted by time, and a prefix scan answers
/// [`RecordStore::recent`]. Values are JSON.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBRecordStore {
    db: Arc<DB>,
    hasher: ContentHasher,
}

impl RocksDBRecordStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "records" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_records = ColumnFamilyDescriptor::new(CF_RECORDS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_records])?;

        Ok(Self {
            db: Arc::new(db),
            hasher: ContentHasher::new(),
        })
    }

    fn records_cf(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_RECORDS)
            .ok_or_else(|| GuardError::StorageError("Records column family not found".to_string()))
    }

    fn key(&self, record: &TransactionRecord) -> String {
        let hash = self.hasher.hash(&record.raw_message);
        format!(
            "{}{}/{}",
            phone_prefix(&record.phone),
            sortable(record.timestamp),
            &hash[..KEY_HASH_LEN]
        )
    }
}

fn phone_prefix(phone: &str) -> String {
    format!("{}/", normalize_lossy(phone))
}

/// Zero-padded decimal whose byte order matches the numeric order of `timestamp`.
fn sortable(timestamp: TimestampMs) -> String {
    format!("{:020}", (timestamp as u64) ^ (1 << 63))
}

#[async_trait]
impl RecordStore for RocksDBRecordStore {
    async fn store(&self, record: TransactionRecord) -> Result<()> {
        let cf = self.records_cf()?;
        let value = serde_json::to_vec(&record)?;
        self.db.put_cf(cf, self.key(&record), value)?;
        Ok(())
    }

    async fn recent(&self, phone: &str, since: TimestampMs) -> Result<Vec<TransactionRecord>> {
        let cf = self.records_cf()?;
        let prefix = phone_prefix(phone);
        let start = format!("{}{}", prefix, sortable(since));

        let mut records = Vec::new();
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(start.as_bytes(), Direction::Forward));
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }

    async fn all(&self) -> Result<Vec<TransactionRecord>> {
        let cf = self.records_cf()?;
        let mut records = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let record: TransactionRecord = serde_json::from_slice(&value)?;
            records.push(record);
        }
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.phone.cmp(&b.phone)));
        Ok(records)
    }
}
