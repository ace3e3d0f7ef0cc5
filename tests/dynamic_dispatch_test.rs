use momo_guard::domain::message::TransactionRecord;
use momo_guard::domain::ports::RecordStoreBox;
use momo_guard::infrastructure::in_memory::InMemoryRecordStore;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_store_as_trait_object() {
    let shared = InMemoryRecordStore::new();
    let writer: RecordStoreBox = Box::new(shared.clone());
    let reader: RecordStoreBox = Box::new(shared);

    let record = TransactionRecord::new("254712345678", dec!(5000), "KES 5,000", 1_000);

    // Verify Send + Sync by spawning tasks
    let write_handle = tokio::spawn(async move {
        writer.store(record).await.unwrap();
    });
    write_handle.await.unwrap();

    let read_handle =
        tokio::spawn(async move { reader.recent("0712345678", 0).await.unwrap() });

    let recent = read_handle.await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].amount, dec!(5000));
}
