#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const BASE_TIMESTAMP: i64 = 1_735_741_800_000;

/// Phones with no long repeated or sequential digit runs.
pub const PHONES: [&str; 5] = [
    "0722815930",
    "0733815930",
    "0790815236",
    "0705918273",
    "0748291635",
];

/// One genuine-looking notification with a unique reference code.
pub fn notification(index: usize) -> (String, i64, String) {
    let phone = PHONES[index % PHONES.len()];
    let amount = 100 + (index % 37) * 25;
    let text = format!(
        "Confirmed. KES {amount} received from {phone} on 01/01/2025 ref QK{index:07}X"
    );
    // ten minutes apart per phone, so no time window ever overlaps
    let timestamp = BASE_TIMESTAMP + (index as i64) * 120_000;
    ("MPESA".to_string(), timestamp, text)
}

pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["sender", "timestamp", "text"])?;

    for i in 0..rows {
        let (sender, timestamp, text) = notification(i);
        wtr.write_record([sender.as_str(), &timestamp.to_string(), text.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn generate_large_csv(path: &Path, size_mb: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["sender", "timestamp", "text"])?;

    let target_size = (size_mb * 1024 * 1024) as u64;
    let mut index = 0;

    // Check size every 5000 rows to avoid syscall overhead
    loop {
        for _ in 0..5000 {
            let (sender, timestamp, text) = notification(index);
            wtr.write_record([sender.as_str(), &timestamp.to_string(), text.as_str()])?;
            index += 1;
        }
        wtr.flush()?;
        if std::fs::metadata(path)?.len() >= target_size {
            break;
        }
    }
    Ok(())
}
