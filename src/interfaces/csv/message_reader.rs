use crate::domain::message::{Message, TimestampMs};
use crate::error::{GuardError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct MessageRow {
    sender: String,
    timestamp: TimestampMs,
    text: String,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Message::new(row.text, row.sender, row.timestamp)
    }
}

/// Reads inbound messages from a `sender,timestamp,text` CSV source.
///
/// Wraps `csv::Reader` and yields `Result<Message>` lazily, so large exports
/// are streamed rather than loaded whole. Fields are trimmed and short rows
/// surface as per-row errors instead of aborting the stream.
pub struct MessageReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> MessageReader<R> {
    /// Creates a new `MessageReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn messages(self) -> impl Iterator<Item = Result<Message>> {
        self.reader
            .into_deserialize::<MessageRow>()
            .map(|row| row.map(Message::from).map_err(GuardError::from))
    }
}
