//! Application layer orchestrating the inbound message flow.
//!
//! `MessagePipeline` takes one message at a time through validation,
//! duplicate and conflict detection, then persists accepted transactions
//! through the `RecordStore` port with retry.

pub mod pipeline;

pub use pipeline::{MessagePipeline, ProcessingOutcome};
