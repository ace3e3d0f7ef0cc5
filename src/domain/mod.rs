//! Plain data types shared by every layer, plus the storage port.
//!
//! Nothing in here performs I/O; adapters live in `infrastructure`.

pub mod dedup;
pub mod fault;
pub mod message;
pub mod ports;
pub mod validation;
