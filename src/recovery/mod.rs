//! Fault classification, recovery strategy lookup and retry with backoff.

pub mod classifier;
pub mod retry;
pub mod strategy;

pub use classifier::ErrorClassifier;
pub use retry::{RetryExecutor, RetryState};
pub use strategy::RecoveryStrategyResolver;
