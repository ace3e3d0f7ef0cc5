//! Tunable thresholds for validation, deduplication and retry.
//!
//! Every limit the engine consults lives here. The `pub const` values are the
//! defaults; a [`GuardConfig`] loaded from JSON may override any of them.

use crate::error::{GuardError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Amount limits
// ---------------------------------------------------------------------------

/// Smallest amount a notification may carry.
pub const MIN_AMOUNT: Decimal = dec!(1);

/// Largest amount a notification may carry.
pub const MAX_AMOUNT: Decimal = dec!(1000000);

/// Amounts above this stay valid but are flagged as unusual.
pub const REASONABLE_AMOUNT: Decimal = dec!(150000);

// ---------------------------------------------------------------------------
// Deduplication windows
// ---------------------------------------------------------------------------

pub const EXACT_WINDOW_MS: u64 = 60_000;
pub const SIMILAR_WINDOW_MS: u64 = 300_000;
pub const BURST_WINDOW_MS: u64 = 300_000;
pub const BURST_THRESHOLD: usize = 3;
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// How long the duplicate detector remembers a message.
pub const HISTORY_RETENTION_MS: u64 = 3_600_000;

/// Hard cap on remembered messages per phone, on top of the retention horizon.
pub const MAX_MESSAGES_PER_PHONE: usize = 50;

// ---------------------------------------------------------------------------
// Authenticity
// ---------------------------------------------------------------------------

pub const AUTHENTICITY_THRESHOLD: u8 = 70;

/// Sender ids accepted as genuine money-transfer notifiers.
pub const DEFAULT_TRUSTED_SENDERS: &[&str] = &[
    "MPESA",
    "M-PESA",
    "SAFARICOM",
    "AIRTELMONEY",
    "AIRTEL",
    "T-KASH",
    "EQUITEL",
];

// ---------------------------------------------------------------------------
// Retry
// ---------------------------------------------------------------------------

pub const RETRY_MAX_ATTEMPTS: u32 = 3;
pub const RETRY_INITIAL_DELAY_MS: u64 = 1_000;
pub const RETRY_MAX_DELAY_MS: u64 = 10_000;
pub const RETRY_BACKOFF_MULTIPLIER: f64 = 2.0;
pub const RETRY_JITTER_RATIO: f64 = 0.1;
pub const RETRY_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountLimits {
    pub min: Decimal,
    pub max: Decimal,
    pub reasonable: Decimal,
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self {
            min: MIN_AMOUNT,
            max: MAX_AMOUNT,
            reasonable: REASONABLE_AMOUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupWindows {
    pub exact_window_ms: u64,
    pub similar_window_ms: u64,
    pub burst_window_ms: u64,
    pub burst_threshold: usize,
    pub similarity_threshold: f64,
    pub history_retention_ms: u64,
    pub max_messages_per_phone: usize,
}

impl Default for DedupWindows {
    fn default() -> Self {
        Self {
            exact_window_ms: EXACT_WINDOW_MS,
            similar_window_ms: SIMILAR_WINDOW_MS,
            burst_window_ms: BURST_WINDOW_MS,
            burst_threshold: BURST_THRESHOLD,
            similarity_threshold: SIMILARITY_THRESHOLD,
            history_retention_ms: HISTORY_RETENTION_MS,
            max_messages_per_phone: MAX_MESSAGES_PER_PHONE,
        }
    }
}

/// Backoff policy for [`crate::recovery::retry::RetryExecutor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Fraction of the computed delay added or removed at random.
    pub jitter_ratio: f64,
    /// Hard limit on the whole run, attempts and waits included.
    pub timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_MAX_ATTEMPTS,
            initial_delay_ms: RETRY_INITIAL_DELAY_MS,
            max_delay_ms: RETRY_MAX_DELAY_MS,
            backoff_multiplier: RETRY_BACKOFF_MULTIPLIER,
            jitter_ratio: RETRY_JITTER_RATIO,
            timeout_ms: RETRY_TIMEOUT_MS,
        }
    }
}

impl RetryConfig {
    /// Short waits for opening storage at startup.
    pub fn for_startup() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 200,
            max_delay_ms: 2_000,
            timeout_ms: 10_000,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub amount: AmountLimits,
    pub windows: DedupWindows,
    pub authenticity_threshold: u8,
    pub trusted_senders: Vec<String>,
    pub retry: RetryConfig,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            amount: AmountLimits::default(),
            windows: DedupWindows::default(),
            authenticity_threshold: AUTHENTICITY_THRESHOLD,
            trusted_senders: DEFAULT_TRUSTED_SENDERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            retry: RetryConfig::default(),
        }
    }
}

impl GuardConfig {
    /// Loads a JSON config file. Missing keys fall back to the defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount.min <= Decimal::ZERO {
            return Err(GuardError::ConfigError(
                "amount.min must be positive".to_string(),
            ));
        }
        if self.amount.min > self.amount.max {
            return Err(GuardError::ConfigError(format!(
                "amount.min ({}) exceeds amount.max ({})",
                self.amount.min, self.amount.max
            )));
        }
        if self.windows.exact_window_ms > self.windows.similar_window_ms {
            return Err(GuardError::ConfigError(
                "exact window must not exceed the similar window".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.windows.similarity_threshold) {
            return Err(GuardError::ConfigError(format!(
                "similarity threshold {} outside [0, 1]",
                self.windows.similarity_threshold
            )));
        }
        if self.windows.burst_threshold < 2 {
            return Err(GuardError::ConfigError(
                "burst threshold must be at least 2".to_string(),
            ));
        }
        if self.windows.max_messages_per_phone == 0 {
            return Err(GuardError::ConfigError(
                "windows.max_messages_per_phone must be at least 1".to_string(),
            ));
        }
        if self.authenticity_threshold > 100 {
            return Err(GuardError::ConfigError(
                "authenticity threshold must be within 0..=100".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(GuardError::ConfigError(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.retry.timeout_ms == 0 {
            return Err(GuardError::ConfigError(
                "retry.timeout_ms must be positive".to_string(),
            ));
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(GuardError::ConfigError(
                "retry.backoff_multiplier must be >= 1.0".to_string(),
            ));
        }
        Ok(())
    }
}
