//! Closed error taxonomy and the recovery vocabulary built on top of it.
//!
//! Expected outcomes (duplicates, conflicts, rejected text) are modelled as
//! [`ErrorType`]s too, so that a single presentation policy covers both real
//! faults and silent skips.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    // parse / format
    InvalidAmount,
    InvalidPhone,
    MissingData,
    // data quality
    SuspiciousPattern,
    DuplicateMessage,
    DuplicateTransaction,
    Conflict,
    // persistence
    DatabaseError,
    StorageFailed,
    SyncFailed,
    // trust
    UntrustedSender,
    ValidationFailed,
    // transient system
    Timeout,
    Network,
    Permission,
    Unknown,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::InvalidAmount => "INVALID_AMOUNT",
            ErrorType::InvalidPhone => "INVALID_PHONE",
            ErrorType::MissingData => "MISSING_DATA",
            ErrorType::SuspiciousPattern => "SUSPICIOUS_PATTERN",
            ErrorType::DuplicateMessage => "DUPLICATE_MESSAGE",
            ErrorType::DuplicateTransaction => "DUPLICATE_TRANSACTION",
            ErrorType::Conflict => "CONFLICT",
            ErrorType::DatabaseError => "DATABASE_ERROR",
            ErrorType::StorageFailed => "STORAGE_FAILED",
            ErrorType::SyncFailed => "SYNC_FAILED",
            ErrorType::UntrustedSender => "UNTRUSTED_SENDER",
            ErrorType::ValidationFailed => "VALIDATION_FAILED",
            ErrorType::Timeout => "TIMEOUT",
            ErrorType::Network => "NETWORK",
            ErrorType::Permission => "PERMISSION",
            ErrorType::Unknown => "UNKNOWN",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            ErrorType::SuspiciousPattern
            | ErrorType::DuplicateMessage
            | ErrorType::DuplicateTransaction
            | ErrorType::Conflict => Severity::Low,
            ErrorType::InvalidAmount
            | ErrorType::InvalidPhone
            | ErrorType::MissingData
            | ErrorType::ValidationFailed
            | ErrorType::SyncFailed
            | ErrorType::Timeout
            | ErrorType::Network => Severity::Medium,
            ErrorType::DatabaseError
            | ErrorType::StorageFailed
            | ErrorType::UntrustedSender
            | ErrorType::Unknown => Severity::High,
            ErrorType::Permission => Severity::Critical,
        }
    }

    /// Persistence and transient system faults may succeed on a later attempt.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorType::DatabaseError
                | ErrorType::StorageFailed
                | ErrorType::SyncFailed
                | ErrorType::Timeout
                | ErrorType::Network
        )
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Caller-supplied hints for classification.
///
/// A `kind` always wins over keyword matching.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    pub kind: Option<ErrorType>,
    pub operation: Option<String>,
    pub details: BTreeMap<String, String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_kind(kind: ErrorType) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn operation(mut self, name: impl Into<String>) -> Self {
        self.operation = Some(name.into());
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{error_type}: {message}")]
pub struct AppError {
    pub error_type: ErrorType,
    pub message: String,
    pub severity: Severity,
    pub retriable: bool,
    pub context: Option<ErrorContext>,
}

impl AppError {
    /// Builds an error with the taxonomy defaults for `error_type`.
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            severity: error_type.default_severity(),
            retriable: error_type.is_retriable(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryAction {
    Retry,
    Skip,
    ManualReview,
    FixInput,
    CheckConnection,
    OpenSettings,
    FreeStorage,
    ResetState,
    ContactSupport,
}

impl RecoveryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryAction::Retry => "RETRY",
            RecoveryAction::Skip => "SKIP",
            RecoveryAction::ManualReview => "MANUAL_REVIEW",
            RecoveryAction::FixInput => "FIX_INPUT",
            RecoveryAction::CheckConnection => "CHECK_CONNECTION",
            RecoveryAction::OpenSettings => "OPEN_SETTINGS",
            RecoveryAction::FreeStorage => "FREE_STORAGE",
            RecoveryAction::ResetState => "RESET_STATE",
            RecoveryAction::ContactSupport => "CONTACT_SUPPORT",
        }
    }
}

impl fmt::Display for RecoveryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryStrategy {
    pub primary_action: RecoveryAction,
    pub secondary_actions: Vec<RecoveryAction>,
    pub auto_retry: bool,
    pub retry_delay_ms: u64,
    pub description: String,
}

/// Progress report handed to retry observers before each backoff wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryContext {
    /// The attempt that just failed, starting at 1.
    pub attempt: u32,
    pub next_delay_ms: u64,
    pub total_elapsed_ms: u64,
}

/// What the presentation layer should do with a classified error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotice {
    /// Log only.
    Silent,
    Prompt {
        message: String,
        primary: RecoveryAction,
        /// At most two entries.
        secondary: Vec<RecoveryAction>,
    },
    /// Progress stops until the action is taken.
    Blocking {
        message: String,
        action: RecoveryAction,
    },
}

impl UserNotice {
    pub const MAX_SECONDARY_ACTIONS: usize = 2;

    pub fn for_error(error: &AppError, strategy: &RecoveryStrategy) -> Self {
        match error.severity {
            Severity::Low => UserNotice::Silent,
            Severity::Medium | Severity::High => UserNotice::Prompt {
                message: strategy.description.clone(),
                primary: strategy.primary_action,
                secondary: strategy
                    .secondary_actions
                    .iter()
                    .copied()
                    .take(Self::MAX_SECONDARY_ACTIONS)
                    .collect(),
            },
            Severity::Critical => UserNotice::Blocking {
                message: strategy.description.clone(),
                action: strategy.primary_action,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_groups() {
        assert!(!ErrorType::InvalidAmount.is_retriable());
        assert!(!ErrorType::DuplicateMessage.is_retriable());
        assert!(ErrorType::DatabaseError.is_retriable());
        assert!(ErrorType::SyncFailed.is_retriable());
        assert!(!ErrorType::UntrustedSender.is_retriable());
        assert!(ErrorType::Network.is_retriable());
        assert!(!ErrorType::Unknown.is_retriable());
        assert_eq!(ErrorType::Unknown.default_severity(), Severity::High);
        assert_eq!(ErrorType::Conflict.default_severity(), Severity::Low);
    }

    #[test]
    fn test_display_includes_type() {
        let err = AppError::new(ErrorType::Network, "connection reset");
        assert_eq!(err.to_string(), "NETWORK: connection reset");
    }

    #[test]
    fn test_notice_follows_severity() {
        let strategy = RecoveryStrategy {
            primary_action: RecoveryAction::Retry,
            secondary_actions: vec![
                RecoveryAction::CheckConnection,
                RecoveryAction::Skip,
                RecoveryAction::ContactSupport,
            ],
            auto_retry: true,
            retry_delay_ms: 1000,
            description: "retry".to_string(),
        };

        let low = AppError::new(ErrorType::DuplicateMessage, "dup");
        assert_eq!(UserNotice::for_error(&low, &strategy), UserNotice::Silent);

        let medium = AppError::new(ErrorType::Network, "offline");
        match UserNotice::for_error(&medium, &strategy) {
            UserNotice::Prompt {
                primary, secondary, ..
            } => {
                assert_eq!(primary, RecoveryAction::Retry);
                assert_eq!(secondary.len(), 2);
            }
            other => panic!("expected prompt, got {other:?}"),
        }

        let critical = AppError::new(ErrorType::Permission, "denied");
        assert!(matches!(
            UserNotice::for_error(&critical, &strategy),
            UserNotice::Blocking { .. }
        ));
    }
}
