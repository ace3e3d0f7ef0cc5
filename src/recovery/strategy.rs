use crate::domain::fault::{AppError, ErrorType, RecoveryAction, RecoveryStrategy};

/// Static lookup from error type to what should happen next.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryStrategyResolver;

impl RecoveryStrategyResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, error: &AppError) -> RecoveryStrategy {
        self.for_type(error.error_type)
    }

    pub fn for_type(&self, error_type: ErrorType) -> RecoveryStrategy {
        use RecoveryAction::*;

        let (primary, secondary, auto_retry, delay_ms, description): (
            RecoveryAction,
            &[RecoveryAction],
            bool,
            u64,
            &str,
        ) = match error_type {
            ErrorType::InvalidAmount => (
                FixInput,
                &[Skip],
                false,
                0,
                "The amount in this message could not be read. Check it and enter it manually.",
            ),
            ErrorType::InvalidPhone => (
                FixInput,
                &[Skip],
                false,
                0,
                "The phone number in this message is not valid. Correct it to continue.",
            ),
            ErrorType::MissingData => (
                FixInput,
                &[Skip],
                false,
                0,
                "Some required transaction details are missing.",
            ),
            ErrorType::SuspiciousPattern => (
                Skip,
                &[ManualReview],
                false,
                0,
                "This message looks unusual and was set aside.",
            ),
            ErrorType::DuplicateMessage => (
                Skip,
                &[],
                false,
                0,
                "This message was already processed.",
            ),
            ErrorType::DuplicateTransaction => (
                Skip,
                &[ManualReview],
                false,
                0,
                "This transaction was already recorded.",
            ),
            ErrorType::Conflict => (
                ManualReview,
                &[Skip],
                false,
                0,
                "A matching transaction was recorded moments ago.",
            ),
            ErrorType::DatabaseError => (
                Retry,
                &[ResetState, ContactSupport],
                true,
                1_000,
                "Saving the transaction failed. Retrying.",
            ),
            ErrorType::StorageFailed => (
                Retry,
                &[FreeStorage, ContactSupport],
                true,
                2_000,
                "The device could not store the transaction. Free some space and retry.",
            ),
            ErrorType::SyncFailed => (
                Retry,
                &[CheckConnection],
                true,
                5_000,
                "Syncing failed. It will be retried automatically.",
            ),
            ErrorType::UntrustedSender => (
                ManualReview,
                &[Skip],
                false,
                0,
                "The sender of this message is not a known money transfer service.",
            ),
            ErrorType::ValidationFailed => (
                ManualReview,
                &[FixInput, Skip],
                false,
                0,
                "This message could not be verified as a genuine transaction.",
            ),
            ErrorType::Timeout => (
                Retry,
                &[CheckConnection],
                true,
                2_000,
                "The operation took too long. Retrying.",
            ),
            ErrorType::Network => (
                Retry,
                &[CheckConnection],
                true,
                3_000,
                "Network unavailable. Check your connection.",
            ),
            ErrorType::Permission => (
                OpenSettings,
                &[ContactSupport],
                false,
                0,
                "A required permission is missing. Grant it in settings to continue.",
            ),
            ErrorType::Unknown => (
                ContactSupport,
                &[Retry, ResetState],
                false,
                0,
                "Something went wrong. Contact support if this keeps happening.",
            ),
        };

        RecoveryStrategy {
            primary_action: primary,
            secondary_actions: secondary.to_vec(),
            auto_retry,
            retry_delay_ms: delay_ms,
            description: description.to_string(),
        }
    }
}
