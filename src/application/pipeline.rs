use crate::config::GuardConfig;
use crate::dedup::{ConflictDetector, TransactionDuplicateDetector};
use crate::domain::dedup::{
    ConflictResult, ConflictType, DetectorStats, DuplicateCheckResult, DuplicateType,
};
use crate::domain::fault::{AppError, ErrorContext, ErrorType, UserNotice};
use crate::domain::message::{Message, TimestampMs, TransactionRecord};
use crate::domain::ports::RecordStoreBox;
use crate::domain::validation::ValidationResult;
use crate::recovery::{ErrorClassifier, RecoveryStrategyResolver, RetryExecutor};
use crate::validation::TransactionValidator;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingOutcome {
    /// Validated, unique and persisted. May still carry warning flags.
    Accepted {
        record: TransactionRecord,
        validation: ValidationResult,
    },
    /// Amount or phone could not be established.
    Rejected {
        validation: ValidationResult,
        error: AppError,
        notice: UserNotice,
    },
    /// Seen recently by the duplicate detector.
    Duplicate {
        validation: ValidationResult,
        check: DuplicateCheckResult,
        error: AppError,
        notice: UserNotice,
    },
    /// Matches a stored transaction with the same phone and amount.
    Conflict {
        validation: ValidationResult,
        conflict: ConflictResult,
        error: AppError,
        notice: UserNotice,
    },
}

impl ProcessingOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            ProcessingOutcome::Accepted { .. } => "ACCEPTED",
            ProcessingOutcome::Rejected { .. } => "REJECTED",
            ProcessingOutcome::Duplicate { .. } => "DUPLICATE",
            ProcessingOutcome::Conflict { .. } => "CONFLICT",
        }
    }

    pub fn validation(&self) -> &ValidationResult {
        match self {
            ProcessingOutcome::Accepted { validation, .. }
            | ProcessingOutcome::Rejected { validation, .. }
            | ProcessingOutcome::Duplicate { validation, .. }
            | ProcessingOutcome::Conflict { validation, .. } => validation,
        }
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            ProcessingOutcome::Accepted { .. } => None,
            ProcessingOutcome::Rejected { error, .. }
            | ProcessingOutcome::Duplicate { error, .. }
            | ProcessingOutcome::Conflict { error, .. } => Some(error),
        }
    }

    pub fn notice(&self) -> Option<&UserNotice> {
        match self {
            ProcessingOutcome::Accepted { .. } => None,
            ProcessingOutcome::Rejected { notice, .. }
            | ProcessingOutcome::Duplicate { notice, .. }
            | ProcessingOutcome::Conflict { notice, .. } => Some(notice),
        }
    }

    /// Error message for skipped messages, joined warnings for accepted ones.
    pub fn detail(&self) -> String {
        match self.error() {
            Some(error) => error.message.clone(),
            None => self.validation().warnings.join("; "),
        }
    }
}

/// Validate -> duplicate check -> conflict check -> persist.
///
/// Messages are handled one at a time through `&mut self`, which keeps each
/// phone's history in arrival order.
pub struct MessagePipeline {
    validator: TransactionValidator,
    conflicts: ConflictDetector,
    duplicates: TransactionDuplicateDetector,
    store: RecordStoreBox,
    retry: RetryExecutor,
    classifier: ErrorClassifier,
    resolver: RecoveryStrategyResolver,
    lookback_ms: u64,
}

impl MessagePipeline {
    pub fn new(config: &GuardConfig, store: RecordStoreBox) -> Self {
        Self {
            validator: TransactionValidator::from_config(config),
            conflicts: ConflictDetector::new(&config.windows),
            duplicates: TransactionDuplicateDetector::new(config.windows.clone()),
            store,
            retry: RetryExecutor::new(config.retry.clone()),
            classifier: ErrorClassifier::new(),
            resolver: RecoveryStrategyResolver::new(),
            lookback_ms: config.windows.similar_window_ms,
        }
    }

    /// Classifies and, when accepted, persists `message`.
    ///
    /// Expected outcomes come back as `Ok`; `Err` means the record store kept
    /// failing after retries.
    pub async fn process(&mut self, message: Message) -> Result<ProcessingOutcome, AppError> {
        let validation = self.validator.validate_message(&message);

        let (true, Some(phone), Some(amount)) =
            (validation.valid, validation.phone.clone(), validation.amount)
        else {
            return Ok(self.reject(&message, validation));
        };

        let since = message
            .timestamp()
            .saturating_sub(i64::try_from(self.lookback_ms).unwrap_or(i64::MAX));
        let existing = self
            .retry
            .run("load recent records", || self.store.recent(&phone, since))
            .await?;

        let check = self
            .duplicates
            .is_duplicate(message.text(), &phone, message.timestamp());
        let conflict = self
            .conflicts
            .detect(&phone, amount, message.timestamp(), &existing);

        if check.is_duplicate {
            self.remember(&message, &phone);
            return Ok(self.duplicate(&message, &phone, validation, check));
        }
        if conflict.has_conflict {
            self.remember(&message, &phone);
            return Ok(self.conflict(&message, &phone, validation, conflict));
        }

        // A message whose record never reached the store stays unseen, so a
        // redelivery is processed again.
        let outcome = self.accept(&message, phone.clone(), amount, validation).await?;
        self.remember(&message, &phone);
        Ok(outcome)
    }

    pub fn stats(&self) -> DetectorStats {
        self.duplicates.stats()
    }

    /// Evicts detector history older than the retention horizon.
    pub fn prune(&mut self, now: TimestampMs) {
        self.duplicates.prune(now);
    }

    pub async fn records(&self) -> Result<Vec<TransactionRecord>, AppError> {
        self.retry.run("load records", || self.store.all()).await
    }

    fn remember(&mut self, message: &Message, phone: &str) {
        self.duplicates
            .register_message(message.text(), phone, message.timestamp());
    }

    async fn accept(
        &self,
        message: &Message,
        phone: String,
        amount: Decimal,
        validation: ValidationResult,
    ) -> Result<ProcessingOutcome, AppError> {
        let record = TransactionRecord::new(phone, amount, message.text(), message.timestamp());
        self.retry
            .run("store record", || self.store.store(record.clone()))
            .await?;

        if validation.flags.is_empty() {
            info!(phone = %record.phone, amount = %record.amount, "transaction accepted");
        } else {
            warn!(
                phone = %record.phone,
                amount = %record.amount,
                flags = ?validation.flags,
                "transaction accepted with flags"
            );
        }
        Ok(ProcessingOutcome::Accepted { record, validation })
    }

    fn reject(&self, message: &Message, validation: ValidationResult) -> ProcessingOutcome {
        let kind = if validation.phone.is_some() {
            ErrorType::InvalidAmount
        } else {
            ErrorType::InvalidPhone
        };
        let error = self.expected(kind, validation.errors.join("; "), message);
        warn!(sender = message.sender(), error = %error, "message rejected");
        let notice = self.notice(&error);
        ProcessingOutcome::Rejected {
            validation,
            error,
            notice,
        }
    }

    fn duplicate(
        &self,
        message: &Message,
        phone: &str,
        validation: ValidationResult,
        check: DuplicateCheckResult,
    ) -> ProcessingOutcome {
        let (kind, label) = match check.duplicate_type {
            DuplicateType::Burst => (ErrorType::SuspiciousPattern, "Burst of messages"),
            DuplicateType::Similar => (ErrorType::DuplicateMessage, "Similar message"),
            DuplicateType::Exact | DuplicateType::None => {
                (ErrorType::DuplicateMessage, "Identical message")
            }
        };
        let since = check
            .time_since_last_ms
            .map(|ms| format!(" {ms} ms ago"))
            .unwrap_or_default();
        let error = self.expected(kind, format!("{label} from {phone}{since}"), message);
        debug!(%phone, duplicate_type = ?check.duplicate_type, "duplicate skipped");
        let notice = self.notice(&error);
        ProcessingOutcome::Duplicate {
            validation,
            check,
            error,
            notice,
        }
    }

    fn conflict(
        &self,
        message: &Message,
        phone: &str,
        validation: ValidationResult,
        conflict: ConflictResult,
    ) -> ProcessingOutcome {
        let kind = match conflict.conflict_type {
            ConflictType::ExactDuplicate => ErrorType::DuplicateTransaction,
            ConflictType::SimilarTransaction | ConflictType::None => ErrorType::Conflict,
        };
        let recorded_at = conflict
            .matched_record
            .as_ref()
            .map(|r| format!(" recorded at {}", r.timestamp))
            .unwrap_or_default();
        let error = self.expected(
            kind,
            format!(
                "Same amount for {phone}{recorded_at} (confidence {})",
                conflict.confidence_score
            ),
            message,
        );
        debug!(%phone, conflict_type = ?conflict.conflict_type, "conflict skipped");
        let notice = self.notice(&error);
        ProcessingOutcome::Conflict {
            validation,
            conflict,
            error,
            notice,
        }
    }

    fn expected(&self, kind: ErrorType, text: String, message: &Message) -> AppError {
        let context = ErrorContext::of_kind(kind)
            .operation("process message")
            .detail("sender", message.sender())
            .detail("timestamp", message.timestamp().to_string());
        self.classifier.classify(&text, Some(&context))
    }

    fn notice(&self, error: &AppError) -> UserNotice {
        UserNotice::for_error(error, &self.resolver.resolve(error))
    }
}
