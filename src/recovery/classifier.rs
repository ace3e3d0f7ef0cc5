//! Maps arbitrary failures onto the closed [`ErrorType`] taxonomy.

use crate::domain::fault::{AppError, ErrorContext, ErrorType};
use crate::error::GuardError;
use std::error::Error;
use std::fmt;
use std::io;

/// Keyword classifier for faults that reach a caller-visible boundary.
///
/// Rules are checked in order against the lowercased message; the first rule
/// with a matching keyword decides the type.
pub struct ErrorClassifier {
    rules: Vec<(ErrorType, Vec<&'static str>)>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorClassifier {
    pub fn new() -> Self {
        Self {
            rules: vec![
                (
                    ErrorType::Permission,
                    vec!["permission", "denied", "not allowed", "unauthorized", "forbidden"],
                ),
                (
                    ErrorType::Timeout,
                    vec!["timeout", "timed out", "deadline"],
                ),
                (
                    ErrorType::Network,
                    vec![
                        "network",
                        "connection",
                        "unreachable",
                        "offline",
                        "dns",
                        "socket",
                        "broken pipe",
                    ],
                ),
                (
                    ErrorType::DatabaseError,
                    vec!["database", "sql", "rocksdb", "transaction log", "lock file"],
                ),
                (
                    ErrorType::StorageFailed,
                    vec!["storage", "disk", "no space", "quota", "write failed"],
                ),
                (ErrorType::SyncFailed, vec!["sync", "upload"]),
                (
                    ErrorType::DuplicateTransaction,
                    vec!["duplicate transaction"],
                ),
                (ErrorType::DuplicateMessage, vec!["duplicate"]),
                (ErrorType::Conflict, vec!["conflict"]),
                (ErrorType::InvalidAmount, vec!["amount"]),
                (ErrorType::InvalidPhone, vec!["phone"]),
                (
                    ErrorType::MissingData,
                    vec!["missing", "required", "empty", "not found"],
                ),
                (
                    ErrorType::UntrustedSender,
                    vec!["untrusted", "unknown sender", "sender"],
                ),
                (
                    ErrorType::SuspiciousPattern,
                    vec!["suspicious", "fraud", "pattern"],
                ),
                (
                    ErrorType::ValidationFailed,
                    vec!["validation", "invalid", "authentic"],
                ),
            ],
        }
    }

    /// Classifies by message text. An explicit `context.kind` wins; nothing
    /// matched means `Unknown`.
    pub fn classify<E>(&self, error: &E, context: Option<&ErrorContext>) -> AppError
    where
        E: fmt::Display + ?Sized,
    {
        let message = error.to_string();
        let error_type = context
            .and_then(|c| c.kind)
            .unwrap_or_else(|| self.match_keywords(&message));
        build(error_type, message, context)
    }

    /// Classifies a typed error, looking through its source chain for
    /// failures whose type is already known before falling back to keywords.
    pub fn classify_error(
        &self,
        error: &(dyn Error + 'static),
        context: Option<&ErrorContext>,
    ) -> AppError {
        if let Some(kind) = context.and_then(|c| c.kind) {
            return build(kind, error.to_string(), context);
        }

        for cause in source_chain(error) {
            if let Some(app) = as_app_error(cause) {
                let mut app = app.clone();
                if let Some(context) = context {
                    app.context = Some(context.clone());
                }
                return app;
            }
            if let Some(error_type) = known_type(cause) {
                return build(error_type, error.to_string(), context);
            }
        }

        let text = source_chain(error)
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(": ");
        build(self.match_keywords(&text), error.to_string(), context)
    }

    fn match_keywords(&self, message: &str) -> ErrorType {
        let lower = message.to_lowercase();
        self.rules
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(error_type, _)| *error_type)
            .unwrap_or(ErrorType::Unknown)
    }
}

fn build(error_type: ErrorType, message: String, context: Option<&ErrorContext>) -> AppError {
    let error = AppError::new(error_type, message);
    match context {
        Some(context) => error.with_context(context.clone()),
        None => error,
    }
}

/// `error` followed by each of its sources, outermost first.
fn source_chain<'a>(
    error: &'a (dyn Error + 'static),
) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(error), |e: &&'a (dyn Error + 'static)| (*e).source())
}

fn as_app_error<'a>(error: &'a (dyn Error + 'static)) -> Option<&'a AppError> {
    match error.downcast_ref::<GuardError>() {
        Some(GuardError::Classified(app)) => Some(app),
        _ => error.downcast_ref::<AppError>(),
    }
}

fn known_type(error: &(dyn Error + 'static)) -> Option<ErrorType> {
    if let Some(io_error) = error.downcast_ref::<io::Error>() {
        return io_type(io_error.kind());
    }
    match error.downcast_ref::<GuardError>()? {
        GuardError::CsvError(_) => Some(ErrorType::MissingData),
        GuardError::ConfigError(_) => Some(ErrorType::ValidationFailed),
        GuardError::StorageError(_) => Some(ErrorType::StorageFailed),
        #[cfg(feature = "storage-rocksdb")]
        GuardError::DatabaseError(_) => Some(ErrorType::DatabaseError),
        // the io error itself is the next link in the chain
        GuardError::IoError(_) => None,
        GuardError::Classified(_)
        | GuardError::SerializationError(_)
        | GuardError::InternalError(_) => None,
    }
}

fn io_type(kind: io::ErrorKind) -> Option<ErrorType> {
    use io::ErrorKind::*;
    match kind {
        TimedOut | WouldBlock => Some(ErrorType::Timeout),
        ConnectionRefused | ConnectionReset | ConnectionAborted | NotConnected | BrokenPipe
        | AddrNotAvailable => Some(ErrorType::Network),
        PermissionDenied => Some(ErrorType::Permission),
        StorageFull | WriteZero => Some(ErrorType::StorageFailed),
        _ => None,
    }
}
