use super::classifier::ErrorClassifier;
use super::strategy::RecoveryStrategyResolver;
use crate::config::RetryConfig;
use crate::domain::fault::{AppError, ErrorContext, ErrorType, RetryContext};
use rand::Rng;
use std::error::Error;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Idle,
    Attempting,
    Waiting,
    Succeeded,
    FailedPermanent,
    TimedOut,
}

/// Runs fallible async operations with classified, jittered exponential backoff.
///
/// A failure is retried only while the classified error is retriable, its
/// recovery strategy allows automatic retry and attempts remain. The whole
/// run, waits included, is bounded by `timeout_ms`.
pub struct RetryExecutor {
    config: RetryConfig,
    classifier: ErrorClassifier,
    resolver: RecoveryStrategyResolver,
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            classifier: ErrorClassifier::new(),
            resolver: RecoveryStrategyResolver::new(),
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub async fn run<T, E, F, Fut>(&self, name: &str, operation: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
    {
        self.run_with_observer(name, operation, |_, _| {}).await
    }

    /// Like [`run`](Self::run), calling `on_retry` before every backoff wait.
    pub async fn run_with_observer<T, E, F, Fut, O>(
        &self,
        name: &str,
        mut operation: F,
        mut on_retry: O,
    ) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Error + 'static,
        O: FnMut(&RetryContext, &AppError),
    {
        let started = Instant::now();
        let limit = Duration::from_millis(self.config.timeout_ms);

        let attempts = async {
            let mut state = RetryState::Idle;
            let mut attempt = 0;
            loop {
                attempt += 1;
                state = transition(name, state, RetryState::Attempting, attempt);

                let failure = match operation().await {
                    Ok(value) => {
                        transition(name, state, RetryState::Succeeded, attempt);
                        return Ok(value);
                    }
                    Err(e) => e,
                };

                let context = ErrorContext::new().operation(name);
                let classified = self.classifier.classify_error(&failure, Some(&context));
                let strategy = self.resolver.resolve(&classified);

                if !(classified.retriable
                    && strategy.auto_retry
                    && attempt < self.config.max_attempts)
                {
                    transition(name, state, RetryState::FailedPermanent, attempt);
                    error!(
                        operation = name,
                        attempt,
                        error = %classified,
                        "operation failed permanently"
                    );
                    return Err(classified);
                }

                let delay_ms = self.delay_for(attempt);
                let retry = RetryContext {
                    attempt,
                    next_delay_ms: delay_ms,
                    total_elapsed_ms: elapsed_ms(started),
                };
                on_retry(&retry, &classified);
                warn!(
                    operation = name,
                    attempt,
                    delay_ms,
                    error = %classified,
                    "operation failed, retrying"
                );

                state = transition(name, state, RetryState::Waiting, attempt);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        };

        match tokio::time::timeout(limit, attempts).await {
            Ok(result) => result,
            Err(_) => {
                debug!(operation = name, state = ?RetryState::TimedOut, "retry state");
                error!(
                    operation = name,
                    timeout_ms = self.config.timeout_ms,
                    "operation timed out"
                );
                Err(AppError::new(
                    ErrorType::Timeout,
                    format!("{} timed out after {} ms", name, self.config.timeout_ms),
                )
                .with_context(ErrorContext::new().operation(name)))
            }
        }
    }

    /// `initial * multiplier^(attempt - 1)`, capped at `max_delay_ms`.
    pub fn base_delay(&self, attempt: u32) -> u64 {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let raw = self.config.initial_delay_ms as f64 * self.config.backoff_multiplier.powi(exponent);
        raw.min(self.config.max_delay_ms as f64) as u64
    }

    /// The base delay moved up or down by at most `jitter_ratio` of itself.
    pub fn delay_for(&self, attempt: u32) -> u64 {
        let base = self.base_delay(attempt) as f64;
        let spread = base * self.config.jitter_ratio;
        if spread < 1.0 {
            return base as u64;
        }
        let offset = rand::thread_rng().gen_range(-spread..=spread);
        (base + offset).round().max(0.0) as u64
    }
}

fn transition(name: &str, from: RetryState, to: RetryState, attempt: u32) -> RetryState {
    debug!(operation = name, ?from, ?to, attempt, "retry state");
    to
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
