//! Retry policy and predicates for handling transient failures.
//!
//! A [`RetryPolicy`] wraps any fallible async operation and re-invokes it up to
//! `max_attempts` times, sleeping between attempts with exponentially increasing
//! delays. Which failures count as transient is decided by a [`RetryPredicate`].

use crate::{Error, Result};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked before each retry sleep with
/// `(attempts_remaining, error, delay)`.
pub type RetryHook<E> = Arc<dyn Fn(usize, &E, Duration) + Send + Sync>;

/// Retries an operation with exponential backoff.
///
/// The delay before retry `k` is `initial_delay * backoff_multiplier^(k-1)`.
/// Every call to [`execute`](RetryPolicy::execute) starts from `initial_delay`
/// again; a policy carries no state between calls.
///
/// # Examples
///
/// ```
/// use valorant_api::RetryPolicy;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), valorant_api::Error> {
/// // 3 attempts: 100ms, then 200ms between them.
/// let policy: RetryPolicy = RetryPolicy::builder()
///     .max_attempts(3)
///     .initial_delay(Duration::from_millis(100))
///     .backoff_multiplier(2.0)
///     .build()?;
///
/// assert_eq!(policy.delay_for_retry(1), Duration::from_millis(100));
/// assert_eq!(policy.delay_for_retry(2), Duration::from_millis(200));
/// # Ok(())
/// # }
/// ```
pub struct RetryPolicy<E = Error> {
    max_attempts: usize,
    initial_delay: Duration,
    backoff_multiplier: f64,
    predicate: Arc<dyn RetryPredicate<E>>,
    on_retry: Option<RetryHook<E>>,
}

impl<E: 'static> RetryPolicy<E> {
    /// Creates a builder with the default parameters: 3 attempts, 1 second
    /// initial delay, multiplier 2.0, retry on every failure, no hook.
    pub fn builder() -> RetryPolicyBuilder<E> {
        RetryPolicyBuilder::new()
    }

    /// The total number of attempts, including the first one.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// The delay before the first retry.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// The factor applied to the delay after each retry.
    pub fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    /// Returns the delay slept before the given retry (1-indexed, so 1 = the
    /// sleep after the first failed attempt).
    ///
    /// Saturates at `Duration::MAX` rather than overflowing.
    pub fn delay_for_retry(&self, retry: usize) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let nanos = self.initial_delay.as_nanos() as f64 * self.backoff_multiplier.powi(exponent);

        if nanos.is_finite() && nanos < u64::MAX as f64 {
            Duration::from_nanos(nanos.round() as u64)
        } else {
            Duration::MAX
        }
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts.
    ///
    /// On exhaustion the last attempt's error is returned unchanged. The delay
    /// is awaited in the calling task; nothing is spawned.
    ///
    /// # Examples
    ///
    /// ```
    /// use valorant_api::RetryPolicy;
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let policy: RetryPolicy<std::io::Error> = RetryPolicy::builder()
    ///     .initial_delay(Duration::from_millis(1))
    ///     .build()?;
    ///
    /// let calls = AtomicUsize::new(0);
    /// let value = policy
    ///     .execute(|| {
    ///         let n = calls.fetch_add(1, Ordering::SeqCst);
    ///         async move {
    ///             if n == 0 {
    ///                 Err(std::io::Error::other("flaky"))
    ///             } else {
    ///                 Ok(n)
    ///             }
    ///         }
    ///     })
    ///     .await?;
    ///
    /// assert_eq!(value, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute<T, F, Fut>(&self, mut operation: F) -> std::result::Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let remaining = self.max_attempts.saturating_sub(attempt);

            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !self.predicate.should_retry(&error, attempt) {
                tracing::warn!(
                    error = %error,
                    attempt = attempt,
                    "Attempt failed with non-retryable error"
                );
                return Err(error);
            }

            if remaining == 0 {
                tracing::warn!(
                    error = %error,
                    attempts = attempt,
                    "Attempt failed, no retries left"
                );
                return Err(error);
            }

            let delay = self.delay_for_retry(attempt);

            tracing::warn!(
                error = %error,
                attempt = attempt,
                remaining = remaining,
                "Attempt failed"
            );

            if let Some(hook) = &self.on_retry {
                hook(remaining, &error, delay);
            }
            drop(error);

            tracing::info!(
                delay_ms = delay.as_millis() as u64,
                attempt = attempt,
                "Retrying after delay"
            );

            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy<Error> {
    /// 3 attempts, 1 second initial delay, multiplier 2.0, retrying any
    /// transport failure, no hook.
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            predicate: Arc::new(RetryOnTransportError),
            on_retry: None,
        }
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            initial_delay: self.initial_delay,
            backoff_multiplier: self.backoff_multiplier,
            predicate: Arc::clone(&self.predicate),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("on_retry", &self.on_retry.is_some())
            .finish_non_exhaustive()
    }
}

const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(1);
const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

/// Builder for a [`RetryPolicy`].
///
/// Parameters are checked in [`build`](RetryPolicyBuilder::build), so a policy
/// that exists is always a valid one.
pub struct RetryPolicyBuilder<E = Error> {
    max_attempts: usize,
    initial_delay: Duration,
    backoff_multiplier: f64,
    predicate: Option<Arc<dyn RetryPredicate<E>>>,
    on_retry: Option<RetryHook<E>>,
}

impl<E: 'static> RetryPolicyBuilder<E> {
    /// Creates a builder with the default parameters.
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            predicate: None,
            on_retry: None,
        }
    }

    /// Sets the total number of attempts. Must be at least 1.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the factor the delay grows by after each retry. Must be finite and >= 1.
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Sets the predicate deciding which failures are retried.
    ///
    /// Defaults to [`RetryAll`].
    pub fn retry_predicate(mut self, predicate: impl RetryPredicate<E> + 'static) -> Self {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Retries only the failures for which `f` returns `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use valorant_api::RetryPolicy;
    /// use std::io::ErrorKind;
    ///
    /// let policy = RetryPolicy::<std::io::Error>::builder()
    ///     .retry_if(|e: &std::io::Error| e.kind() == ErrorKind::TimedOut)
    ///     .build();
    /// assert!(policy.is_ok());
    /// ```
    pub fn retry_if<F>(self, f: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_predicate(RetryIf(f))
    }

    /// Sets a hook called before every retry sleep with
    /// `(attempts_remaining, error, delay)`.
    ///
    /// The hook is not called for the final failure or for non-retryable errors.
    pub fn on_retry<F>(mut self, hook: F) -> Self
    where
        F: Fn(usize, &E, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(hook));
        self
    }

    /// Builds the policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if `max_attempts` is 0 or the
    /// multiplier is not a finite number >= 1.
    pub fn build(self) -> Result<RetryPolicy<E>> {
        if self.max_attempts == 0 {
            return Err(Error::ConfigurationError(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(Error::ConfigurationError(format!(
                "backoff_multiplier must be a finite number >= 1, got {}",
                self.backoff_multiplier
            )));
        }

        Ok(RetryPolicy {
            max_attempts: self.max_attempts,
            initial_delay: self.initial_delay,
            backoff_multiplier: self.backoff_multiplier,
            predicate: self.predicate.unwrap_or_else(|| Arc::new(RetryAll)),
            on_retry: self.on_retry,
        })
    }
}

impl<E: 'static> Default for RetryPolicyBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Decides whether a failed attempt should be retried.
///
/// # Examples
///
/// ```
/// use valorant_api::{Error, RetryPredicate};
///
/// struct FirstTwoAttempts;
///
/// impl RetryPredicate for FirstTwoAttempts {
///     fn should_retry(&self, error: &Error, attempt: usize) -> bool {
///         error.is_retryable() && attempt <= 2
///     }
/// }
/// ```
pub trait RetryPredicate<E = Error>: Send + Sync {
    /// Returns `true` if the operation should be attempted again.
    ///
    /// `attempt` is the 1-indexed number of the attempt that just failed.
    fn should_retry(&self, error: &E, attempt: usize) -> bool;
}

/// Retry every failure.
#[derive(Debug, Clone, Copy)]
pub struct RetryAll;

impl<E> RetryPredicate<E> for RetryAll {
    fn should_retry(&self, _error: &E, _attempt: usize) -> bool {
        true
    }
}

/// Retry any transport-level failure (network errors and timeouts).
///
/// This is the predicate of the default policy.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTransportError;

impl RetryPredicate for RetryOnTransportError {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// Retry only on timeout errors.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTimeout;

impl RetryPredicate for RetryOnTimeout {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::Timeout)
    }
}

/// Retry only on network/connection errors.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnConnectionError;

impl RetryPredicate for RetryOnConnectionError {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::Network(_))
    }
}

/// Combine multiple retry predicates with OR logic.
///
/// # Examples
///
/// ```
/// use valorant_api::retry::{OrPredicate, RetryOnConnectionError, RetryOnTimeout};
///
/// let predicate = OrPredicate::new(vec![
///     Box::new(RetryOnConnectionError),
///     Box::new(RetryOnTimeout),
/// ]);
/// ```
pub struct OrPredicate<E = Error> {
    predicates: Vec<Box<dyn RetryPredicate<E>>>,
}

impl<E> OrPredicate<E> {
    /// Creates a new `OrPredicate` from a list of predicates.
    pub fn new(predicates: Vec<Box<dyn RetryPredicate<E>>>) -> Self {
        Self { predicates }
    }
}

impl<E> RetryPredicate<E> for OrPredicate<E> {
    fn should_retry(&self, error: &E, attempt: usize) -> bool {
        self.predicates
            .iter()
            .any(|p| p.should_retry(error, attempt))
    }
}

struct RetryIf<F>(F);

impl<E, F> RetryPredicate<E> for RetryIf<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn should_retry(&self, error: &E, _attempt: usize) -> bool {
        (self.0)(error)
    }
}
