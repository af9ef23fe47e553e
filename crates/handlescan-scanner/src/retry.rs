//! Retry state machine with exponential backoff.
//!
//! A probe moves through `Attempting -> (Backoff -> Attempting)* -> Settled`.
//! The machine decides transitions; waiting happens through a [`Sleeper`]
//! so tests can observe backoff without waiting on the clock.

use async_trait::async_trait;
use handlescan_core::ProbingConfig;
use std::future::Future;
#[cfg(any(test, feature = "test-util"))]
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// How many extra attempts to make and how long to wait between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub max_retries: u32,
    /// Delay before the second attempt, doubled for each later one
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    pub fn from_config(config: &ProbingConfig) -> Self {
        Self::new(config.max_retries, config.backoff_base())
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Backoff after the zero-based `attempt` failed: `base * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// What follows when the zero-based `attempt` ends with `result`.
    pub fn transition(&self, attempt: u32, result: AttemptResult) -> Transition {
        match result {
            AttemptResult::Confident => Transition::Settle,
            AttemptResult::Inconclusive | AttemptResult::TransportFailed if attempt < self.max_retries => {
                Transition::Retry {
                    delay: self.delay_for(attempt),
                }
            }
            AttemptResult::Inconclusive | AttemptResult::TransportFailed => Transition::Settle,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ProbingConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// Attempt number `attempt` (zero-based) is due or running
    Attempting { attempt: u32 },
    /// Attempt `attempt` was not conclusive; wait `delay` before the next
    Backoff { attempt: u32, delay: Duration },
    /// No further attempts will be made
    Settled,
}

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptResult {
    /// A conclusive verdict
    Confident,
    /// A response arrived but could not be classified
    Inconclusive,
    /// No usable response
    TransportFailed,
}

/// The step taken after an attempt ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Wait `delay`, then make another attempt
    Retry { delay: Duration },
    /// Stop with the value of the attempt that just ended
    Settle,
}

#[derive(Debug, Clone)]
pub struct RetryMachine {
    policy: RetryPolicy,
    state: AttemptState,
}

impl RetryMachine {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            state: AttemptState::Attempting { attempt: 0 },
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn is_settled(&self) -> bool {
        self.state == AttemptState::Settled
    }

    /// Record the result of the running attempt and move to the next state.
    ///
    /// Ignored unless an attempt is running.
    pub fn record(&mut self, result: AttemptResult) -> AttemptState {
        if let AttemptState::Attempting { attempt } = self.state {
            self.apply(attempt, self.policy.transition(attempt, result));
        }
        self.state
    }

    fn apply(&mut self, attempt: u32, transition: Transition) {
        self.state = match transition {
            Transition::Retry { delay } => AttemptState::Backoff { attempt, delay },
            Transition::Settle => AttemptState::Settled,
        };
    }

    /// Leave backoff and start the next attempt.
    pub fn resume(&mut self) -> AttemptState {
        if let AttemptState::Backoff { attempt, .. } = self.state {
            self.state = AttemptState::Attempting { attempt: attempt + 1 };
        }
        self.state
    }

    /// Drive attempts until settled, returning the value of the last one.
    ///
    /// `attempt_fn` receives the zero-based attempt number and reports how
    /// the attempt ended alongside the value it produced.
    pub async fn run<T, F, Fut>(mut self, sleeper: &dyn Sleeper, label: &str, mut attempt_fn: F) -> T
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = (AttemptResult, T)>,
    {
        self.state = AttemptState::Attempting { attempt: 0 };
        let mut attempt = 0;
        loop {
            let (result, value) = attempt_fn(attempt).await;

            let transition = self.policy.transition(attempt, result);
            self.apply(attempt, transition);
            match transition {
                Transition::Retry { delay } => {
                    debug!(
                        target_name = label,
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_attempts(),
                        ?result,
                        "retrying in {:?}",
                        delay
                    );
                    sleeper.sleep(delay).await;
                    self.resume();
                    attempt += 1;
                }
                Transition::Settle => return value,
            }
        }
    }
}

/// Something that can wait.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Waits on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately and remembers every requested delay.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_secs(1))
    }

    #[test]
    fn test_delay_doubles() {
        let policy = policy();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.max_attempts(), 3);
    }

    #[test]
    fn test_confident_settles_immediately() {
        let mut machine = RetryMachine::new(policy());
        assert_eq!(machine.record(AttemptResult::Confident), AttemptState::Settled);
        assert!(machine.is_settled());
    }

    #[test]
    fn test_transitions_until_exhausted() {
        let mut machine = RetryMachine::new(policy());

        assert_eq!(
            machine.record(AttemptResult::TransportFailed),
            AttemptState::Backoff {
                attempt: 0,
                delay: Duration::from_secs(1)
            }
        );
        assert_eq!(machine.resume(), AttemptState::Attempting { attempt: 1 });
        assert_eq!(
            machine.record(AttemptResult::Inconclusive),
            AttemptState::Backoff {
                attempt: 1,
                delay: Duration::from_secs(2)
            }
        );
        assert_eq!(machine.resume(), AttemptState::Attempting { attempt: 2 });
        assert_eq!(machine.record(AttemptResult::TransportFailed), AttemptState::Settled);
    }

    #[test]
    fn test_record_ignored_outside_attempt() {
        let mut machine = RetryMachine::new(policy());
        machine.record(AttemptResult::Inconclusive);
        let backoff = machine.state();
        assert_eq!(machine.record(AttemptResult::Confident), backoff);
    }

    #[test]
    fn test_policy_transitions() {
        let policy = policy();
        assert_eq!(policy.transition(0, AttemptResult::Confident), Transition::Settle);
        assert_eq!(
            policy.transition(1, AttemptResult::Inconclusive),
            Transition::Retry {
                delay: Duration::from_secs(2)
            }
        );
        assert_eq!(policy.transition(2, AttemptResult::TransportFailed), Transition::Settle);
    }

    #[tokio::test]
    async fn test_run_starts_from_first_attempt() {
        let sleeper = RecordingSleeper::new();
        let mut machine = RetryMachine::new(policy());
        machine.record(AttemptResult::Inconclusive);

        // A machine left mid-backoff still starts from the first attempt
        let value = machine
            .run(&sleeper, "test", |attempt| async move { (AttemptResult::Confident, attempt) })
            .await;

        assert_eq!(value, 0);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_zero_retries_settles_on_first_failure() {
        let mut machine = RetryMachine::new(RetryPolicy::new(0, Duration::from_secs(1)));
        assert_eq!(machine.record(AttemptResult::TransportFailed), AttemptState::Settled);
    }

    #[tokio::test]
    async fn test_run_sleeps_between_failed_attempts() {
        let sleeper = RecordingSleeper::new();
        let mut seen = Vec::new();

        let value = RetryMachine::new(policy())
            .run(&sleeper, "test", |attempt| {
                seen.push(attempt);
                async move { (AttemptResult::TransportFailed, attempt) }
            })
            .await;

        assert_eq!(value, 2);
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1), Duration::from_secs(2)]);
    }

    #[tokio::test]
    async fn test_run_stops_on_confident() {
        let sleeper = RecordingSleeper::new();

        let value = RetryMachine::new(policy())
            .run(&sleeper, "test", |attempt| async move {
                if attempt == 1 {
                    (AttemptResult::Confident, "taken")
                } else {
                    (AttemptResult::Inconclusive, "unknown")
                }
            })
            .await;

        assert_eq!(value, "taken");
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
    }
}
