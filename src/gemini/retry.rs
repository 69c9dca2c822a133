use crate::{
    config::RetryPolicy,
    error::GenerationError,
    models::{GeneratedImage, GenerationAttempt},
};

use super::classifier::Classification;

/// States of one orchestration.
#[derive(Debug)]
pub enum RetryState {
    Attempting { attempt: u32 },
    /// Backing off after `attempt` returned the retryable `status`.
    Waiting { attempt: GenerationAttempt, status: u16 },
    Succeeded(GeneratedImage),
    Exhausted(GenerationError),
}

impl RetryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RetryState::Succeeded(_) | RetryState::Exhausted(_))
    }
}

/// Pure transition logic for the bounded retry loop.
#[derive(Debug, Clone)]
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn start(&self) -> RetryState {
        RetryState::Attempting { attempt: 1 }
    }

    pub fn attempt(&self, attempt_number: u32) -> GenerationAttempt {
        GenerationAttempt {
            attempt_number,
            backoff_delay: self.policy.backoff_delay(attempt_number),
        }
    }

    /// State after `attempt` was classified.
    pub fn on_classified(&self, attempt: u32, classification: Classification) -> RetryState {
        match classification {
            Classification::Success(image) => RetryState::Succeeded(image),
            Classification::FatalFailure(err) => RetryState::Exhausted(err),
            Classification::RetryableFailure(status) if attempt < self.policy.max_attempts => {
                RetryState::Waiting {
                    attempt: self.attempt(attempt),
                    status,
                }
            }
            Classification::RetryableFailure(status) => {
                RetryState::Exhausted(GenerationError::RetryableHttp {
                    status,
                    attempts: attempt,
                })
            }
        }
    }

    /// State after the backoff for `attempt` has elapsed.
    pub fn on_backoff_elapsed(&self, attempt: &GenerationAttempt) -> RetryState {
        RetryState::Attempting {
            attempt: attempt.attempt_number + 1,
        }
    }
}

impl Default for RetryController {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}
