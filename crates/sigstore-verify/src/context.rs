//! Cancellation and deadline for verification calls

use crate::error::{Error, Result};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Context propagated into each verification
///
/// A context is cheap to clone; clones share the cancellation token. It is
/// checked before verification starts and around the signature check.
#[derive(Debug, Clone)]
pub struct VerificationContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl Default for VerificationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationContext {
    /// Context that is never cancelled and has no deadline
    pub fn new() -> Self {
        Self {
            cancellation: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Use the given cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Expire `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Expire at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Get the cancellation token
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Get the deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check if the context was cancelled or has expired
    pub fn is_done(&self) -> bool {
        self.cancellation.is_cancelled()
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fail with [`Error::Cancelled`] once the context is done
    pub fn check(&self) -> Result<()> {
        if self.is_done() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}
