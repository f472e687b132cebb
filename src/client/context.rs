//! Per-call cancellation and deadlines

use std::{future::Future, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{BentoError, Result};

/// Cancellation signal and optional deadline passed to every operation
///
/// Contexts form a tree: a child is cancelled when its parent is, and its
/// deadline is never later than its parent's.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Wrap an existing cancellation token
    pub fn from_token(token: CancellationToken) -> Self {
        Self { token, deadline: None }
    }

    /// Derive a child that can be cancelled independently of this context
    pub fn child(&self) -> Self {
        Self { token: self.token.child_token(), deadline: self.deadline }
    }

    /// Derive a child whose deadline is `timeout` from now (or earlier, if inherited)
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a child with the given deadline (or earlier, if inherited)
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) => parent.min(deadline),
            None => deadline,
        };

        Self { token: self.token.child_token(), deadline: Some(deadline) }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// The error this context would currently fail with, if any
    pub fn check(&self) -> Result<()> {
        if self.token.is_cancelled() {
            return Err(BentoError::Cancelled);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(BentoError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `future` to completion unless this context fires first
    ///
    /// When the context fires, `future` is dropped.
    pub async fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(BentoError::Cancelled),
            () = deadline => Err(BentoError::DeadlineExceeded),
            result = future => result,
        }
    }
}
