//! Cancellation plumbing shared by the foreground services.
//!
//! Services receive a [`CancellationToken`] and race every collaborator
//! future against it. Dropping the losing future is what aborts the
//! underlying I/O, so port traits never need to see the token.

use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// The caller cancelled the operation.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("operation cancelled by caller")]
pub struct Cancelled;

/// Races futures against a cancellation token.
pub trait CancellationExt {
    /// Runs `operation` unless the token fires first.
    ///
    /// Cancellation wins ties, so an already-cancelled token never polls the
    /// operation.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] when the token is cancelled before `operation`
    /// completes.
    fn guard<F>(&self, operation: F) -> impl Future<Output = Result<F::Output, Cancelled>> + Send
    where
        F: Future + Send,
        F::Output: Send;

    /// Fails fast when the token has already fired.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] when the token is cancelled.
    fn ensure_active(&self) -> Result<(), Cancelled>;
}

impl CancellationExt for CancellationToken {
    async fn guard<F>(&self, operation: F) -> Result<F::Output, Cancelled>
    where
        F: Future + Send,
        F::Output: Send,
    {
        tokio::select! {
            biased;
            () = self.cancelled() => Err(Cancelled),
            output = operation => Ok(output),
        }
    }

    fn ensure_active(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        Ok(())
    }
}
