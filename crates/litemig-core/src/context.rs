//! Cancellation and deadline context for migration runs
//!
//! The runner never inspects the context itself. It forwards it into every
//! `VersionStore` call and every step's `apply`, and those implementations
//! call [`MigrateContext::check`] before touching the database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use litemig_core_types::RequestId;
use thiserror::Error;

use crate::errors::{ExError, ExErrorKind};

/// Reason a context refuses further work
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("migration run was cancelled")]
    Cancelled,

    #[error("migration run exceeded its deadline")]
    DeadlineExceeded,
}

impl From<ContextError> for ExError {
    fn from(err: ContextError) -> Self {
        let kind = match err {
            ContextError::Cancelled => ExErrorKind::Cancelled,
            ContextError::DeadlineExceeded => ExErrorKind::DeadlineExceeded,
        };
        ExError::new(kind).with_message(err.to_string())
    }
}

/// Shared cancellation flag
///
/// Clones share the same flag, so a handle kept by another thread can stop
/// a run that is in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every context holding this handle
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Context carried through a migration run
#[derive(Debug, Clone)]
pub struct MigrateContext {
    request_id: RequestId,
    deadline: Option<Instant>,
    cancel: CancelHandle,
}

impl MigrateContext {
    /// Create a context with a fresh RequestId, no deadline and its own cancel flag
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            deadline: None,
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Fail calls made at or after `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Shorthand for a deadline relative to now
    ///
    /// A timeout too large to express as an `Instant` leaves the context
    /// without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Share an externally owned cancel flag
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle that cancels this context (and every clone of it)
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Returns an error once the context is cancelled or past its deadline
    ///
    /// # Errors
    ///
    /// - `ContextError::Cancelled` when the cancel flag is set
    /// - `ContextError::DeadlineExceeded` when the deadline has passed
    pub fn check(&self) -> std::result::Result<(), ContextError> {
        if self.cancel.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl Default for MigrateContext {
    fn default() -> Self {
        Self::new()
    }
}
