//! Migration steps
//!
//! A step is a `from -> to` transition plus the capability that performs it.

use std::fmt;

use crate::context::MigrateContext;
use crate::errors::Result;
use crate::version::Version;

/// The work performed by a migration step
///
/// Implementations must be idempotent: the runner does not wrap a step and
/// its version write in one transaction, so a crash in between re-runs the
/// step against an already migrated schema on the next attempt.
pub trait Apply<H: ?Sized>: Send + Sync {
    /// Perform the step against `db`
    ///
    /// # Errors
    ///
    /// Any error aborts the run and is reported as `StepExecution`.
    fn apply(&self, ctx: &MigrateContext, db: &mut H) -> Result<()>;
}

impl<H: ?Sized, F> Apply<H> for F
where
    F: Fn(&MigrateContext, &mut H) -> Result<()> + Send + Sync,
{
    fn apply(&self, ctx: &MigrateContext, db: &mut H) -> Result<()> {
        self(ctx, db)
    }
}

/// A rule describing how to bring a database from `from` to `to`
pub struct MigrationStep<H: ?Sized> {
    from: Version,
    to: Version,
    name: Option<String>,
    apply: Box<dyn Apply<H>>,
}

impl<H: ?Sized> MigrationStep<H> {
    /// Build a step from a closure
    ///
    /// ```
    /// use litemig_core::{MigrateContext, MigrationStep};
    ///
    /// struct Db;
    /// let step: MigrationStep<Db> =
    ///     MigrationStep::new(0, 1, |_ctx: &MigrateContext, _db: &mut Db| Ok(()));
    /// assert_eq!((step.from(), step.to()), (0, 1));
    /// ```
    pub fn new<F>(from: Version, to: Version, f: F) -> Self
    where
        F: Fn(&MigrateContext, &mut H) -> Result<()> + Send + Sync + 'static,
    {
        Self::from_apply(from, to, f)
    }

    /// Build a step from any `Apply` implementation
    pub fn from_apply(from: Version, to: Version, apply: impl Apply<H> + 'static) -> Self {
        Self {
            from,
            to,
            name: None,
            apply: Box::new(apply),
        }
    }

    /// Attach a human readable name, used in logs and errors
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn from(&self) -> Version {
        self.from
    }

    pub fn to(&self) -> Version {
        self.to
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn run(&self, ctx: &MigrateContext, db: &mut H) -> Result<()> {
        self.apply.apply(ctx, db)
    }
}

impl<H: ?Sized> fmt::Debug for MigrationStep<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationStep")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
