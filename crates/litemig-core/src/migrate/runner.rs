//! Migration runner
//!
//! Walks the step chain from the persisted version up to the latest version,
//! persisting progress after every applied step.

use std::collections::HashSet;
use std::fmt;

use crate::context::MigrateContext;
use crate::errors::{ExError, ExErrorKind, Result};
use crate::migrate::step::MigrationStep;
use crate::schema::EVENT_STEP_APPLIED;
use crate::version::{Version, VersionStore};
use crate::{log_op_end, log_op_error, log_op_start};

/// A step that was (or, when planning, would be) applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStep {
    pub from: Version,
    pub to: Version,
    pub name: Option<String>,
}

impl<H: ?Sized> From<&MigrationStep<H>> for AppliedStep {
    fn from(step: &MigrationStep<H>) -> Self {
        Self {
            from: step.from(),
            to: step.to(),
            name: step.name().map(str::to_string),
        }
    }
}

/// Result of a successful migration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateOutcome {
    /// Version read from the database at the start of the run
    pub from_version: Version,
    /// Version recorded at the end of the run (always the latest version)
    pub to_version: Version,
    /// Steps applied, in order
    pub applied: Vec<AppliedStep>,
}

impl MigrateOutcome {
    /// True when the database was already current and nothing was written
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// An ordered set of migration steps that together define how to bring
/// databases at various versions up to a single latest version.
pub struct MigrationSet<H: ?Sized> {
    steps: Vec<MigrationStep<H>>,
    latest: Version,
}

impl<H: ?Sized> MigrationSet<H> {
    /// Create a set from `steps`, keeping their order
    ///
    /// The latest version is the highest `to` among the steps, or 0 when
    /// there are none. If several steps share a `from`, the first one in
    /// `steps` is always the one applied.
    pub fn new(steps: Vec<MigrationStep<H>>) -> Self {
        let latest = steps.iter().map(MigrationStep::to).max().unwrap_or(0);
        Self { steps, latest }
    }

    pub fn latest(&self) -> Version {
        self.latest
    }

    pub fn steps(&self) -> &[MigrationStep<H>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Compute the steps a run starting at `current` would apply
    ///
    /// No database is touched. Uses the same selection rule as [`migrate`].
    ///
    /// # Errors
    ///
    /// `NoMigrationPath` when the chain from `current` does not reach the
    /// latest version.
    ///
    /// [`migrate`]: MigrationSet::migrate
    pub fn plan(&self, current: Version) -> Result<Vec<AppliedStep>> {
        let mut planned = Vec::new();
        self.walk("plan", current, |step| {
            planned.push(AppliedStep::from(step));
            Ok(())
        })?;
        Ok(planned)
    }

    fn next_step(&self, version: Version) -> Option<&MigrationStep<H>> {
        self.steps.iter().find(|step| step.from() == version)
    }

    /// Follow the chain from `start`, handing each selected step to `visit`.
    ///
    /// Selection restarts from the first step after every transition. A step
    /// leading back to a version already reached would repeat forever, so the
    /// walk stops there. Returns the version reached.
    fn walk<F>(&self, op: &str, start: Version, mut visit: F) -> Result<Version>
    where
        F: FnMut(&MigrationStep<H>) -> Result<()>,
    {
        let mut version = start;
        let mut reached = HashSet::from([start]);

        while version != self.latest {
            let Some(step) = self.next_step(version) else {
                break;
            };
            if !reached.insert(step.to()) {
                tracing::warn!(
                    component = module_path!(),
                    op = op,
                    from_version = step.from(),
                    to_version = step.to(),
                    "step leads back to an already reached version"
                );
                break;
            }
            visit(step)?;
            version = step.to();
        }

        if version != self.latest {
            return Err(ExError::new(ExErrorKind::NoMigrationPath)
                .with_op(op)
                .with_versions(version, self.latest)
                .with_message(format!(
                    "no migration path from {} to {}",
                    version, self.latest
                )));
        }
        Ok(version)
    }
}

impl<H: VersionStore + ?Sized> MigrationSet<H> {
    /// Migrate the database to the latest version
    ///
    /// Reads the current version, then repeatedly applies the first step
    /// whose `from` matches it, persisting each step's `to` right after the
    /// step succeeds. Steps are not wrapped in a transaction.
    ///
    /// # Errors
    ///
    /// - `VersionRead`: the current version could not be read
    /// - `StepExecution`: a step failed; nothing after it ran
    /// - `VersionWrite`: a step succeeded but its version could not be recorded
    /// - `NoMigrationPath`: no step continues the chain toward the latest version
    pub fn migrate(&self, ctx: &MigrateContext, db: &mut H) -> Result<MigrateOutcome> {
        log_op_start!(
            "migrate",
            request_id = ctx.request_id().as_str(),
            latest_version = self.latest
        );
        let start = std::time::Instant::now();

        let outcome = self.migrate_impl(ctx, db).map_err(|e| {
            log_op_error!(
                "migrate",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                request_id = ctx.request_id().as_str()
            );
            e
        })?;

        log_op_end!(
            "migrate",
            duration_ms = start.elapsed().as_millis() as u64,
            request_id = ctx.request_id().as_str(),
            from_version = outcome.from_version,
            to_version = outcome.to_version,
            steps_applied = outcome.applied.len() as u64
        );

        Ok(outcome)
    }

    fn migrate_impl(&self, ctx: &MigrateContext, db: &mut H) -> Result<MigrateOutcome> {
        let current = db.get_version(ctx).map_err(|e| {
            ExError::new(ExErrorKind::VersionRead)
                .with_op("migrate")
                .with_message("cannot determine current version")
                .with_source(e)
        })?;

        if current == self.latest {
            tracing::debug!(
                component = module_path!(),
                op = "migrate",
                request_id = ctx.request_id().as_str(),
                current_version = current,
                "database already at latest version"
            );
            return Ok(MigrateOutcome {
                from_version: current,
                to_version: current,
                applied: Vec::new(),
            });
        }

        let mut applied = Vec::new();
        let reached = self.walk("migrate", current, |step| {
            step.run(ctx, db).map_err(|e| {
                step_error(ExErrorKind::StepExecution, step, e).with_message("migration step failed")
            })?;

            db.set_version(ctx, step.to()).map_err(|e| {
                step_error(ExErrorKind::VersionWrite, step, e)
                    .with_message("step applied but version marker not advanced")
            })?;

            tracing::info!(
                component = module_path!(),
                op = "migrate",
                event = EVENT_STEP_APPLIED,
                request_id = ctx.request_id().as_str(),
                from_version = step.from(),
                to_version = step.to(),
                step_name = step.name().unwrap_or(""),
            );
            applied.push(AppliedStep::from(step));
            Ok(())
        })?;

        Ok(MigrateOutcome {
            from_version: current,
            to_version: reached,
            applied,
        })
    }
}

fn step_error<H: ?Sized>(kind: ExErrorKind, step: &MigrationStep<H>, cause: ExError) -> ExError {
    let err = ExError::new(kind)
        .with_op("migrate")
        .with_versions(step.from(), step.to())
        .with_source(cause);
    match step.name() {
        Some(name) => err.with_step_name(name),
        None => err,
    }
}

impl<H: ?Sized> fmt::Debug for MigrationSet<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationSet")
            .field("steps", &self.steps)
            .field("latest", &self.latest)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoDb;

    fn step(from: Version, to: Version) -> MigrationStep<NoDb> {
        MigrationStep::new(from, to, |_ctx: &MigrateContext, _db: &mut NoDb| Ok(()))
    }

    fn edges(plan: &[AppliedStep]) -> Vec<(Version, Version)> {
        plan.iter().map(|s| (s.from, s.to)).collect()
    }

    #[test]
    fn test_latest_is_max_to() {
        let set = MigrationSet::new(vec![step(0, 1), step(3, 7), step(1, 3)]);
        assert_eq!(set.latest(), 7);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_empty_set_latest_is_zero() {
        let set: MigrationSet<NoDb> = MigrationSet::new(Vec::new());
        assert_eq!(set.latest(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let set = MigrationSet::new(vec![step(2, 3), step(0, 1), step(1, 2)]);
        let froms: Vec<_> = set.steps().iter().map(MigrationStep::from).collect();
        assert_eq!(froms, vec![2, 0, 1]);
    }

    #[test]
    fn test_plan_follows_chain_regardless_of_order() {
        let set = MigrationSet::new(vec![step(2, 3), step(0, 1), step(1, 2)]);
        let plan = set.plan(0).unwrap();
        assert_eq!(edges(&plan), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_plan_prefers_first_step_with_matching_from() {
        let set = MigrationSet::new(vec![step(0, 2), step(0, 1), step(1, 2)]);
        let plan = set.plan(0).unwrap();
        assert_eq!(edges(&plan), vec![(0, 2)]);
    }

    #[test]
    fn test_plan_at_latest_is_empty() {
        let set = MigrationSet::new(vec![step(0, 1)]);
        assert!(set.plan(1).unwrap().is_empty());
    }

    #[test]
    fn test_plan_gap_reports_stuck_version() {
        let set = MigrationSet::new(vec![step(0, 1), step(2, 3)]);
        let err = set.plan(0).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::NoMigrationPath);
        assert_eq!(err.op(), Some("plan"));
        assert_eq!(err.from_version(), Some(1));
        assert_eq!(err.to_version(), Some(3));
    }

    #[test]
    fn test_plan_stops_on_cycle() {
        let set = MigrationSet::new(vec![step(0, 1), step(1, 0), step(5, 6)]);
        let err = set.plan(0).unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::NoMigrationPath);
        assert_eq!(err.from_version(), Some(1));
    }

    #[test]
    fn test_plan_stops_on_self_loop() {
        let set = MigrationSet::new(vec![step(3, 3), step(4, 5)]);
        let err = set.plan(3).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NoMigrationPath);
    }

    #[test]
    fn test_downward_step_is_followed_when_it_leads_to_latest() {
        let set = MigrationSet::new(vec![step(5, 2), step(2, 9)]);
        let plan = set.plan(5).unwrap();
        assert_eq!(edges(&plan), vec![(5, 2), (2, 9)]);
    }

    #[test]
    fn test_plan_carries_step_names() {
        let set = MigrationSet::new(vec![step(0, 1).with_name("create_user")]);
        let plan = set.plan(0).unwrap();
        assert_eq!(plan[0].name.as_deref(), Some("create_user"));
    }
}
