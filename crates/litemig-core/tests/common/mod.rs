//! Shared fixtures for runner tests: an in-memory handle with a version slot

#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use litemig_core::errors::{ExError, ExErrorKind, Result};
use litemig_core::{MigrateContext, MigrationStep, Version, VersionStore};

/// Fake database handle: a version slot plus a journal of applied steps
#[derive(Default)]
pub struct MemDb {
    pub version: Cell<Version>,
    pub writes: RefCell<Vec<Version>>,
    pub applied: Vec<&'static str>,
    pub fail_read: bool,
    pub fail_write_to: Option<Version>,
}

impl MemDb {
    pub fn at(version: Version) -> Self {
        let db = Self::default();
        db.version.set(version);
        db
    }

    pub fn version(&self) -> Version {
        self.version.get()
    }
}

impl VersionStore for MemDb {
    fn get_version(&self, ctx: &MigrateContext) -> Result<Version> {
        ctx.check()
            .map_err(|e| ExError::new(ExErrorKind::VersionRead).with_source(e.into()))?;
        if self.fail_read {
            return Err(ExError::new(ExErrorKind::VersionRead).with_message("disk I/O error"));
        }
        Ok(self.version.get())
    }

    fn set_version(&self, ctx: &MigrateContext, version: Version) -> Result<()> {
        ctx.check().map_err(|e| {
            ExError::new(ExErrorKind::VersionWrite)
                .with_to_version(version)
                .with_source(e.into())
        })?;
        if self.fail_write_to == Some(version) {
            return Err(ExError::new(ExErrorKind::VersionWrite)
                .with_to_version(version)
                .with_message("database is locked"));
        }
        self.writes.borrow_mut().push(version);
        self.version.set(version);
        Ok(())
    }
}

/// Step that records its name in the handle's journal
pub fn step(from: Version, to: Version, name: &'static str) -> MigrationStep<MemDb> {
    MigrationStep::new(from, to, move |_ctx: &MigrateContext, db: &mut MemDb| {
        db.applied.push(name);
        Ok(())
    })
    .with_name(name)
}

/// Step that records its name, then fails
pub fn failing_step(from: Version, to: Version, name: &'static str) -> MigrationStep<MemDb> {
    MigrationStep::new(from, to, move |_ctx: &MigrateContext, db: &mut MemDb| {
        db.applied.push(name);
        Err(ExError::new(ExErrorKind::Persistence).with_message("syntax error near ALTER"))
    })
    .with_name(name)
}
