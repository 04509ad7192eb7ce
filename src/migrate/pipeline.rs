use serde_json::Value;

use crate::document::json::{Document, has_schema_version, schema_version};
use crate::foundation::core::SOURCE_SCHEMA_VERSION;
use crate::foundation::error::MigrateResult;
use crate::migrate::step::{Change, MigrationCtx, MigrationStep, ReviewFlag};
use crate::migrate::steps::standard_steps;

/// Why a document was left untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// No `schemaVersion` key.
    MissingSchemaVersion,
    /// `schemaVersion` is present but not the migratable one.
    OtherVersion(Value),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSchemaVersion => write!(f, "does not contain a schemaVersion key"),
            Self::OtherVersion(v) => write!(f, "schemaVersion is {v}, nothing to do"),
        }
    }
}

/// What a migrated document went through.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MigrationReport {
    pub changes: Vec<Change>,
    pub flags: Vec<ReviewFlag>,
}

impl MigrationReport {
    pub fn needs_manual_fix(&self) -> bool {
        self.flags.contains(&ReviewFlag::UnknownType)
    }

    pub fn needs_loop_check(&self) -> bool {
        self.flags.contains(&ReviewFlag::LoopCheck)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MigrationOutcome {
    Skipped(SkipReason),
    Migrated(MigrationReport),
}

impl MigrationOutcome {
    pub fn is_migrated(&self) -> bool {
        matches!(self, Self::Migrated(_))
    }
}

/// Ordered list of steps applied to each eligible document.
pub struct Migrator {
    steps: Vec<Box<dyn MigrationStep>>,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::standard()
    }
}

impl Migrator {
    /// The full v2 -> v1 migration.
    pub fn standard() -> Self {
        Self {
            steps: standard_steps(),
        }
    }

    pub fn with_steps(steps: Vec<Box<dyn MigrationStep>>) -> Self {
        Self { steps }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Migrates `doc` in place when it is schema version 2.
    ///
    /// Steps run against a working copy that replaces `doc` only once every step has
    /// succeeded, so a failing step never leaves a half-migrated document behind.
    pub fn migrate(&self, doc: &mut Document) -> MigrateResult<MigrationOutcome> {
        if !has_schema_version(doc) {
            return Ok(MigrationOutcome::Skipped(SkipReason::MissingSchemaVersion));
        }
        if schema_version(doc) != Some(SOURCE_SCHEMA_VERSION as f64) {
            let v = doc.get("schemaVersion").cloned().unwrap_or(Value::Null);
            return Ok(MigrationOutcome::Skipped(SkipReason::OtherVersion(v)));
        }

        let mut work = doc.clone();
        let mut ctx = MigrationCtx::for_document(&work);
        for step in &self.steps {
            if !step.applies(&work, &ctx) {
                continue;
            }
            let before = ctx.changes.len();
            step.apply(&mut work, &mut ctx)?;
            tracing::debug!(
                step = step.name(),
                changes = ctx.changes.len() - before,
                "applied migration step"
            );
        }
        *doc = work;

        Ok(MigrationOutcome::Migrated(MigrationReport {
            changes: ctx.changes,
            flags: ctx.flags,
        }))
    }
}

/// Runs the standard migration on one document.
pub fn migrate_document(doc: &mut Document) -> MigrateResult<MigrationOutcome> {
    Migrator::standard().migrate(doc)
}

#[cfg(test)]
#[path = "../../tests/unit/migrate/pipeline.rs"]
mod tests;
