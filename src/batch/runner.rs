use std::fs;
use std::path::Path;

use crate::batch::discover::discover;
use crate::batch::report::BatchReport;
use crate::document::json::Document;
use crate::foundation::error::{MigrateError, MigrateResult};
use crate::migrate::pipeline::{MigrationOutcome, MigrationReport, Migrator, SkipReason};

/// Options for a migration run.
#[derive(Clone, Debug, Default)]
pub struct RunOpts {
    /// Migrate in memory and report, but never write files.
    pub dry_run: bool,
}

/// What happened to one file.
#[derive(Clone, Debug, PartialEq)]
pub enum FileOutcome {
    Migrated {
        report: MigrationReport,
        written: bool,
    },
    Skipped(SkipReason),
}

/// Reads, migrates and (unless dry-run) overwrites one sky document.
///
/// Only version-2 documents are written; everything else stays byte-identical on disk.
pub fn migrate_file(path: &Path, opts: &RunOpts) -> MigrateResult<FileOutcome> {
    migrate_file_with(&Migrator::standard(), path, opts)
}

/// [`migrate_file`] with a caller-supplied step list.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn migrate_file_with(
    migrator: &Migrator,
    path: &Path,
    opts: &RunOpts,
) -> MigrateResult<FileOutcome> {
    let text = fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;
    let mut doc: Document = serde_json::from_str(&text).map_err(|e| MigrateError::json(path, e))?;

    let report = match migrator.migrate(&mut doc)? {
        MigrationOutcome::Skipped(reason) => return Ok(FileOutcome::Skipped(reason)),
        MigrationOutcome::Migrated(report) => report,
    };

    for change in &report.changes {
        tracing::info!(file = %path.display(), "{change}");
    }

    let written = !opts.dry_run;
    if written {
        let out = serde_json::to_string_pretty(&doc).map_err(|e| MigrateError::json(path, e))?;
        fs::write(path, out).map_err(|e| MigrateError::io(path, e))?;
    }
    Ok(FileOutcome::Migrated { report, written })
}

/// Migrates every sky document under `root`. Per-file failures never stop the batch.
pub fn run(root: &Path, opts: &RunOpts) -> BatchReport {
    let mut batch = BatchReport {
        dry_run: opts.dry_run,
        ..BatchReport::default()
    };

    let migrator = Migrator::standard();
    tracing::debug!(steps = ?migrator.step_names(), "migration pipeline");

    for path in discover(root) {
        batch.processed += 1;
        match migrate_file_with(&migrator, &path, opts) {
            Ok(FileOutcome::Migrated { report, .. }) => batch.record_migrated(&path, &report),
            Ok(FileOutcome::Skipped(reason)) => {
                match &reason {
                    SkipReason::MissingSchemaVersion => {
                        tracing::info!(file = %path.display(), "{reason}")
                    }
                    SkipReason::OtherVersion(_) => {
                        tracing::debug!(file = %path.display(), "{reason}")
                    }
                }
                batch.record_unchanged(&path);
            }
            Err(err) => {
                if err.is_json() {
                    tracing::warn!(file = %path.display(), "error decoding JSON, skipped: {err}");
                } else {
                    tracing::warn!(file = %path.display(), "skipped: {err}");
                }
                batch.record_failed(&path, err.to_string());
            }
        }
    }
    batch
}

#[cfg(test)]
#[path = "../../tests/unit/batch/runner.rs"]
mod tests;
