use std::fmt;
use std::path::{Path, PathBuf};

use crate::migrate::pipeline::MigrationReport;

/// End-of-run summary. Advisory only; nothing here affects the exit status.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub processed: usize,
    pub migrated: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    /// Unrecognized `type`.
    pub manual_fix: Vec<PathBuf>,
    /// Loop condition unrolled into keyframes.
    pub manual_loop_check: Vec<PathBuf>,
    pub dry_run: bool,
}

fn push_once(list: &mut Vec<PathBuf>, path: &Path) {
    if !list.iter().any(|p| p == path) {
        list.push(path.to_path_buf());
    }
}

impl BatchReport {
    pub fn record_migrated(&mut self, path: &Path, report: &MigrationReport) {
        push_once(&mut self.migrated, path);
        if report.needs_manual_fix() {
            push_once(&mut self.manual_fix, path);
        }
        if report.needs_loop_check() {
            push_once(&mut self.manual_loop_check, path);
        }
    }

    pub fn record_unchanged(&mut self, path: &Path) {
        push_once(&mut self.unchanged, path);
    }

    pub fn record_failed(&mut self, path: &Path, reason: impl Into<String>) {
        self.failed.push((path.to_path_buf(), reason.into()));
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "would migrate" } else { "migrated" };
        writeln!(
            f,
            "Processed {} files ({} {verb}, {} unchanged, {} failed)",
            self.processed,
            self.migrated.len(),
            self.unchanged.len(),
            self.failed.len()
        )?;

        if !self.failed.is_empty() {
            writeln!(f, "Files that could not be migrated:")?;
            for (path, reason) in &self.failed {
                writeln!(f, "{}: {reason}", path.display())?;
            }
        }
        if !self.manual_fix.is_empty() {
            writeln!(f, "Files that need manual intervention:")?;
            for path in &self.manual_fix {
                writeln!(f, "{}", path.display())?;
            }
        }
        if !self.manual_loop_check.is_empty() {
            writeln!(f, "Files that need a manual loop check:")?;
            for path in &self.manual_loop_check {
                writeln!(f, "{}", path.display())?;
            }
        }
        Ok(())
    }
}
