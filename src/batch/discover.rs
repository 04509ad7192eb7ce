use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("json")
}

/// Sky documents under `root`: every `assets/<namespace>/sky/**/*.json`.
///
/// Hidden files and directories are skipped. Unreadable entries are logged and skipped.
/// The result is sorted so runs are deterministic.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let assets = root.join("assets");
    let namespaces = match std::fs::read_dir(&assets) {
        Ok(rd) => rd,
        Err(err) => {
            tracing::warn!(dir = %assets.display(), "cannot list asset namespaces: {err}");
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    for ns in namespaces.filter_map(Result::ok) {
        if ns.file_name().to_str().is_some_and(|n| n.starts_with('.')) {
            continue;
        }
        let sky = ns.path().join("sky");
        if !sky.is_dir() {
            continue;
        }
        let walker = WalkDir::new(&sky)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_hidden(e));
        for entry in walker {
            match entry {
                Ok(e) if e.file_type().is_file() && is_json(e.path()) => {
                    files.push(e.into_path());
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("skipping unreadable entry: {err}"),
            }
        }
    }

    files.sort();
    tracing::debug!(count = files.len(), root = %root.display(), "discovered sky documents");
    files
}

#[cfg(test)]
#[path = "../../tests/unit/batch/discover.rs"]
mod tests;
