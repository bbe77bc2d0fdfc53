//! Recursive discovery of feed files.

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Returns the absolute paths of every file under `root` whose extension is
/// `extension`, in a stable order (directories are walked with entries sorted
/// by file name).
///
/// A missing root yields an empty list.
pub fn find_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    let root = match root.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            warn!("Cannot read feed root {}: {}", root.display(), e);
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    for entry_result in WalkDir::new(&root)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    info!("{} files found in {}", files.len(), root.display());
    files
}
