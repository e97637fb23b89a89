//! Selecting the files a run works on

use itertools::Itertools;
use miette::{miette, IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|allowed| allowed == e))
}

/// Every file below `root` whose extension is one of `extensions`, sorted by path.
///
/// Directories starting with `.` are not entered. Extensions are compared case-sensitively.
pub fn collect_sources(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(miette!("source directory {} does not exist", root.display()));
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_dir(e))
        .filter_ok(|e| e.file_type().is_file() && has_extension(e.path(), extensions))
        .map_ok(DirEntry::into_path)
        .collect::<Result<Vec<_>, _>>()
        .into_diagnostic()
}

/// Every file below `root` with the name it is stored under in an archive, sorted by path.
pub fn collect_entries(root: &Path) -> Result<Vec<(String, PathBuf)>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_ok(|e| e.file_type().is_file())
        .map(|entry| -> Result<(String, PathBuf)> {
            let path = entry.into_diagnostic()?.into_path();
            let relative = path.strip_prefix(root).into_diagnostic()?;
            let name = aoe_bar::write::entry_name(relative)
                .ok_or_else(|| miette!("{} can not be stored in an archive", path.display()))?;
            Ok((name, path))
        })
        .collect()
}
