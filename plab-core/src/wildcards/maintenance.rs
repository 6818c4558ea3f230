//! Duplicate relocation and cleanup of the wildcard directory.
//!
//! Both operations are batches without rollback: the first I/O failure stops
//! the batch and is reported as [`WildcardError::BatchAborted`] listing what was
//! already changed and what was left untouched.

use super::path::relative_display;
use super::{is_wildcard_file, WildcardError, DUPLICATES_DIR};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const RELOCATION: &str = "duplicate relocation";
const CLEANUP: &str = "cleanup";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub removed_files: Vec<String>,
    pub removed_dirs: Vec<String>,
}

impl CleanupReport {
    fn changes(&self) -> Vec<String> {
        self.removed_files
            .iter()
            .chain(&self.removed_dirs)
            .cloned()
            .collect()
    }
}

/// Moves every `.txt` file whose content repeats an earlier file into the
/// quarantine directory, keeping its relative path. Returns the moved paths.
///
/// Files are visited per directory in name order, files before subdirectories,
/// so the retained copy is stable across runs. The quarantine directory at the
/// root is never scanned.
pub fn relocate_duplicates(root: &Path) -> Result<Vec<String>, WildcardError> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let quarantine = root.join(DUPLICATES_DIR);
    fs::create_dir_all(&quarantine).map_err(|e| WildcardError::io(&quarantine, e))?;

    let duplicates = find_duplicates(root)?;

    let mut moved = Vec::with_capacity(duplicates.len());
    for (index, duplicate) in duplicates.iter().enumerate() {
        let destination = quarantine.join(&duplicate.relative_path);
        if let Err(e) = move_file(&duplicate.source, &destination) {
            return Err(WildcardError::BatchAborted {
                operation: RELOCATION,
                completed: moved,
                failed: duplicate.relative.clone(),
                skipped: duplicates[index + 1..]
                    .iter()
                    .map(|d| d.relative.clone())
                    .collect(),
                source: e,
            });
        }
        log::debug!("Moved duplicate '{}' to {}", duplicate.relative, DUPLICATES_DIR);
        moved.push(duplicate.relative.clone());
    }

    log::info!("Relocated {} duplicate wildcard file(s)", moved.len());
    Ok(moved)
}

struct Duplicate {
    /// Display form, for reporting only.
    relative: String,
    relative_path: PathBuf,
    source: PathBuf,
}

/// Every later file whose content hash was already seen, in visit order.
fn find_duplicates(root: &Path) -> Result<Vec<Duplicate>, WildcardError> {
    let mut canonical: HashMap<String, String> = HashMap::new();
    let mut duplicates = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by(|a, b| {
            a.file_type()
                .is_dir()
                .cmp(&b.file_type().is_dir())
                .then_with(|| a.file_name().cmp(b.file_name()))
        })
        .into_iter()
        .filter_entry(|e| !is_quarantine(e));

    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() || !is_wildcard_file(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let bytes = fs::read(entry.path()).map_err(|e| WildcardError::io(entry.path(), e))?;
        let digest = format!("{:x}", md5::compute(&bytes));
        let relative = relative_display(root, entry.path());

        match canonical.entry(digest) {
            Entry::Occupied(first) => {
                let Ok(relative_path) = entry.path().strip_prefix(root).map(Path::to_path_buf)
                else {
                    continue;
                };
                log::debug!("'{}' duplicates '{}'", relative, first.get());
                duplicates.push(Duplicate {
                    relative,
                    relative_path,
                    source: entry.into_path(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(relative);
            }
        }
    }

    Ok(duplicates)
}

fn is_quarantine(entry: &DirEntry) -> bool {
    entry.depth() == 1 && entry.file_type().is_dir() && entry.file_name() == DUPLICATES_DIR
}

/// Never replaces a file quarantined by an earlier run.
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)?;
    }
    if destination.symlink_metadata().is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} is already quarantined", destination.display()),
        ));
    }
    fs::rename(source, destination)
}

/// Destructive cleanup, in order:
///
/// 1. remove files that are not `.txt` or are empty
/// 2. remove directories left empty, deepest first
/// 3. remove the quarantine directory with everything in it
pub fn cleanup(root: &Path) -> Result<CleanupReport, WildcardError> {
    let mut report = CleanupReport::default();
    if !root.is_dir() {
        return Ok(report);
    }

    let files = collect_entries(root, &report, |entry| {
        if entry.file_type().is_dir() {
            return Ok(false);
        }
        if !is_wildcard_file(&entry.file_name().to_string_lossy()) {
            return Ok(true);
        }
        Ok(entry.metadata()?.len() == 0)
    })?;
    remove_files(&mut report, &files, |path| fs::remove_file(path))?;

    let dirs = collect_entries(root, &report, |entry| Ok(entry.file_type().is_dir()))?;
    for (index, (relative, path)) in dirs.iter().enumerate() {
        let removal = fs::read_dir(path)
            .map(|mut entries| entries.next().is_none())
            .and_then(|empty| {
                if empty {
                    fs::remove_dir(path).map(|_| true)
                } else {
                    Ok(false)
                }
            });
        match removal {
            Ok(true) => {
                log::debug!("Removed empty wildcard folder '{}'", relative);
                report.removed_dirs.push(relative.clone());
            }
            Ok(false) => {}
            Err(e) => return Err(aborted(&report, relative, &dirs[index + 1..], e)),
        }
    }

    let quarantine = root.join(DUPLICATES_DIR);
    if quarantine.exists() {
        if let Err(e) = fs::remove_dir_all(&quarantine) {
            return Err(aborted(&report, DUPLICATES_DIR, &[], e));
        }
        report.removed_dirs.push(DUPLICATES_DIR.to_string());
    }

    log::info!(
        "Cleanup removed {} file(s) and {} folder(s)",
        report.removed_files.len(),
        report.removed_dirs.len()
    );
    Ok(report)
}

fn remove_files<F>(
    report: &mut CleanupReport,
    files: &[(String, PathBuf)],
    mut remove: F,
) -> Result<(), WildcardError>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    for (index, (relative, path)) in files.iter().enumerate() {
        if let Err(e) = remove(path) {
            return Err(aborted(report, relative, &files[index + 1..], e));
        }
        log::debug!("Removed wildcard file '{}'", relative);
        report.removed_files.push(relative.clone());
    }
    Ok(())
}

/// Entries under `root` (deepest first) accepted by `select`.
fn collect_entries<F>(
    root: &Path,
    report: &CleanupReport,
    mut select: F,
) -> Result<Vec<(String, PathBuf)>, WildcardError>
where
    F: FnMut(&DirEntry) -> Result<bool, walkdir::Error>,
{
    let mut selected = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .sort_by_file_name();

    for entry in walker {
        let accepted = entry.and_then(|entry| select(&entry).map(|keep| (entry, keep)));
        match accepted {
            Ok((entry, true)) => {
                selected.push((relative_display(root, entry.path()), entry.into_path()));
            }
            Ok((_, false)) => {}
            Err(e) => {
                let failed = e
                    .path()
                    .map(|p| relative_display(root, p))
                    .unwrap_or_default();
                return Err(aborted(report, &failed, &[], e.into()));
            }
        }
    }

    Ok(selected)
}

fn aborted(
    report: &CleanupReport,
    failed: &str,
    remaining: &[(String, PathBuf)],
    source: io::Error,
) -> WildcardError {
    WildcardError::BatchAborted {
        operation: CLEANUP,
        completed: report.changes(),
        failed: failed.to_string(),
        skipped: remaining.iter().map(|(rel, _)| rel.clone()).collect(),
        source,
    }
}

fn walk_error(err: walkdir::Error) -> WildcardError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    WildcardError::Io {
        path,
        source: err.into(),
    }
}
