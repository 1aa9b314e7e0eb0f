//! Exclusion-aware replication of the build output tree
//!
//! `replicate` walks the source tree depth-first and reproduces it under the
//! instance directory, consulting the exclusion matcher at every level. At
//! each directory the direct child files are processed before the child
//! directories, and exclusion is evaluated against the bare entry name at the
//! level it is encountered, so a directory named `logs` prunes that whole
//! subtree no matter how deep it sits.
//!
//! `copy_extras` handles the always-copy list: paths named there are copied
//! from the source root into the instance root unconditionally, with no
//! exclusion filtering; an absent path is recorded as missing rather than
//! raising an error.
//!
//! Neither function ever deletes or modifies anything under the source tree.
//! Instead of printing progress, both return a stream of [`CopyOutcome`]
//! events for the caller to render.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::matcher;

/// Extensions copied as decoded/re-encoded text; everything else is copied
/// as an opaque byte stream.
const TEXT_EXTENSIONS: &[&str] = &["json", "txt", "htm", "html", "bat", "ps1"];

/// Per-entry decision made during replication, relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// A file was copied.
    Copied { path: PathBuf },
    /// A directory was created and its contents recursed into.
    CopiedDir { path: PathBuf },
    /// An entry matched an exclusion pattern and was skipped with its
    /// subtree.
    Excluded { path: PathBuf },
    /// A requested source path does not exist.
    Missing { path: PathBuf },
}

/// Replicate `source_root` under `dest_root`, skipping excluded entries.
///
/// The destination root is created first, intermediate directories included.
/// A missing source root is reported with a warning and yields an empty
/// outcome list rather than an error, so the rest of the instance pipeline
/// can still run.
pub fn replicate(
    source_root: &Path,
    dest_root: &Path,
    exclusions: &[String],
) -> Result<Vec<CopyOutcome>> {
    fs::create_dir_all(dest_root)?;

    let mut outcomes = Vec::new();
    if !source_root.is_dir() {
        warn!("source directory does not exist: {}", source_root.display());
        return Ok(outcomes);
    }

    copy_level(source_root, dest_root, exclusions, Path::new(""), &mut outcomes)?;
    Ok(outcomes)
}

/// Copy one directory level: files first, then subdirectories.
fn copy_level(
    source_dir: &Path,
    dest_dir: &Path,
    exclusions: &[String],
    relative: &Path,
    outcomes: &mut Vec<CopyOutcome>,
) -> Result<()> {
    let mut files = Vec::new();
    let mut directories = Vec::new();
    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            directories.push(entry.path());
        } else {
            files.push(entry.path());
        }
    }
    // Deterministic traversal order
    files.sort();
    directories.sort();

    for file in files {
        let name = entry_name(&file);
        let rel = relative.join(&name);
        if matcher::is_excluded(&name, exclusions) {
            debug!("excluded: {}", rel.display());
            outcomes.push(CopyOutcome::Excluded { path: rel });
            continue;
        }
        copy_file(&file, &dest_dir.join(&name))?;
        debug!("copied: {}", rel.display());
        outcomes.push(CopyOutcome::Copied { path: rel });
    }

    for dir in directories {
        let name = entry_name(&dir);
        let rel = relative.join(&name);
        if matcher::is_excluded(&name, exclusions) {
            debug!("excluded directory: {}", rel.display());
            outcomes.push(CopyOutcome::Excluded { path: rel });
            continue;
        }
        let dest_sub = dest_dir.join(&name);
        fs::create_dir_all(&dest_sub)?;
        outcomes.push(CopyOutcome::CopiedDir { path: rel.clone() });
        copy_level(&dir, &dest_sub, exclusions, &rel, outcomes)?;
    }

    Ok(())
}

/// Copy the always-copy extras from the source root into the instance root,
/// bypassing exclusion matching. Missing entries become `Missing` outcomes.
pub fn copy_extras(
    source_root: &Path,
    dest_root: &Path,
    extras: &[String],
) -> Result<Vec<CopyOutcome>> {
    let mut outcomes = Vec::new();

    for extra in extras {
        let source = source_root.join(extra);
        if source.is_file() {
            let dest = dest_root.join(extra);
            copy_file(&source, &dest)?;
            outcomes.push(CopyOutcome::Copied {
                path: PathBuf::from(extra),
            });
        } else if source.is_dir() {
            let dest = dest_root.join(entry_name(&source));
            copy_dir_unfiltered(&source, &dest)?;
            outcomes.push(CopyOutcome::CopiedDir {
                path: PathBuf::from(extra),
            });
        } else {
            warn!("additional path not found in source: {}", extra);
            outcomes.push(CopyOutcome::Missing {
                path: PathBuf::from(extra),
            });
        }
    }

    Ok(outcomes)
}

/// Recursively copy a directory with no exclusion filtering.
fn copy_dir_unfiltered(source: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .expect("walkdir yields paths under its root");
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Copy one file, choosing the strategy by extension: the text allow-list is
/// read and rewritten as UTF-8 text, everything else is byte-copied with
/// destination overwrite.
fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let extension = source
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    let is_text = extension
        .as_deref()
        .is_some_and(|e| TEXT_EXTENSIONS.contains(&e));

    if is_text {
        let content = fs::read_to_string(source)?;
        fs::write(dest, content)?;
    } else {
        fs::copy(source, dest)?;
    }
    Ok(())
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
