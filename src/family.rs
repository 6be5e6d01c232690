// src/family.rs
//! Discovery of the files that make up one output family.
//!
//! A family is a base file (`run.e`) plus the continuation files a run writes
//! each time its mesh adapts (`run.e-s002`, `run.e-s003`, ...). Continuations
//! are ordered lexicographically, which matches the order they were written.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A family file and the modification time observed when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyMember {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Suffix that introduces a continuation file name.
pub const CONTINUATION_MARKER: &str = "-s";

fn modified_time(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Sibling files named `<base name>-s*`, sorted lexicographically.
pub fn continuation_paths(base: &Path) -> Vec<PathBuf> {
    let Some(base_name) = base.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };
    let prefix = format!("{}{}", base_name, CONTINUATION_MARKER);

    let parent = base.parent().filter(|p| !p.as_os_str().is_empty());
    let Ok(entries) = fs::read_dir(parent.unwrap_or(Path::new("."))) else {
        return Vec::new();
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            if !name.starts_with(&prefix) {
                return None;
            }
            Some(match parent {
                Some(dir) => dir.join(name),
                None => PathBuf::from(name),
            })
        })
        .collect();
    paths.sort();
    paths
}

/// The active files of the family rooted at `base`, base first.
///
/// A continuation older than the base file is left over from an earlier,
/// longer run and is dropped. A missing base yields an empty family.
pub fn resolve_family(base: &Path, include_adaptive: bool) -> Vec<FamilyMember> {
    if !base.is_file() {
        return Vec::new();
    }
    let reference = modified_time(base);

    let mut candidates = vec![base.to_path_buf()];
    if include_adaptive {
        candidates.extend(continuation_paths(base));
    }

    candidates
        .into_iter()
        .map(|path| {
            let modified = modified_time(&path);
            FamilyMember { path, modified }
        })
        .filter(|member| member.modified >= reference)
        .collect()
}
