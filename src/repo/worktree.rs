//! Worktree file synchronization

use crate::error::Result;
use crate::glob::Glob;
use std::fs;
use std::path::{Path, PathBuf};

const GIT_DIR: &str = ".git";

/// Relative `/`-separated paths of all files under `root`, sorted
///
/// The `.git` directory at the root is skipped.
pub fn list_files(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let mut pending: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            if dir == root && entry.file_name() == GIT_DIR {
                continue;
            }
            if file_type.is_dir() {
                pending.push(path);
            } else if let Ok(rel) = path.strip_prefix(root) {
                files.push(to_slash(rel));
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Replace the files selected by `glob` in `worktree` with those in `snapshot`
///
/// Files not selected by the glob keep their worktree content.
pub fn replace_matching(worktree: &Path, snapshot: &Path, glob: &Glob) -> Result<()> {
    for rel in list_files(worktree)? {
        if glob.matches(&rel) {
            fs::remove_file(worktree.join(&rel))?;
        }
    }
    prune_empty_dirs(worktree, true)?;

    for rel in list_files(snapshot)? {
        if !glob.matches(&rel) {
            continue;
        }
        let target = worktree.join(&rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(snapshot.join(&rel), target)?;
    }

    Ok(())
}

fn prune_empty_dirs(dir: &Path, is_root: bool) -> Result<bool> {
    let mut empty = true;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if is_root && entry.file_name() == GIT_DIR {
            empty = false;
            continue;
        }
        if entry.file_type()?.is_dir() {
            if prune_empty_dirs(&entry.path(), false)? {
                fs::remove_dir(entry.path())?;
            } else {
                empty = false;
            }
        } else {
            empty = false;
        }
    }
    Ok(empty)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
