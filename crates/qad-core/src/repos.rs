//! Repository clones and source statistics.

use crate::config::CiConfig;
use crate::error::{DashboardError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Directories never counted as sources and never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", "venv", ".venv", "node_modules", "target", "__pycache__"];

// ---------------------------------------------------------------------------
// Clone / fetch
// ---------------------------------------------------------------------------

fn run_git(dir: &Path, args: &[&str]) -> Result<()> {
    which::which("git").map_err(|_| DashboardError::GitFailed("git not found in PATH".into()))?;

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| DashboardError::GitFailed(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let hint: String = stderr.chars().take(500).collect();
        return Err(DashboardError::GitFailed(format!(
            "git {} failed: {}",
            args.first().unwrap_or(&""),
            hint.trim()
        )));
    }
    Ok(())
}

/// Clone a repository into `.qad/repositories/{repo}`, or refresh an
/// existing clone to the remote head.
pub fn clone_or_fetch(root: &Path, ci: &CiConfig, repo: &str) -> Result<()> {
    paths::validate_repo_name(repo)?;
    let dir = paths::clone_dir(root, repo);

    if dir.join(".git").is_dir() {
        tracing::info!(repo, "fetching repository");
        run_git(&dir, &["fetch", "--depth", "1", "origin"])?;
        run_git(&dir, &["reset", "--hard", "origin/HEAD"])?;
        return Ok(());
    }

    let url = format!("{}/{}.git", ci.git_base_url.trim_end_matches('/'), repo);
    let parent = dir
        .parent()
        .ok_or_else(|| DashboardError::GitFailed("clone dir has no parent".into()))?
        .to_path_buf();
    crate::io::ensure_dir(&parent)?;
    tracing::info!(repo, url, "cloning repository");
    run_git(&parent, &["clone", "--depth", "1", &url, repo])?;
    Ok(())
}

/// Remove a repository clone. The name is re-validated so a config edit
/// can never turn this into an arbitrary directory removal.
pub fn cleanup(root: &Path, repo: &str) -> Result<()> {
    paths::validate_repo_name(repo)?;
    let dir = paths::clone_dir(root, repo);
    if dir.exists() {
        std::fs::remove_dir_all(&dir)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// SourceStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub files: u32,
    pub total_lines: u64,
}

/// Count source files with the given extension (and their lines) in a
/// repository clone.
pub fn source_stats(clone_dir: &Path, extension: &str) -> Result<SourceStats> {
    let mut stats = SourceStats::default();
    walk(clone_dir, extension, &mut stats)?;
    Ok(stats)
}

fn walk(dir: &Path, extension: &str, stats: &mut SourceStats) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if path.is_dir() {
            if SKIPPED_DIRS.contains(&name.as_ref()) {
                continue;
            }
            walk(&path, extension, stats)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            stats.files += 1;
            let content = std::fs::read_to_string(&path).unwrap_or_default();
            stats.total_lines += content.lines().count() as u64;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
