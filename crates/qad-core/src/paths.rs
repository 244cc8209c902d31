use crate::error::{DashboardError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const QAD_DIR: &str = ".qad";
pub const REPORTS_DIR: &str = ".qad/reports";
pub const CLONES_DIR: &str = ".qad/repositories";
pub const PERF_RESULTS_DIR: &str = ".qad/perf-results";
pub const OUTPUT_DIR: &str = ".qad/dashboard";

pub const CONFIG_FILE: &str = ".qad/config.yaml";
pub const HISTORY_FILE: &str = ".qad/history/dashboard.csv";
pub const DASHBOARD_HTML: &str = "index.html";

// ---------------------------------------------------------------------------
// ReportKind
// ---------------------------------------------------------------------------

/// The per-repository report files the collectors write and the
/// normalizers read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Lint,
    DocStyle,
    DeadCode,
    CommonErrors,
    CycloJson,
    MaintJson,
    Coverage,
}

impl ReportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportKind::Lint => "linter.txt",
            ReportKind::DocStyle => "docstyle.txt",
            ReportKind::DeadCode => "dead_code.txt",
            ReportKind::CommonErrors => "common_errors.txt",
            ReportKind::CycloJson => "cc.json",
            ReportKind::MaintJson => "mi.json",
            ReportKind::Coverage => "coverage.txt",
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn qad_dir(root: &Path) -> PathBuf {
    root.join(QAD_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn report_path(root: &Path, repo: &str, kind: ReportKind) -> PathBuf {
    root.join(REPORTS_DIR)
        .join(format!("{}.{}", repo, kind.extension()))
}

pub fn clone_dir(root: &Path, repo: &str) -> PathBuf {
    root.join(CLONES_DIR).join(repo)
}

pub fn perf_results_dir(root: &Path) -> PathBuf {
    root.join(PERF_RESULTS_DIR)
}

pub fn history_csv(root: &Path) -> PathBuf {
    root.join(HISTORY_FILE)
}

pub fn output_dir(root: &Path) -> PathBuf {
    root.join(OUTPUT_DIR)
}

pub fn dashboard_html(root: &Path) -> PathBuf {
    output_dir(root).join(DASHBOARD_HTML)
}

// ---------------------------------------------------------------------------
// Repository name validation
// ---------------------------------------------------------------------------

static REPO_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn repo_name_re() -> &'static Regex {
    REPO_NAME_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Repository names end up in filesystem paths, CI job names and shell
/// working directories, so anything outside the slug alphabet is rejected
/// up front.
pub fn validate_repo_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > 100 || !repo_name_re().is_match(name) {
        return Err(DashboardError::InvalidRepoName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
