//! Dashboard history CSV.
//!
//! One row per run: date, eight liveness bits (stage then production,
//! api/jobs availability then token validity), followed by eight numeric
//! columns per repository in the run's repo order. Every value is numeric
//! and repo names never appear in rows, so no quoting is needed.

use crate::error::Result;
use crate::liveness::SystemCheck;
use crate::paths;
use crate::results::DashboardData;
use crate::types::Environment;
use std::path::Path;

// ---------------------------------------------------------------------------
// Append
// ---------------------------------------------------------------------------

const COLUMNS_PER_REPO: usize = 8;
const LIVENESS_COLUMNS: usize = 8;

/// Append one history row for this run.
pub fn append(root: &Path, data: &DashboardData) -> Result<()> {
    let mut fields: Vec<String> = Vec::new();
    fields.push(data.generated_at.format("%Y-%m-%d").to_string());

    for env in Environment::all() {
        let check = data.liveness.get(&env).copied().unwrap_or_default();
        for bit in check.as_bits() {
            fields.push(bit.to_string());
        }
    }

    for metrics in data.repos.values() {
        fields.push(metrics.source.files.to_string());
        fields.push(metrics.source.total_lines.to_string());
        fields.push(metrics.lint.total().to_string());
        fields.push(metrics.lint.passed.to_string());
        fields.push(metrics.lint.failed.to_string());
        fields.push(metrics.docstyle.total().to_string());
        fields.push(metrics.docstyle.passed.to_string());
        fields.push(metrics.docstyle.failed.to_string());
    }

    let row = fields.join(",") + "\n";
    crate::io::append_text(&paths::history_csv(root), &row)
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Per-repository slice of one history row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoHistory {
    pub files: u32,
    pub total_lines: u64,
    pub lint_total: u32,
    pub lint_passed: u32,
    pub lint_failed: u32,
    pub doc_total: u32,
    pub doc_passed: u32,
    pub doc_failed: u32,
}

impl RepoHistory {
    pub fn lint_pass_rate(&self) -> u32 {
        if self.lint_total == 0 {
            return 0;
        }
        100 * self.lint_passed / self.lint_total
    }
}

#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub date: String,
    pub stage: SystemCheck,
    pub production: SystemCheck,
    pub repos: Vec<RepoHistory>,
}

fn check_from_bits(bits: &[u32]) -> SystemCheck {
    SystemCheck {
        api_available: bits[0] != 0,
        jobs_api_available: bits[1] != 0,
        api_token_valid: bits[2] != 0,
        jobs_token_valid: bits[3] != 0,
    }
}

fn parse_row(line: &str) -> Option<HistoryRow> {
    let mut fields = line.split(',');
    let date = fields.next()?.to_string();
    if date.is_empty() {
        return None;
    }

    let rest: Vec<&str> = fields.collect();
    if rest.len() < LIVENESS_COLUMNS || (rest.len() - LIVENESS_COLUMNS) % COLUMNS_PER_REPO != 0 {
        return None;
    }
    let numbers: Vec<u64> = rest
        .iter()
        .map(|f| f.trim().parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?;

    let bits: Vec<u32> = numbers[..LIVENESS_COLUMNS].iter().map(|n| *n as u32).collect();
    let repos = numbers[LIVENESS_COLUMNS..]
        .chunks(COLUMNS_PER_REPO)
        .map(|chunk| RepoHistory {
            files: chunk[0] as u32,
            total_lines: chunk[1],
            lint_total: chunk[2] as u32,
            lint_passed: chunk[3] as u32,
            lint_failed: chunk[4] as u32,
            doc_total: chunk[5] as u32,
            doc_passed: chunk[6] as u32,
            doc_failed: chunk[7] as u32,
        })
        .collect();

    Some(HistoryRow {
        date,
        stage: check_from_bits(&bits[..4]),
        production: check_from_bits(&bits[4..]),
        repos,
    })
}

/// Load the history file. Malformed rows are skipped with a warning so a
/// single bad line never breaks chart rendering.
pub fn load(root: &Path) -> Result<Vec<HistoryRow>> {
    let path = paths::history_csv(root);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(&path)?;
    let mut rows = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(row) => rows.push(row),
            None => tracing::warn!(line = lineno + 1, "skipping malformed history row"),
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
