//! Code-quality check scripts and their pass/fail reports.
//!
//! Every tracked repository ships its own wrapper scripts
//! (`run-linter.sh`, `check-docstyle.sh`, ...) around whatever
//! static-analysis tool it uses. The dashboard only runs the script in the
//! repository clone, captures stdout, and normalizes the report: a line
//! naming a source file, followed eventually by a line ending in `Pass` or
//! `Fail` for that file.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

// ---------------------------------------------------------------------------
// CheckKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Lint,
    DocStyle,
    DeadCode,
    CommonErrors,
}

impl CheckKind {
    /// The wrapper script each repository is expected to provide.
    pub fn script(&self) -> &'static str {
        match self {
            CheckKind::Lint => "run-linter.sh",
            CheckKind::DocStyle => "check-docstyle.sh",
            CheckKind::DeadCode => "detect-dead-code.sh",
            CheckKind::CommonErrors => "detect-common-errors.sh",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Lint => "linter",
            CheckKind::DocStyle => "docstyle",
            CheckKind::DeadCode => "dead code",
            CheckKind::CommonErrors => "common errors",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

/// Run one of a repository's wrapper scripts and return its stdout.
///
/// A non-zero exit status is not an error: the wrapped tools exit non-zero
/// when checks fail, and the report on stdout is still the result we want.
/// Only a failure to spawn the script at all is reported as an error.
pub fn run_script(clone_dir: &Path, script: &str) -> Result<String> {
    if !clone_dir.join(script).exists() {
        // no wrapper script means the tool is not set up for this repo
        return Ok(String::new());
    }

    let output = Command::new("sh")
        .arg(script)
        .current_dir(clone_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| DashboardError::ToolSpawnFailed(format!("{script}: {e}")))?;

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run one pass/fail check script inside a repository clone.
pub fn run_check(clone_dir: &Path, kind: CheckKind) -> Result<String> {
    run_script(clone_dir, kind.script())
}

// ---------------------------------------------------------------------------
// CheckReport
// ---------------------------------------------------------------------------

/// Normalized outcome of one check over one repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Source file → passed?
    pub files: BTreeMap<String, bool>,
    pub passed: u32,
    pub failed: u32,
}

impl CheckReport {
    pub fn total(&self) -> u32 {
        self.passed + self.failed
    }

    /// Percentage of passing files rounded to nearest, 0 when nothing was
    /// checked.
    pub fn percent_passed(&self) -> u32 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        (100 * self.passed + total / 2) / total
    }

    /// An empty report means the tool is not set up for the repository,
    /// which is reported differently from "everything passed".
    pub fn configured(&self) -> bool {
        !self.files.is_empty()
    }
}

/// File suffixes that can start a per-file section of a report.
const SOURCE_SUFFIXES: &[&str] = &[".py", ".rs", ".go", ".js", ".ts"];

/// Parse a wrapper-script report.
///
/// Stateful scan: a line ending in a source-file suffix names the current
/// file; a later line ending in `Pass` or `Fail` records that file's
/// outcome. A file mentioned twice keeps the last outcome.
pub fn parse_report(report: &str) -> CheckReport {
    let mut files: BTreeMap<String, bool> = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in report.lines() {
        let line = line.trim_end();
        if SOURCE_SUFFIXES.iter().any(|suffix| line.ends_with(suffix)) {
            current = Some(line.trim().to_string());
        } else if line.ends_with("Pass") {
            if let Some(source) = &current {
                files.insert(source.clone(), true);
            }
        } else if line.ends_with("Fail") {
            if let Some(source) = &current {
                files.insert(source.clone(), false);
            }
        }
    }

    let passed = files.values().filter(|ok| **ok).count() as u32;
    let failed = files.len() as u32 - passed;
    CheckReport { files, passed, failed }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_basic_report() {
        let report = "\
src/server.py
    checking style
    Pass
src/worker.py
    E501 line too long
    Fail
src/utils.py
    Pass
";
        let parsed = parse_report(report);
        assert_eq!(parsed.total(), 3);
        assert_eq!(parsed.passed, 2);
        assert_eq!(parsed.failed, 1);
        assert_eq!(parsed.files["src/worker.py"], false);
        assert_eq!(parsed.percent_passed(), 67);
        assert!(parsed.configured());
    }

    #[test]
    fn empty_report_is_unconfigured() {
        let parsed = parse_report("");
        assert!(!parsed.configured());
        assert_eq!(parsed.total(), 0);
        assert_eq!(parsed.percent_passed(), 0);
    }

    #[test]
    fn outcome_without_file_is_ignored() {
        let parsed = parse_report("    Pass\n    Fail\n");
        assert_eq!(parsed.total(), 0);
    }

    #[test]
    fn duplicate_file_keeps_last_outcome() {
        let report = "src/a.py\n    Pass\nsrc/a.py\n    Fail\n";
        let parsed = parse_report(report);
        assert_eq!(parsed.total(), 1);
        assert_eq!(parsed.files["src/a.py"], false);
    }

    #[test]
    fn percent_rounds_to_nearest() {
        // 2 of 3 is 66.67%, displayed as 67
        let mut report = CheckReport::default();
        report.passed = 2;
        report.failed = 1;
        assert_eq!(report.percent_passed(), 67);

        // 1 of 8 is 12.5%, half rounds up
        report.passed = 1;
        report.failed = 7;
        assert_eq!(report.percent_passed(), 13);

        report.passed = 1;
        report.failed = 2;
        assert_eq!(report.percent_passed(), 33);
    }

    #[test]
    fn all_passing_report() {
        let report = "src/a.py\n    Pass\nsrc/b.py\n    Pass\n";
        let parsed = parse_report(report);
        assert_eq!(parsed.percent_passed(), 100);
        assert_eq!(parsed.failed, 0);
    }

    #[test]
    fn run_check_without_script_is_empty() {
        let dir = TempDir::new().unwrap();
        let out = run_check(dir.path(), CheckKind::Lint).unwrap();
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn run_check_captures_stdout() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("run-linter.sh"),
            "echo 'src/a.py'\necho '    Pass'\n",
        )
        .unwrap();
        let out = run_check(dir.path(), CheckKind::Lint).unwrap();
        let parsed = parse_report(&out);
        assert_eq!(parsed.passed, 1);
    }

    #[cfg(unix)]
    #[test]
    fn run_check_tolerates_failing_script() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("detect-dead-code.sh"),
            "echo 'src/a.py'\necho '    Fail'\nexit 1\n",
        )
        .unwrap();
        let out = run_check(dir.path(), CheckKind::DeadCode).unwrap();
        let parsed = parse_report(&out);
        assert_eq!(parsed.failed, 1);
    }

    #[test]
    fn script_names() {
        assert_eq!(CheckKind::Lint.script(), "run-linter.sh");
        assert_eq!(CheckKind::DocStyle.script(), "check-docstyle.sh");
        assert_eq!(CheckKind::DeadCode.script(), "detect-dead-code.sh");
        assert_eq!(CheckKind::CommonErrors.script(), "detect-common-errors.sh");
    }
}
