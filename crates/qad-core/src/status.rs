//! Per-repository verdict: the conjunction of every quality signal, plus
//! structured remarks explaining what to fix. The renderer turns remarks
//! into list items; nothing here emits markup.

use crate::checks::CheckReport;
use crate::complexity::RankTally;
use crate::config::QualityConfig;
use crate::coverage::coverage_ok;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Remark
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Remark {
    LinterNotConfigured,
    NotAllFilesLinted { checked: u32, ignored: u32, sources: u32 },
    LinterFailures { failed: u32 },
    IgnoredLintFiles { count: u32 },
    DocstyleNotConfigured,
    NotAllFilesDocChecked { checked: u32, ignored: u32, sources: u32 },
    DocstyleFailures { failed: u32 },
    IgnoredDocFiles { count: u32 },
    LinterDocstyleMismatch { lint_total: u32, doc_total: u32 },
    CoverageNotMeasured,
    CoverageBelowThreshold { actual: u32, threshold: u32 },
    HighComplexity,
    LowMaintainability,
    DeadCodeNotConfigured,
    DeadCodeFound { failed: u32 },
    CommonErrorsNotConfigured,
    CommonErrorsFound { failed: u32 },
}

impl std::fmt::Display for Remark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Remark::LinterNotConfigured => write!(f, "linter is not setup"),
            Remark::NotAllFilesLinted { .. } => {
                write!(f, "not all source files are checked by linter")
            }
            Remark::LinterFailures { .. } => write!(f, "linter failed"),
            Remark::IgnoredLintFiles { count } => {
                write!(f, "{count} file{} ignored by linter", plural(*count))
            }
            Remark::DocstyleNotConfigured => write!(f, "docstyle checker is not setup"),
            Remark::NotAllFilesDocChecked { .. } => {
                write!(f, "not all source files are checked by docstyle checker")
            }
            Remark::DocstyleFailures { .. } => write!(f, "docstyle check failed"),
            Remark::IgnoredDocFiles { count } => {
                write!(f, "{count} file{} ignored by docstyle checker", plural(*count))
            }
            Remark::LinterDocstyleMismatch { lint_total, doc_total } => write!(
                f,
                "linter checked {lint_total} files, but docstyle checker checked {doc_total} files"
            ),
            Remark::CoverageNotMeasured => write!(f, "unit tests have not been setup"),
            Remark::CoverageBelowThreshold { .. } => write!(f, "improve code coverage"),
            Remark::HighComplexity => write!(f, "reduce cyclomatic complexity"),
            Remark::LowMaintainability => write!(f, "improve maintainability index"),
            Remark::DeadCodeNotConfigured => write!(f, "setup dead code detection tool"),
            Remark::DeadCodeFound { .. } => write!(f, "remove dead code"),
            Remark::CommonErrorsNotConfigured => write!(f, "setup common errors detection tool"),
            Remark::CommonErrorsFound { .. } => write!(f, "fix common errors"),
        }
    }
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// ---------------------------------------------------------------------------
// VerdictInput / RepoVerdict
// ---------------------------------------------------------------------------

/// Everything the verdict is computed from, for one repository.
pub struct VerdictInput<'a> {
    pub source_files: u32,
    pub ignored_lint_files: u32,
    pub ignored_docstyle_files: u32,
    pub lint: &'a CheckReport,
    pub docstyle: &'a CheckReport,
    pub dead_code: &'a CheckReport,
    pub common_errors: &'a CheckReport,
    pub coverage: Option<u32>,
    pub cyclomatic: &'a RankTally,
    pub maintainability: &'a RankTally,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoVerdict {
    pub ok: bool,
    pub remarks: Vec<Remark>,
}

/// Reproduce the dashboard's overall gate: every source file linted and
/// doc-checked (net of configured ignores), zero failures from any checker,
/// coverage at or above threshold, and complexity/maintainability ranks
/// within bounds.
pub fn evaluate(input: &VerdictInput, quality: &QualityConfig) -> RepoVerdict {
    let mut remarks = Vec::new();

    let lint_covered = input.lint.total() + input.ignored_lint_files;
    let doc_covered = input.docstyle.total() + input.ignored_docstyle_files;

    if !input.lint.configured() {
        remarks.push(Remark::LinterNotConfigured);
    } else if lint_covered != input.source_files {
        remarks.push(Remark::NotAllFilesLinted {
            checked: input.lint.total(),
            ignored: input.ignored_lint_files,
            sources: input.source_files,
        });
    }

    if !input.docstyle.configured() {
        remarks.push(Remark::DocstyleNotConfigured);
    } else if doc_covered != input.source_files {
        remarks.push(Remark::NotAllFilesDocChecked {
            checked: input.docstyle.total(),
            ignored: input.ignored_docstyle_files,
            sources: input.source_files,
        });
    }

    if input.lint.configured() && input.docstyle.configured() && lint_covered != doc_covered {
        remarks.push(Remark::LinterDocstyleMismatch {
            lint_total: input.lint.total(),
            doc_total: input.docstyle.total(),
        });
    }

    if input.lint.failed != 0 {
        remarks.push(Remark::LinterFailures {
            failed: input.lint.failed,
        });
    }
    if input.docstyle.failed != 0 {
        remarks.push(Remark::DocstyleFailures {
            failed: input.docstyle.failed,
        });
    }
    if input.ignored_lint_files != 0 {
        remarks.push(Remark::IgnoredLintFiles {
            count: input.ignored_lint_files,
        });
    }
    if input.ignored_docstyle_files != 0 {
        remarks.push(Remark::IgnoredDocFiles {
            count: input.ignored_docstyle_files,
        });
    }

    match input.coverage {
        None => remarks.push(Remark::CoverageNotMeasured),
        Some(actual) if actual < quality.coverage_threshold => {
            remarks.push(Remark::CoverageBelowThreshold {
                actual,
                threshold: quality.coverage_threshold,
            });
        }
        Some(_) => {}
    }

    if !input.cyclomatic.ok_within(quality.max_cc_rank) {
        remarks.push(Remark::HighComplexity);
    }
    if !input.maintainability.ok_within(quality.max_mi_rank) {
        remarks.push(Remark::LowMaintainability);
    }

    if !input.dead_code.configured() {
        remarks.push(Remark::DeadCodeNotConfigured);
    } else if input.dead_code.failed != 0 {
        remarks.push(Remark::DeadCodeFound {
            failed: input.dead_code.failed,
        });
    }

    if !input.common_errors.configured() {
        remarks.push(Remark::CommonErrorsNotConfigured);
    } else if input.common_errors.failed != 0 {
        remarks.push(Remark::CommonErrorsFound {
            failed: input.common_errors.failed,
        });
    }

    let ok = lint_covered == input.source_files
        && doc_covered == input.source_files
        && input.lint.failed == 0
        && input.docstyle.failed == 0
        && coverage_ok(input.coverage, quality.coverage_threshold)
        && input.cyclomatic.ok_within(quality.max_cc_rank)
        && input.maintainability.ok_within(quality.max_mi_rank)
        && input.dead_code.failed == 0
        && input.common_errors.failed == 0;

    RepoVerdict { ok, remarks }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn passing_report(files: u32) -> CheckReport {
        let map: BTreeMap<String, bool> =
            (0..files).map(|i| (format!("src/f{i}.py"), true)).collect();
        CheckReport {
            passed: files,
            failed: 0,
            files: map,
        }
    }

    fn failing_report(passed: u32, failed: u32) -> CheckReport {
        let mut map = BTreeMap::new();
        for i in 0..passed {
            map.insert(format!("src/ok{i}.py"), true);
        }
        for i in 0..failed {
            map.insert(format!("src/bad{i}.py"), false);
        }
        CheckReport { passed, failed, files: map }
    }

    fn clean_input<'a>(
        lint: &'a CheckReport,
        docstyle: &'a CheckReport,
        dead_code: &'a CheckReport,
        common_errors: &'a CheckReport,
        tallies: &'a RankTally,
    ) -> VerdictInput<'a> {
        VerdictInput {
            source_files: lint.total(),
            ignored_lint_files: 0,
            ignored_docstyle_files: 0,
            lint,
            docstyle,
            dead_code,
            common_errors,
            coverage: Some(95),
            cyclomatic: tallies,
            maintainability: tallies,
        }
    }

    #[test]
    fn clean_repo_is_ok() {
        let report = passing_report(3);
        let mut tally = RankTally::default();
        tally.counts[0] = 3; // all rank A
        let input = clean_input(&report, &report, &report, &report, &tally);

        let verdict = evaluate(&input, &QualityConfig::default());
        assert!(verdict.ok);
        assert!(verdict.remarks.is_empty());
    }

    #[test]
    fn lint_failures_block_and_remark() {
        let lint = failing_report(2, 1);
        let other = passing_report(3);
        let tally = RankTally::default();
        let input = clean_input(&lint, &other, &other, &other, &tally);

        let verdict = evaluate(&input, &QualityConfig::default());
        assert!(!verdict.ok);
        assert!(verdict.remarks.contains(&Remark::LinterFailures { failed: 1 }));
    }

    #[test]
    fn unconfigured_tools_remark_but_not_as_failures() {
        let report = passing_report(2);
        let empty = CheckReport::default();
        let tally = RankTally::default();
        let mut input = clean_input(&report, &report, &empty, &empty, &tally);
        input.source_files = 2;

        let verdict = evaluate(&input, &QualityConfig::default());
        // dead code / common errors have zero failures, so they don't block
        assert!(verdict.ok);
        assert!(verdict.remarks.contains(&Remark::DeadCodeNotConfigured));
        assert!(verdict.remarks.contains(&Remark::CommonErrorsNotConfigured));
    }

    #[test]
    fn uncovered_sources_block() {
        let lint = passing_report(2);
        let other = passing_report(3);
        let tally = RankTally::default();
        let input = VerdictInput {
            source_files: 3,
            ignored_lint_files: 0,
            ignored_docstyle_files: 0,
            lint: &lint,
            docstyle: &other,
            dead_code: &other,
            common_errors: &other,
            coverage: Some(95),
            cyclomatic: &tally,
            maintainability: &tally,
        };

        let verdict = evaluate(&input, &QualityConfig::default());
        assert!(!verdict.ok);
        assert!(verdict.remarks.iter().any(|r| matches!(
            r,
            Remark::NotAllFilesLinted { checked: 2, sources: 3, .. }
        )));
        assert!(verdict
            .remarks
            .iter()
            .any(|r| matches!(r, Remark::LinterDocstyleMismatch { .. })));
    }

    #[test]
    fn ignored_files_count_toward_coverage_of_sources() {
        let lint = passing_report(2);
        let doc = passing_report(3);
        let tally = RankTally::default();
        let input = VerdictInput {
            source_files: 3,
            ignored_lint_files: 1,
            ignored_docstyle_files: 0,
            lint: &lint,
            docstyle: &doc,
            dead_code: &doc,
            common_errors: &doc,
            coverage: Some(95),
            cyclomatic: &tally,
            maintainability: &tally,
        };

        let verdict = evaluate(&input, &QualityConfig::default());
        assert!(verdict.ok);
        assert!(verdict.remarks.contains(&Remark::IgnoredLintFiles { count: 1 }));
    }

    #[test]
    fn low_coverage_blocks() {
        let report = passing_report(1);
        let tally = RankTally::default();
        let mut input = clean_input(&report, &report, &report, &report, &tally);
        input.coverage = Some(42);

        let verdict = evaluate(&input, &QualityConfig::default());
        assert!(!verdict.ok);
        assert!(verdict.remarks.contains(&Remark::CoverageBelowThreshold {
            actual: 42,
            threshold: 90
        }));
    }

    #[test]
    fn missing_coverage_blocks_with_setup_remark() {
        let report = passing_report(1);
        let tally = RankTally::default();
        let mut input = clean_input(&report, &report, &report, &report, &tally);
        input.coverage = None;

        let verdict = evaluate(&input, &QualityConfig::default());
        assert!(!verdict.ok);
        assert!(verdict.remarks.contains(&Remark::CoverageNotMeasured));
    }

    #[test]
    fn bad_ranks_block() {
        let report = passing_report(1);
        let mut bad = RankTally::default();
        bad.counts[5] = 1; // one F block
        let good = RankTally::default();
        let input = VerdictInput {
            source_files: 1,
            ignored_lint_files: 0,
            ignored_docstyle_files: 0,
            lint: &report,
            docstyle: &report,
            dead_code: &report,
            common_errors: &report,
            coverage: Some(95),
            cyclomatic: &bad,
            maintainability: &good,
        };

        let verdict = evaluate(&input, &QualityConfig::default());
        assert!(!verdict.ok);
        assert!(verdict.remarks.contains(&Remark::HighComplexity));
        assert!(!verdict.remarks.contains(&Remark::LowMaintainability));
    }

    #[test]
    fn remark_messages() {
        assert_eq!(
            Remark::IgnoredLintFiles { count: 1 }.to_string(),
            "1 file ignored by linter"
        );
        assert_eq!(
            Remark::IgnoredLintFiles { count: 3 }.to_string(),
            "3 files ignored by linter"
        );
        assert_eq!(
            Remark::LinterDocstyleMismatch { lint_total: 5, doc_total: 7 }.to_string(),
            "linter checked 5 files, but docstyle checker checked 7 files"
        );
    }
}
