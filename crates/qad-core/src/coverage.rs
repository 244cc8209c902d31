//! Unit-test coverage normalization.
//!
//! Coverage arrives as the plain-text summary coverage.py prints, archived
//! by the repository's CI test job. Only the `TOTAL` line matters:
//!
//! ```text
//! TOTAL    1234    56    95%
//! ```

use crate::config::CiConfig;
use crate::jenkins::JenkinsClient;
use crate::types::JobType;

/// Extract the total coverage percentage from a coverage.py text report.
///
/// Returns `None` when there is no parsable `TOTAL` line — the repository
/// has no unit-test coverage set up, which the verdict reports separately
/// from low coverage. A branch-coverage column before the percentage is
/// tolerated.
pub fn parse_total_coverage(report: &str) -> Option<u32> {
    for line in report.lines() {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("TOTAL") {
            continue;
        }
        let percent = fields.last()?;
        let percent = percent.strip_suffix('%')?;
        return percent.parse::<u32>().ok().filter(|p| *p <= 100);
    }
    None
}

pub fn coverage_ok(coverage: Option<u32>, threshold: u32) -> bool {
    match coverage {
        Some(percent) => percent >= threshold,
        None => false,
    }
}

/// Pull the coverage report archived by a repository's CI test job.
/// Any fetch failure normalizes to `None`: an unreachable artifact means
/// coverage was not measured, not that the dashboard run failed.
pub fn read_from_ci(jenkins: &JenkinsClient, cfg: &CiConfig, repo: &str) -> Option<u32> {
    let job = crate::ci::job_name(cfg, repo, JobType::Test);
    match jenkins.fetch_artifact(&job, "coverage.txt") {
        Ok(report) => parse_total_coverage(&report),
        Err(e) => {
            tracing::debug!(repo, error = %e, "no coverage artifact");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
