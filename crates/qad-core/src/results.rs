//! The normalized aggregate the renderer consumes.

use crate::checks::CheckReport;
use crate::ci::CiJobEntry;
use crate::complexity::RankTally;
use crate::jenkins::BuildTally;
use crate::liveness::SystemCheck;
use crate::perf::PerfStatistic;
use crate::repos::SourceStats;
use crate::status::RepoVerdict;
use crate::types::Environment;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Which dashboard sections a run produces. Each maps to one of the
/// CLI's `--no-*` switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    pub liveness: bool,
    pub ci_jobs: bool,
    pub code_quality: bool,
    pub sla: bool,
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            liveness: true,
            ci_jobs: true,
            code_quality: true,
            sla: true,
        }
    }
}

// ---------------------------------------------------------------------------
// RepoMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoMetrics {
    pub source: SourceStats,
    pub lint: CheckReport,
    pub docstyle: CheckReport,
    pub dead_code: CheckReport,
    pub common_errors: CheckReport,
    pub cyclomatic: RankTally,
    pub maintainability: RankTally,
    pub coverage: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ci_jobs: Vec<CiJobEntry>,
    pub verdict: RepoVerdict,
}

// ---------------------------------------------------------------------------
// DashboardData
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_plan_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub issue_trackers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub liveness: BTreeMap<Environment, SystemCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoke: Option<BuildTally>,
    pub repos: BTreeMap<String, RepoMetrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub perf: Vec<PerfStatistic>,
    pub sections: Sections,
}

impl DashboardData {
    pub fn new(project: impl Into<String>, sections: Sections) -> Self {
        Self {
            generated_at: chrono::Utc::now(),
            project: project.into(),
            sprint: None,
            sprint_plan_url: None,
            teams: Vec::new(),
            issue_trackers: HashMap::new(),
            liveness: BTreeMap::new(),
            smoke: None,
            repos: BTreeMap::new(),
            perf: Vec::new(),
            sections,
        }
    }

    /// Repositories that currently fail their overall quality gate.
    pub fn failing_repos(&self) -> Vec<&str> {
        self.repos
            .iter()
            .filter(|(_, m)| !m.verdict.ok)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_default_all_enabled() {
        let sections = Sections::default();
        assert!(sections.liveness && sections.ci_jobs && sections.code_quality && sections.sla);
    }

    #[test]
    fn json_roundtrip() {
        let mut data = DashboardData::new("qa", Sections::default());
        data.repos.insert("worker".to_string(), RepoMetrics::default());
        let json = serde_json::to_string(&data).unwrap();
        let parsed: DashboardData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.project, "qa");
        assert!(parsed.repos.contains_key("worker"));
    }

    #[test]
    fn failing_repos_filters_on_verdict() {
        let mut data = DashboardData::new("qa", Sections::default());
        let ok = RepoMetrics {
            verdict: crate::status::RepoVerdict {
                ok: true,
                remarks: vec![],
            },
            ..RepoMetrics::default()
        };
        data.repos.insert("good".to_string(), ok);
        data.repos.insert("bad".to_string(), RepoMetrics::default());
        assert_eq!(data.failing_repos(), vec!["bad"]);
    }
}
