use crate::config::CiConfig;
use crate::types::{BuildStatus, JobType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Job naming
// ---------------------------------------------------------------------------

/// CI job name for a repository and job family: `{prefix}-{repo}-{suffix}`.
pub fn job_name(cfg: &CiConfig, repo: &str, job_type: JobType) -> String {
    format!("{}-{}-{}", cfg.job_prefix, repo, job_type.suffix())
}

pub fn job_url(cfg: &CiConfig, repo: &str, job_type: JobType) -> String {
    format!(
        "{}/job/{}",
        cfg.jenkins_url.trim_end_matches('/'),
        job_name(cfg, repo, job_type)
    )
}

/// URL of the status badge image served by the CI server for a job.
pub fn badge_url(cfg: &CiConfig, repo: &str, job_type: JobType) -> String {
    format!("{}/badge/icon", job_url(cfg, repo, job_type))
}

// ---------------------------------------------------------------------------
// CiJobEntry
// ---------------------------------------------------------------------------

/// One row of a repository's CI table: a job family joined against the
/// status map fetched from the CI server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiJobEntry {
    pub job_type: JobType,
    pub name: String,
    pub url: String,
    pub badge_url: String,
    /// `None` when the job is not configured on the CI server.
    pub status: Option<BuildStatus>,
}

/// Build the CI table for one repository from the fetched status map.
pub fn ci_table_for_repo(
    cfg: &CiConfig,
    repo: &str,
    statuses: &HashMap<String, BuildStatus>,
) -> Vec<CiJobEntry> {
    JobType::all()
        .into_iter()
        .map(|job_type| {
            let name = job_name(cfg, repo, job_type);
            let status = statuses.get(&name).copied();
            CiJobEntry {
                url: job_url(cfg, repo, job_type),
                badge_url: badge_url(cfg, repo, job_type),
                name,
                job_type,
                status,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ci_cfg() -> CiConfig {
        CiConfig {
            jenkins_url: "https://ci.example.com".to_string(),
            job_prefix: "qa".to_string(),
            smoke_job: None,
            git_base_url: "https://github.com/example".to_string(),
        }
    }

    #[test]
    fn job_name_scheme() {
        let cfg = ci_cfg();
        assert_eq!(job_name(&cfg, "worker", JobType::Test), "qa-worker-test-job");
        assert_eq!(
            job_name(&cfg, "worker", JobType::DocStyle),
            "qa-worker-docstyle-job"
        );
    }

    #[test]
    fn job_and_badge_urls() {
        let cfg = ci_cfg();
        assert_eq!(
            job_url(&cfg, "worker", JobType::Build),
            "https://ci.example.com/job/qa-worker-build-job"
        );
        assert_eq!(
            badge_url(&cfg, "worker", JobType::Build),
            "https://ci.example.com/job/qa-worker-build-job/badge/icon"
        );
    }

    #[test]
    fn table_joins_statuses() {
        let cfg = ci_cfg();
        let mut statuses = HashMap::new();
        statuses.insert("qa-worker-build-job".to_string(), BuildStatus::Success);
        statuses.insert("qa-worker-test-job".to_string(), BuildStatus::Failure);

        let table = ci_table_for_repo(&cfg, "worker", &statuses);
        assert_eq!(table.len(), 4);
        let by_type: HashMap<JobType, &CiJobEntry> =
            table.iter().map(|e| (e.job_type, e)).collect();
        assert_eq!(by_type[&JobType::Build].status, Some(BuildStatus::Success));
        assert_eq!(by_type[&JobType::Test].status, Some(BuildStatus::Failure));
        // lint/docstyle jobs not on the CI server
        assert_eq!(by_type[&JobType::Lint].status, None);
        assert_eq!(by_type[&JobType::DocStyle].status, None);
    }
}
