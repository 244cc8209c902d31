//! Jenkins JSON API collector.
//!
//! One client per dashboard run. All queries use the `tree=` filter so the
//! CI server only serializes the fields we consume:
//! - `api/json?tree=jobs[name,color]` — every job's name and ball color.
//! - `{job}/api/json?tree=builds[result]` — remembered build outcomes.
//! - `{job}/lastSuccessfulBuild/artifact/{path}` — archived report files.

use crate::error::{DashboardError, Result};
use crate::types::BuildStatus;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JobsPayload {
    #[serde(default)]
    jobs: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
struct JobEntry {
    name: String,
    /// Absent for folders and jobs that never ran.
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuildsPayload {
    #[serde(default)]
    builds: Vec<BuildEntry>,
}

#[derive(Debug, Deserialize)]
struct BuildEntry {
    /// `null` while the build is still running.
    result: Option<String>,
}

// ---------------------------------------------------------------------------
// BuildTally
// ---------------------------------------------------------------------------

/// Finished-build counts for one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BuildTally {
    pub total: u32,
    pub succeeded: u32,
}

impl BuildTally {
    pub fn success_rate(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (100 * self.succeeded) / self.total
    }
}

// ---------------------------------------------------------------------------
// JenkinsClient
// ---------------------------------------------------------------------------

pub struct JenkinsClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl JenkinsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::blocking::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DashboardError::Http {
                url: url.to_string(),
                source: e,
            })?;
        if !response.status().is_success() {
            return Err(DashboardError::CiApi(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }
        response.text().map_err(|e| DashboardError::Http {
            url: url.to_string(),
            source: e,
        })
    }

    /// Read the status of every job known to the CI server.
    ///
    /// Jobs without a color (folders, never-built jobs) are skipped.
    pub fn job_statuses(&self) -> Result<HashMap<String, BuildStatus>> {
        let url = format!("{}/api/json?tree=jobs[name,color]", self.base_url);
        let body = self.get_text(&url)?;
        let payload: JobsPayload = serde_json::from_str(&body)
            .map_err(|e| DashboardError::CiApi(format!("job status payload: {e}")))?;
        Ok(payload
            .jobs
            .into_iter()
            .filter_map(|job| {
                job.color
                    .map(|color| (job.name, BuildStatus::from_color(&color)))
            })
            .collect())
    }

    /// Count remembered builds of one job: finished builds and how many of
    /// them succeeded. Running builds (`result: null`) count as neither.
    pub fn build_outcomes(&self, job: &str) -> Result<BuildTally> {
        let url = format!("{}/job/{}/api/json?tree=builds[result]", self.base_url, job);
        let body = self.get_text(&url)?;
        let payload: BuildsPayload = serde_json::from_str(&body)
            .map_err(|e| DashboardError::CiApi(format!("build outcome payload: {e}")))?;
        let finished: Vec<&BuildEntry> = payload
            .builds
            .iter()
            .filter(|b| b.result.is_some())
            .collect();
        let succeeded = finished
            .iter()
            .filter(|b| b.result.as_deref() == Some("SUCCESS"))
            .count();
        Ok(BuildTally {
            total: finished.len() as u32,
            succeeded: succeeded as u32,
        })
    }

    /// Fetch a file archived by the last successful build of a job.
    pub fn fetch_artifact(&self, job: &str, path: &str) -> Result<String> {
        let url = format!(
            "{}/job/{}/lastSuccessfulBuild/artifact/{}",
            self.base_url, job, path
        );
        self.get_text(&url)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
