use crate::error::{DashboardError, Result};
use crate::paths;
use crate::types::Environment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// QualityConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Minimum acceptable unit-test coverage, in percent.
    #[serde(default = "default_coverage_threshold")]
    pub coverage_threshold: u32,
    /// Worst cyclomatic-complexity rank a block may have before the
    /// repository fails its quality gate.
    #[serde(default = "default_max_cc_rank")]
    pub max_cc_rank: char,
    /// Worst maintainability-index rank a module may have.
    #[serde(default = "default_max_mi_rank")]
    pub max_mi_rank: char,
}

fn default_coverage_threshold() -> u32 {
    90
}

fn default_max_cc_rank() -> char {
    'C'
}

fn default_max_mi_rank() -> char {
    'A'
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            coverage_threshold: default_coverage_threshold(),
            max_cc_rank: default_max_cc_rank(),
            max_mi_rank: default_max_mi_rank(),
        }
    }
}

// ---------------------------------------------------------------------------
// RepoConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    pub name: String,
    /// Files the linter is allowed to skip (counted when checking that
    /// every source file was linted).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_lint_files: Vec<String>,
    /// Files the docstyle checker is allowed to skip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_docstyle_files: Vec<String>,
}

impl RepoConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ignored_lint_files: Vec::new(),
            ignored_docstyle_files: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// CiConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiConfig {
    #[serde(default = "default_jenkins_url")]
    pub jenkins_url: String,
    /// Prefix of every tracked CI job name: `{prefix}-{repo}-{suffix}`.
    #[serde(default = "default_job_prefix")]
    pub job_prefix: String,
    /// Name of the production smoke-test job, if one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoke_job: Option<String>,
    /// Organization base URL the repositories are cloned from.
    #[serde(default = "default_git_base_url")]
    pub git_base_url: String,
}

fn default_jenkins_url() -> String {
    "https://ci.centos.org".to_string()
}

fn default_job_prefix() -> String {
    "qa".to_string()
}

fn default_git_base_url() -> String {
    "https://github.com".to_string()
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            jenkins_url: default_jenkins_url(),
            job_prefix: default_job_prefix(),
            smoke_job: None,
            git_base_url: default_git_base_url(),
        }
    }
}

// ---------------------------------------------------------------------------
// EnvironmentConfig
// ---------------------------------------------------------------------------

/// Endpoints and token sources for one tested deployment.
///
/// Tokens are referenced by environment-variable *name*; actual secret
/// values are resolved at pipeline start and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub api_url: String,
    pub jobs_api_url: String,
    pub token_env: String,
    pub jobs_token_env: String,
}

impl EnvironmentConfig {
    pub fn resolve_token(&self) -> Result<String> {
        std::env::var(&self.token_env)
            .map_err(|_| DashboardError::MissingEnvVar(self.token_env.clone()))
    }

    pub fn resolve_jobs_token(&self) -> Result<String> {
        std::env::var(&self.jobs_token_env)
            .map_err(|_| DashboardError::MissingEnvVar(self.jobs_token_env.clone()))
    }
}

// ---------------------------------------------------------------------------
// SlaThreshold
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaThreshold {
    pub label: String,
    pub max_mean_ms: f64,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprint_plan_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,
    /// Team name → issue-list URL shown in the dashboard header.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub issue_trackers: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub repositories: Vec<RepoConfig>,
    #[serde(default)]
    pub ci: CiConfig,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub environments: HashMap<Environment, EnvironmentConfig>,
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sla: Vec<SlaThreshold>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                sprint: None,
                sprint_plan_url: None,
                teams: Vec::new(),
                issue_trackers: HashMap::new(),
            },
            repositories: Vec::new(),
            ci: CiConfig::default(),
            environments: HashMap::new(),
            quality: QualityConfig::default(),
            sla: Vec::new(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(DashboardError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn repo(&self, name: &str) -> Result<&RepoConfig> {
        self.repositories
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| DashboardError::RepositoryNotFound(name.to_string()))
    }

    pub fn repo_names(&self) -> Vec<&str> {
        self.repositories.iter().map(|r| r.name.as_str()).collect()
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.repositories.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "no repositories configured; the dashboard will be empty".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for repo in &self.repositories {
            if crate::paths::validate_repo_name(&repo.name).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "invalid repository name '{}': must be lowercase alphanumeric with hyphens",
                        repo.name
                    ),
                });
            }
            if !seen.insert(repo.name.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("duplicate repository '{}'", repo.name),
                });
            }
        }

        if self.quality.coverage_threshold > 100 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "coverage_threshold={} is out of range (0-100)",
                    self.quality.coverage_threshold
                ),
            });
        }

        if !self.ci.jenkins_url.starts_with("http://")
            && !self.ci.jenkins_url.starts_with("https://")
        {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("jenkins_url '{}' is not an http(s) URL", self.ci.jenkins_url),
            });
        }

        for team in self.project.issue_trackers.keys() {
            if !self.project.teams.iter().any(|t| t == team) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("issue tracker configured for unknown team '{}'", team),
                });
            }
        }

        for threshold in &self.sla {
            if threshold.max_mean_ms <= 0.0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!(
                        "SLA threshold for '{}' must be positive, got {}",
                        threshold.label, threshold.max_mean_ms
                    ),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
