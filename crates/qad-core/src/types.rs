use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// A deployment of the tested system that the liveness table reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Stage,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Stage => "stage",
            Environment::Production => "production",
        }
    }

    pub fn all() -> [Environment; 2] {
        [Environment::Stage, Environment::Production]
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// JobType
// ---------------------------------------------------------------------------

/// The CI job families tracked per repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Build,
    Test,
    Lint,
    DocStyle,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Build => "build",
            JobType::Test => "test",
            JobType::Lint => "lint",
            JobType::DocStyle => "docstyle",
        }
    }

    /// Suffix used when deriving the CI job name for a repository.
    pub fn suffix(&self) -> &'static str {
        match self {
            JobType::Build => "build-job",
            JobType::Test => "test-job",
            JobType::Lint => "lint-job",
            JobType::DocStyle => "docstyle-job",
        }
    }

    pub fn all() -> [JobType; 4] {
        [JobType::Build, JobType::Test, JobType::Lint, JobType::DocStyle]
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// BuildStatus
// ---------------------------------------------------------------------------

/// Normalized CI job status.
///
/// Jenkins reports job state as a ball "color"; an `_anime` suffix means the
/// job is currently running, in which case the color names the *previous*
/// outcome. Running jobs are normalized to `InProgress` regardless of that
/// prior outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    Success,
    Unstable,
    Failure,
    Disabled,
    Aborted,
    NotBuilt,
    InProgress,
    Unknown,
}

impl BuildStatus {
    /// Map a Jenkins color string to a normalized status.
    pub fn from_color(color: &str) -> BuildStatus {
        if color.ends_with("_anime") {
            return BuildStatus::InProgress;
        }
        match color {
            "blue" | "green" => BuildStatus::Success,
            "yellow" => BuildStatus::Unstable,
            "red" => BuildStatus::Failure,
            "disabled" => BuildStatus::Disabled,
            "aborted" => BuildStatus::Aborted,
            "notbuilt" | "nobuilt" => BuildStatus::NotBuilt,
            _ => BuildStatus::Unknown,
        }
    }

    /// Whether the job is in a state that should count as healthy.
    pub fn is_ok(&self) -> bool {
        matches!(self, BuildStatus::Success | BuildStatus::InProgress)
    }

    /// CSS class used by the renderer for the status badge.
    pub fn badge_class(&self) -> &'static str {
        match self {
            BuildStatus::Success => "badge-success",
            BuildStatus::Unstable => "badge-warning",
            BuildStatus::Failure => "badge-danger",
            BuildStatus::InProgress => "badge-info",
            BuildStatus::Disabled | BuildStatus::Aborted | BuildStatus::NotBuilt => {
                "badge-secondary"
            }
            BuildStatus::Unknown => "badge-light",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Success => "success",
            BuildStatus::Unstable => "unstable",
            BuildStatus::Failure => "failure",
            BuildStatus::Disabled => "disabled",
            BuildStatus::Aborted => "aborted",
            BuildStatus::NotBuilt => "not built",
            BuildStatus::InProgress => "in progress",
            BuildStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
