use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("not initialized: run 'qad init'")]
    NotInitialized,

    #[error("repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("invalid repository name '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidRepoName(String),

    #[error("environment variable {0} has to be specified")]
    MissingEnvVar(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CI server returned an unusable response: {0}")]
    CiApi(String),

    #[error("malformed report {path}: {reason}")]
    MalformedReport { path: String, reason: String },

    #[error("git command failed: {0}")]
    GitFailed(String),

    #[error("failed to spawn tool: {0}")]
    ToolSpawnFailed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
