//! Endpoint and token probes for the tested system.
//!
//! A dead endpoint or a rejected token is dashboard *data*, not a pipeline
//! failure: the liveness table must render even when production is down, so
//! every probe normalizes transport errors into `false`.

use crate::config::EnvironmentConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// ApiProbe
// ---------------------------------------------------------------------------

pub struct ApiProbe {
    base_url: String,
    token: String,
    client: reqwest::blocking::Client,
}

impl ApiProbe {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            client: reqwest::blocking::Client::builder()
                .timeout(PROBE_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Whether the service answers its readiness endpoint at all.
    pub fn is_running(&self) -> bool {
        let url = format!("{}/readiness", self.base_url);
        match self.client.get(&url).send() {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Whether the configured token is accepted by an authorized endpoint.
    /// A dead endpoint also reports `false` here.
    pub fn token_valid(&self) -> bool {
        let url = format!("{}/system/version", self.base_url);
        match self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
        {
            Ok(response) => {
                let status = response.status();
                !(status == reqwest::StatusCode::UNAUTHORIZED
                    || status == reqwest::StatusCode::FORBIDDEN)
                    && status.is_success()
            }
            Err(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// SystemCheck
// ---------------------------------------------------------------------------

/// Liveness/readiness flags for one environment's API pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCheck {
    pub api_available: bool,
    pub jobs_api_available: bool,
    pub api_token_valid: bool,
    pub jobs_token_valid: bool,
}

impl SystemCheck {
    /// Probe both APIs of an environment. Secrets come from the process
    /// environment; a missing variable is the only error this returns.
    pub fn probe(env: &EnvironmentConfig) -> Result<SystemCheck> {
        let api = ApiProbe::new(&env.api_url, env.resolve_token()?);
        let jobs = ApiProbe::new(&env.jobs_api_url, env.resolve_jobs_token()?);
        Ok(SystemCheck {
            api_available: api.is_running(),
            jobs_api_available: jobs.is_running(),
            api_token_valid: api.token_valid(),
            jobs_token_valid: jobs.token_valid(),
        })
    }

    pub fn all_ok(&self) -> bool {
        self.api_available
            && self.jobs_api_available
            && self.api_token_valid
            && self.jobs_token_valid
    }

    /// The eight history-CSV bits start with this environment's four flags.
    pub fn as_bits(&self) -> [u8; 4] {
        [
            self.api_available as u8,
            self.jobs_api_available as u8,
            self.api_token_valid as u8,
            self.jobs_token_valid as u8,
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
