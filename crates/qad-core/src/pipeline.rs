//! End-to-end dashboard generation: collect, normalize, render inputs.

use crate::checks::{parse_report, run_check, CheckKind};
use crate::complexity::RankTally;
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::io;
use crate::jenkins::JenkinsClient;
use crate::liveness::SystemCheck;
use crate::paths::{self, ReportKind};
use crate::results::{DashboardData, RepoMetrics, Sections};
use crate::status::{evaluate, VerdictInput};
use crate::types::BuildStatus;
use std::collections::HashMap;
use std::path::Path;

/// Extension of the source files counted per repository clone.
const SOURCE_EXTENSION: &str = "py";

// ---------------------------------------------------------------------------
// GenerateOptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    pub sections: Sections,
    /// Clone or refresh repository working copies before checking them.
    pub clone: bool,
    /// Remove the clones after the run.
    pub cleanup: bool,
    /// CLI override for the configured coverage threshold.
    pub coverage_threshold_override: Option<u32>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            sections: Sections::default(),
            clone: false,
            cleanup: false,
            coverage_threshold_override: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full collection pipeline and return the normalized aggregate.
///
/// Order follows the dashboard's history: secrets first (fail fast), then
/// liveness probes, one CI status fetch shared by every repository, the
/// per-repository quality loop, and finally the perf statistics.
pub fn generate(root: &Path, cfg: &Config, opts: &GenerateOptions) -> Result<DashboardData> {
    let mut quality = cfg.quality.clone();
    if let Some(threshold) = opts.coverage_threshold_override {
        quality.coverage_threshold = threshold;
    }

    tracing::info!(project = %cfg.project.name, "generating dashboard");

    // Fail fast on missing secrets before any network or subprocess work.
    for env_cfg in cfg.environments.values() {
        env_cfg.resolve_token()?;
        env_cfg.resolve_jobs_token()?;
    }

    let mut data = DashboardData::new(&cfg.project.name, opts.sections);
    data.sprint = cfg.project.sprint.clone();
    data.sprint_plan_url = cfg.project.sprint_plan_url.clone();
    data.teams = cfg.project.teams.clone();
    data.issue_trackers = cfg.project.issue_trackers.clone();

    if opts.sections.liveness {
        for (env, env_cfg) in &cfg.environments {
            tracing::info!(environment = %env, "probing system");
            data.liveness.insert(*env, SystemCheck::probe(env_cfg)?);
        }
    }

    let jenkins = JenkinsClient::new(&cfg.ci.jenkins_url);
    let job_statuses = fetch_job_statuses(&jenkins, &opts.sections)?;

    if opts.sections.ci_jobs {
        if let Some(smoke_job) = &cfg.ci.smoke_job {
            match jenkins.build_outcomes(smoke_job) {
                Ok(tally) => {
                    tracing::info!(
                        total = tally.total,
                        succeeded = tally.succeeded,
                        "smoke test builds"
                    );
                    data.smoke = Some(tally);
                }
                Err(e) => tracing::warn!(job = %smoke_job, error = %e, "smoke tally unavailable"),
            }
        }
    }

    for repo_cfg in &cfg.repositories {
        let repo = repo_cfg.name.as_str();
        tracing::info!(repo, "collecting repository data");

        if opts.clone {
            crate::repos::clone_or_fetch(root, &cfg.ci, repo)?;
        }

        let mut metrics = RepoMetrics::default();

        if opts.sections.code_quality {
            collect_quality(root, repo, &mut metrics)?;
        }

        if opts.sections.ci_jobs {
            metrics.ci_jobs = crate::ci::ci_table_for_repo(&cfg.ci, repo, &job_statuses);
            metrics.coverage = crate::coverage::read_from_ci(&jenkins, &cfg.ci, repo);
        }

        if opts.sections.code_quality {
            metrics.verdict = evaluate(
                &VerdictInput {
                    source_files: metrics.source.files,
                    ignored_lint_files: repo_cfg.ignored_lint_files.len() as u32,
                    ignored_docstyle_files: repo_cfg.ignored_docstyle_files.len() as u32,
                    lint: &metrics.lint,
                    docstyle: &metrics.docstyle,
                    dead_code: &metrics.dead_code,
                    common_errors: &metrics.common_errors,
                    coverage: metrics.coverage,
                    cyclomatic: &metrics.cyclomatic,
                    maintainability: &metrics.maintainability,
                },
                &quality,
            );
        }

        if opts.cleanup {
            crate::repos::cleanup(root, repo)?;
        }

        data.repos.insert(repo.to_string(), metrics);
    }

    if opts.sections.sla {
        let measurements = crate::perf::load_measurements(&paths::perf_results_dir(root))?;
        data.perf = crate::perf::compute_statistics(&measurements, &cfg.sla);
    }

    tracing::info!(repos = data.repos.len(), "data prepared");
    Ok(data)
}

/// One CI status fetch shared by the liveness and CI-jobs sections; when
/// both are disabled there is nothing to ask the CI server for.
fn fetch_job_statuses(
    jenkins: &JenkinsClient,
    sections: &Sections,
) -> Result<HashMap<String, BuildStatus>> {
    if !sections.ci_jobs && !sections.liveness {
        return Ok(HashMap::new());
    }
    match jenkins.job_statuses() {
        Ok(statuses) => {
            tracing::info!(jobs = statuses.len(), "read CI job statuses");
            Ok(statuses)
        }
        // the CI server answered but the payload was unusable: the run
        // cannot tell a misconfigured server from real data, so abort
        Err(e @ DashboardError::CiApi(_)) => Err(e),
        Err(e) => {
            // a dead CI server leaves every job status unknown rather than
            // aborting the run
            tracing::warn!(error = %e, "CI job statuses unavailable");
            Ok(HashMap::new())
        }
    }
}

/// Run every quality check in the repository clone, persist the raw
/// reports, and normalize them into the metrics struct.
fn collect_quality(root: &Path, repo: &str, metrics: &mut RepoMetrics) -> Result<()> {
    let clone = paths::clone_dir(root, repo);
    if !clone.is_dir() {
        tracing::warn!(repo, "no repository clone; skipping quality checks");
        return Ok(());
    }

    metrics.source = crate::repos::source_stats(&clone, SOURCE_EXTENSION)?;

    for (kind, report_kind) in [
        (CheckKind::Lint, ReportKind::Lint),
        (CheckKind::DocStyle, ReportKind::DocStyle),
        (CheckKind::DeadCode, ReportKind::DeadCode),
        (CheckKind::CommonErrors, ReportKind::CommonErrors),
    ] {
        let output = run_check(&clone, kind)?;
        io::atomic_write(&paths::report_path(root, repo, report_kind), output.as_bytes())?;
        let report = parse_report(&output);
        match kind {
            CheckKind::Lint => metrics.lint = report,
            CheckKind::DocStyle => metrics.docstyle = report,
            CheckKind::DeadCode => metrics.dead_code = report,
            CheckKind::CommonErrors => metrics.common_errors = report,
        }
    }

    metrics.cyclomatic = collect_ranks(
        root,
        repo,
        &clone,
        CC_SCRIPT,
        ReportKind::CycloJson,
        RankTally::from_cc_json,
    )?;
    metrics.maintainability = collect_ranks(
        root,
        repo,
        &clone,
        MI_SCRIPT,
        ReportKind::MaintJson,
        RankTally::from_mi_json,
    )?;

    Ok(())
}

const CC_SCRIPT: &str = "measure-cyclomatic-complexity.sh";
const MI_SCRIPT: &str = "measure-maintainability-index.sh";

/// Run a repo's radon wrapper script and parse the JSON rank report it
/// prints. A repo without the wrapper can still drop a pre-built report
/// into the reports directory; absence of both means not measured.
fn collect_ranks(
    root: &Path,
    repo: &str,
    clone: &Path,
    script: &str,
    kind: ReportKind,
    parse: fn(&str, &str) -> Result<RankTally>,
) -> Result<RankTally> {
    let path = paths::report_path(root, repo, kind);

    let output = crate::checks::run_script(clone, script)?;
    if !output.trim().is_empty() {
        io::atomic_write(&path, output.as_bytes())?;
        return parse(&output, &path.display().to_string());
    }

    if !path.exists() {
        return Ok(RankTally::default());
    }
    let data = std::fs::read_to_string(&path)?;
    parse(&data, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, RepoConfig};
    use tempfile::TempDir;

    /// Config pointing at a mockito CI server, no environments (so no
    /// secrets are needed), one repository.
    fn test_config(ci_url: &str) -> Config {
        let mut cfg = Config::new("qa");
        cfg.ci.jenkins_url = ci_url.to_string();
        cfg.repositories.push(RepoConfig::new("worker"));
        cfg
    }

    fn write_clone(root: &Path) {
        let clone = paths::clone_dir(root, "worker");
        std::fs::create_dir_all(&clone).unwrap();
        std::fs::write(clone.join("a.py"), "x = 1\n").unwrap();
        std::fs::write(
            clone.join("run-linter.sh"),
            "echo 'a.py'\necho '    Pass'\n",
        )
        .unwrap();
        std::fs::write(
            clone.join("check-docstyle.sh"),
            "echo 'a.py'\necho '    Pass'\n",
        )
        .unwrap();
        std::fs::write(
            clone.join("measure-cyclomatic-complexity.sh"),
            r#"echo '{"a.py": [{"rank": "A"}, {"rank": "B"}]}'"#,
        )
        .unwrap();
    }

    fn mock_ci(server: &mut mockito::Server) {
        server
            .mock("GET", "/api/json?tree=jobs[name,color]")
            .with_status(200)
            .with_body(r#"{"jobs":[{"name":"qa-worker-build-job","color":"blue"}]}"#)
            .create();
        server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/job/.*/lastSuccessfulBuild/artifact/coverage.txt$".into()),
            )
            .with_status(200)
            .with_body("TOTAL 10 1 92%\n")
            .create();
    }

    #[cfg(unix)]
    #[test]
    fn generate_collects_repo_metrics() {
        let dir = TempDir::new().unwrap();
        write_clone(dir.path());
        let mut server = mockito::Server::new();
        mock_ci(&mut server);

        let cfg = test_config(&server.url());
        let opts = GenerateOptions {
            sections: Sections {
                liveness: false,
                ci_jobs: true,
                code_quality: true,
                sla: true,
            },
            ..GenerateOptions::default()
        };

        let data = generate(dir.path(), &cfg, &opts).unwrap();
        let metrics = &data.repos["worker"];
        assert_eq!(metrics.source.files, 1);
        assert_eq!(metrics.lint.passed, 1);
        assert_eq!(metrics.coverage, Some(92));
        assert_eq!(
            metrics.ci_jobs[0].status,
            Some(crate::types::BuildStatus::Success)
        );
        assert_eq!(metrics.cyclomatic.total(), 2);
        assert_eq!(metrics.cyclomatic.worst_rank(), Some('B'));
        // dead code / common errors scripts missing → remarks, still ok
        assert!(metrics.verdict.ok);

        // raw reports persisted
        assert!(paths::report_path(dir.path(), "worker", ReportKind::Lint).exists());
        assert!(paths::report_path(dir.path(), "worker", ReportKind::CycloJson).exists());
    }

    #[cfg(unix)]
    #[test]
    fn coverage_threshold_override_applies() {
        let dir = TempDir::new().unwrap();
        write_clone(dir.path());
        let mut server = mockito::Server::new();
        mock_ci(&mut server);

        let cfg = test_config(&server.url());
        let opts = GenerateOptions {
            sections: Sections {
                liveness: false,
                ci_jobs: true,
                code_quality: true,
                sla: false,
            },
            coverage_threshold_override: Some(95),
            ..GenerateOptions::default()
        };

        let data = generate(dir.path(), &cfg, &opts).unwrap();
        let metrics = &data.repos["worker"];
        assert_eq!(metrics.coverage, Some(92));
        assert!(!metrics.verdict.ok);
        assert!(metrics.verdict.remarks.contains(
            &crate::status::Remark::CoverageBelowThreshold {
                actual: 92,
                threshold: 95
            }
        ));
    }

    #[test]
    fn dead_ci_server_does_not_abort() {
        let dir = TempDir::new().unwrap();
        let mut cfg = test_config("http://127.0.0.1:1");
        cfg.repositories.clear();

        let opts = GenerateOptions {
            sections: Sections {
                liveness: false,
                ci_jobs: true,
                code_quality: false,
                sla: false,
            },
            ..GenerateOptions::default()
        };
        let data = generate(dir.path(), &cfg, &opts).unwrap();
        assert!(data.repos.is_empty());
    }

    #[test]
    fn unusable_ci_payload_aborts() {
        let dir = TempDir::new().unwrap();
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/api/json?tree=jobs[name,color]")
            .with_status(200)
            .with_body("<html>login required</html>")
            .create();

        let mut cfg = test_config(&server.url());
        cfg.repositories.clear();
        let opts = GenerateOptions {
            sections: Sections {
                liveness: false,
                ci_jobs: true,
                code_quality: false,
                sla: false,
            },
            ..GenerateOptions::default()
        };

        let err = generate(dir.path(), &cfg, &opts).unwrap_err();
        assert!(matches!(err, DashboardError::CiApi(_)));
    }

    #[test]
    fn missing_secret_fails_fast() {
        let dir = TempDir::new().unwrap();
        let mut cfg = test_config("http://127.0.0.1:1");
        cfg.environments.insert(
            crate::types::Environment::Stage,
            crate::config::EnvironmentConfig {
                api_url: "http://127.0.0.1:1".to_string(),
                jobs_api_url: "http://127.0.0.1:1".to_string(),
                token_env: "QAD_PIPELINE_TEST_MISSING_TOKEN".to_string(),
                jobs_token_env: "QAD_PIPELINE_TEST_MISSING_JOBS_TOKEN".to_string(),
            },
        );

        let err = generate(dir.path(), &cfg, &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, crate::error::DashboardError::MissingEnvVar(_)));
    }

    #[test]
    fn missing_clone_yields_empty_quality_metrics() {
        let dir = TempDir::new().unwrap();
        let cfg = test_config("http://127.0.0.1:1");
        let opts = GenerateOptions {
            sections: Sections {
                liveness: false,
                ci_jobs: false,
                code_quality: true,
                sla: false,
            },
            ..GenerateOptions::default()
        };

        let data = generate(dir.path(), &cfg, &opts).unwrap();
        let metrics = &data.repos["worker"];
        assert_eq!(metrics.source.files, 0);
        assert!(!metrics.lint.configured());
        // nothing measured → verdict cannot be ok
        assert!(!metrics.verdict.ok);
    }
}
