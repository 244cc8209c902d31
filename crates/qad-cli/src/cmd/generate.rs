use crate::output::print_json;
use anyhow::Context;
use qad_core::config::Config;
use qad_core::pipeline::{generate, GenerateOptions};
use qad_core::results::Sections;
use qad_core::{history, paths, render};
use std::path::Path;

pub struct GenerateArgs {
    pub no_ci_jobs: bool,
    pub no_code_quality: bool,
    pub no_liveness: bool,
    pub no_sla: bool,
    pub clone_repositories: bool,
    pub cleanup_repositories: bool,
    pub code_coverage_threshold: Option<u32>,
}

pub fn run(root: &Path, args: GenerateArgs, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;

    // CLI switches disable sections; avoid double negation further down
    let sections = Sections {
        ci_jobs: !args.no_ci_jobs,
        code_quality: !args.no_code_quality,
        liveness: !args.no_liveness,
        sla: !args.no_sla,
    };
    let opts = GenerateOptions {
        sections,
        clone: args.clone_repositories,
        cleanup: args.cleanup_repositories,
        coverage_threshold_override: args.code_coverage_threshold,
    };

    let data = generate(root, &cfg, &opts).context("dashboard generation failed")?;

    // History feeds the trend charts, so append before rendering.
    if sections.code_quality && sections.liveness {
        history::append(root, &data).context("failed to append history")?;
    }
    let rows = history::load(root).context("failed to load history")?;

    let html = render::render_dashboard(&data, &rows);
    render::write_output(root, &html).context("failed to write dashboard page")?;

    if json {
        print_json(&data)?;
    } else {
        println!("Dashboard written to {}", paths::dashboard_html(root).display());
        let failing = data.failing_repos();
        if failing.is_empty() {
            println!("All {} repositories pass their quality gate.", data.repos.len());
        } else {
            println!(
                "{} of {} repositories fail their quality gate: {}",
                failing.len(),
                data.repos.len(),
                failing.join(", ")
            );
        }
    }
    Ok(())
}
