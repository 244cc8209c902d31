mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "qad",
    about = "QA dashboard generator — consolidate coverage, performance and CI status across repositories",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .qad/ or .git/)
    #[arg(long, global = true, env = "QAD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the dashboard workspace in the current project
    Init,

    /// Collect all signals and render the dashboard page
    Generate {
        /// Skip the per-repository CI jobs table
        #[arg(long)]
        no_ci_jobs: bool,

        /// Skip the code quality table
        #[arg(long)]
        no_code_quality: bool,

        /// Skip the service liveness table
        #[arg(long)]
        no_liveness: bool,

        /// Skip the performance/SLA table
        #[arg(long)]
        no_sla: bool,

        /// Clone or refresh repository working copies before checking
        #[arg(long)]
        clone_repositories: bool,

        /// Remove repository clones after the run
        #[arg(long)]
        cleanup_repositories: bool,

        /// Override the configured code coverage threshold (percent)
        #[arg(long, value_name = "PERCENT")]
        code_coverage_threshold: Option<u32>,
    },

    /// Probe configured environments without generating the dashboard
    Check,

    /// Inspect and validate the dashboard configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Generate { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root_path = cli.root.as_deref();
    let root = root::resolve_root(root_path);

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Generate {
            no_ci_jobs,
            no_code_quality,
            no_liveness,
            no_sla,
            clone_repositories,
            cleanup_repositories,
            code_coverage_threshold,
        } => cmd::generate::run(
            &root,
            cmd::generate::GenerateArgs {
                no_ci_jobs,
                no_code_quality,
                no_liveness,
                no_sla,
                clone_repositories,
                cleanup_repositories,
                code_coverage_threshold,
            },
            cli.json,
        ),
        Commands::Check => cmd::check::run(&root, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
