use anyhow::Context;
use qad_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let project_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());

    println!("Initializing QA dashboard in: {}", root.display());

    let dirs = [
        paths::QAD_DIR,
        paths::REPORTS_DIR,
        paths::CLONES_DIR,
        paths::PERF_RESULTS_DIR,
        paths::OUTPUT_DIR,
    ];
    for dir in dirs {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let config_path = paths::config_path(root);
    if config_path.exists() {
        anyhow::bail!("already initialized: {} exists", config_path.display());
    }
    let cfg = Config::new(&project_name);
    cfg.save(root).context("failed to write config.yaml")?;
    println!("  created: {}", paths::CONFIG_FILE);
    println!("\nAdd repositories and CI settings to {} and run 'qad generate'.", paths::CONFIG_FILE);
    Ok(())
}
