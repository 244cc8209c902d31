use crate::output::{print_json, print_table};
use anyhow::Context;
use qad_core::config::Config;
use qad_core::liveness::SystemCheck;
use qad_core::types::Environment;
use std::collections::BTreeMap;
use std::path::Path;

fn flag(ok: bool) -> String {
    if ok { "ok".into() } else { "down".into() }
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load(root).context("failed to load config")?;

    let mut checks: BTreeMap<Environment, SystemCheck> = BTreeMap::new();
    for env in Environment::all() {
        if let Some(env_cfg) = cfg.environments.get(&env) {
            let check = SystemCheck::probe(env_cfg)
                .with_context(|| format!("failed to probe {env} environment"))?;
            checks.insert(env, check);
        }
    }

    if json {
        print_json(&checks)?;
    } else if checks.is_empty() {
        println!("No environments configured.");
    } else {
        let rows = checks
            .iter()
            .map(|(env, c)| {
                vec![
                    env.to_string(),
                    flag(c.api_available),
                    flag(c.jobs_api_available),
                    flag(c.api_token_valid),
                    flag(c.jobs_token_valid),
                ]
            })
            .collect();
        print_table(
            &["ENVIRONMENT", "API", "JOBS API", "API TOKEN", "JOBS TOKEN"],
            rows,
        );
    }

    if checks.values().any(|c| !c.all_ok()) {
        anyhow::bail!("one or more system checks failed");
    }
    Ok(())
}
