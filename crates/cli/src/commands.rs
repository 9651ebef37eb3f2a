use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use bookstore_simulation::{AppConfig, Report, Simulation, seed};

pub struct RunOutcome {
    pub report: Report,
    pub store_path: PathBuf,
}

/// `--config` wins over `BOOKSTORE_CONFIG`; env overrides apply either way.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let Some(path) = path else {
        return AppConfig::load().context("loading configuration");
    };
    let mut config = AppConfig::from_file(path)?;
    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Fresh store from seed data, `steps` ticks, report, save.
pub fn run(mut config: AppConfig, steps: Option<u64>, seed_override: Option<u64>) -> anyhow::Result<RunOutcome> {
    if let Some(seed) = seed_override {
        config.simulation.random_seed = seed;
    }
    let steps = steps.unwrap_or(config.simulation.max_steps);

    let store = seed::bootstrap(&config)?.with_reasoner(config.simulation.reasoner.build());
    let mut simulation = Simulation::new(config.simulation.clone(), store)?;
    simulation.run(steps);
    info!(steps, seed = config.simulation.random_seed, "run finished");

    let report = simulation.report();
    let store_path = simulation.persist().context("saving knowledge store")?;
    Ok(RunOutcome { report, store_path })
}

/// Report on the persisted store without advancing it.
pub fn report(config: AppConfig) -> anyhow::Result<Report> {
    let store = seed::open_store(&config)?;
    let mut simulation = Simulation::new(config.simulation, store)?;
    Ok(simulation.report())
}

pub fn print_report(report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.store.path = dir.join("store.json");
        config
    }

    #[test]
    fn run_persists_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = run(config_in(dir.path()), Some(12), Some(1)).unwrap();

        assert_eq!(outcome.report.steps_run, 12);
        assert!(!outcome.report.inventory.is_empty());
        assert!(outcome.store_path.exists());
    }

    #[test]
    fn report_reads_the_persisted_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let outcome = run(config.clone(), Some(20), None).unwrap();

        let later = report(config).unwrap();
        assert_eq!(later.steps_run, 0);
        assert_eq!(later.purchases, outcome.report.purchases);
    }

    #[test]
    fn explicit_config_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"simulation": {"max_steps": 7}}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.simulation.max_steps, 7);
    }
}
