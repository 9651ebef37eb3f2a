//! Application configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration. Load order: defaults, then the JSON file named by
//! `BOOKSTORE_CONFIG`, then individual environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use bookstore_core::Money;
use bookstore_knowledge::{Reasoner, RuleReasoner, UnavailableReasoner};
use bookstore_policy::PolicyKind;

use crate::error::SimError;
use crate::seed::CustomerProfile;

pub const CONFIG_PATH_ENV: &str = "BOOKSTORE_CONFIG";
pub const SEED_ENV: &str = "BOOKSTORE_SEED";
pub const STORE_PATH_ENV: &str = "BOOKSTORE_STORE_PATH";
pub const SYNC_INTERVAL_ENV: &str = "BOOKSTORE_SYNC_INTERVAL";

/// How a customer's budget behaves across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetMode {
    /// Each purchase permanently reduces the budget.
    #[default]
    Depleting,
    /// The budget caps a single activation and never shrinks.
    PerVisit,
}

/// Which inference backend the knowledge store uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonerKind {
    #[default]
    Rules,
    /// Always fails; exercises the heuristic fallback.
    Unavailable,
}

impl ReasonerKind {
    pub fn build(self) -> Box<dyn Reasoner> {
        match self {
            ReasonerKind::Rules => Box::new(RuleReasoner::default()),
            ReasonerKind::Unavailable => Box::new(UnavailableReasoner::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub max_steps: u64,
    pub customer_spawn_chance: f64,
    /// `LowThreshold` used when seed data omits one.
    pub restock_threshold: u32,
    pub reasoner_sync_interval: u64,
    pub restock_amount: u32,
    pub random_seed: u64,
    pub customer_count: usize,
    pub employee_count: usize,
    pub customer_budget: f64,
    pub budget_mode: BudgetMode,
    pub customer_policy: PolicyKind,
    pub preferred_genre: Option<String>,
    pub reasoner: ReasonerKind,
    /// Explicit customer population; replaces the generated one when non-empty.
    pub customers: Vec<CustomerProfile>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            max_steps: 100,
            customer_spawn_chance: 0.4,
            restock_threshold: 5,
            reasoner_sync_interval: 3,
            restock_amount: 10,
            random_seed: 12345,
            customer_count: 2,
            employee_count: 1,
            customer_budget: 50.0,
            budget_mode: BudgetMode::Depleting,
            customer_policy: PolicyKind::Random,
            preferred_genre: None,
            reasoner: ReasonerKind::Rules,
            customers: Vec::new(),
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), SimError> {
        if self.max_steps < 1 {
            return Err(SimError::config("max_steps must be >= 1"));
        }
        if !(0.0..=1.0).contains(&self.customer_spawn_chance) {
            return Err(SimError::config("customer_spawn_chance must be within 0.0..=1.0"));
        }
        if self.reasoner_sync_interval < 1 {
            return Err(SimError::config("reasoner_sync_interval must be >= 1"));
        }
        if self.restock_amount < 1 {
            return Err(SimError::config("restock_amount must be >= 1"));
        }
        Money::from_major(self.customer_budget)
            .map_err(|e| SimError::config(format!("customer_budget: {e}")))?;
        for profile in &self.customers {
            if profile.id.trim().is_empty() {
                return Err(SimError::config("customer profile ids cannot be empty"));
            }
        }
        Ok(())
    }

    pub fn budget(&self) -> Money {
        Money::from_major(self.customer_budget).unwrap_or(Money::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub iri: String,
    pub path: PathBuf,
    /// Seed inventory file; the bundled sample is used when unset.
    pub seed_inventory: Option<PathBuf>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            iri: "http://example.org/bookstore".to_string(),
            path: PathBuf::from("data/bookstore_store.json"),
            seed_inventory: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub simulation: SimulationSettings,
    pub store: StoreSettings,
}

impl AppConfig {
    /// Defaults, then `BOOKSTORE_CONFIG`, then env overrides, then validation.
    pub fn load() -> Result<Self, SimError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SimError> {
        serde_json::from_str(text).map_err(|e| SimError::config(format!("invalid config: {e}")))
    }

    /// Apply `BOOKSTORE_*` overrides using `lookup` as the environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SimError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup(SEED_ENV) {
            self.simulation.random_seed = seed
                .trim()
                .parse()
                .map_err(|_| SimError::config(format!("{SEED_ENV} must be an unsigned integer")))?;
        }
        if let Some(interval) = lookup(SYNC_INTERVAL_ENV) {
            self.simulation.reasoner_sync_interval = interval
                .trim()
                .parse()
                .map_err(|_| SimError::config(format!("{SYNC_INTERVAL_ENV} must be an unsigned integer")))?;
        }
        if let Some(path) = lookup(STORE_PATH_ENV) {
            self.store.path = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.simulation.validate()?;
        if self.store.path.as_os_str().is_empty() {
            return Err(SimError::config("store.path cannot be empty"));
        }
        Ok(())
    }
}
