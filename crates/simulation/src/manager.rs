use std::path::Path;

use tracing::info;

use bookstore_inventory::InventoryRow;
use bookstore_knowledge::InMemoryKnowledgeStore;
use bookstore_purchasing::RestockRecord;
use bookstore_sales::PurchaseRecord;

use crate::config::AppConfig;
use crate::error::SimError;
use crate::report::{CustomerSummary, Report};
use crate::seed;
use crate::simulation::Simulation;

/// Service facade over one persisted simulation.
///
/// Not synchronised itself: front ends wrap it in a single mutex so that a
/// whole batch of ticks runs without interleaving.
pub struct SimulationManager {
    config: AppConfig,
    simulation: Simulation<InMemoryKnowledgeStore>,
}

impl SimulationManager {
    /// Open (or bootstrap) the configured store and start a run on it.
    pub fn new(config: AppConfig) -> Result<Self, SimError> {
        config.validate()?;
        let simulation = Self::start(&config)?;
        Ok(Self { config, simulation })
    }

    fn start(config: &AppConfig) -> Result<Simulation<InMemoryKnowledgeStore>, SimError> {
        let store = seed::open_store(config)?;
        Simulation::new(config.simulation.clone(), store)
    }

    /// Run `steps` ticks, then persist the store once.
    ///
    /// Inputs are validated before any tick runs; a rejected batch leaves
    /// the simulation untouched. Overrides stick for later batches.
    pub fn advance(&mut self, steps: i64, sync_interval: Option<i64>, seed: Option<u64>) -> Result<u64, SimError> {
        if steps <= 0 {
            return Err(SimError::validation("steps must be positive"));
        }
        let interval = match sync_interval {
            Some(value) if value < 1 => {
                return Err(SimError::validation("reasoner_sync_interval must be >= 1"));
            }
            Some(value) => Some(value as u64),
            None => None,
        };

        if let Some(interval) = interval {
            self.config.simulation.reasoner_sync_interval = interval;
            self.simulation.set_sync_interval(interval);
        }
        if let Some(seed) = seed {
            self.config.simulation.random_seed = seed;
            self.simulation.set_seed(seed);
        }

        let tick = self.simulation.run(steps as u64);
        let path = self.simulation.persist()?;
        info!(steps, tick, path = %path.display(), "advanced simulation");
        Ok(tick)
    }

    /// Rebuild the run from the last persisted store state.
    ///
    /// Queued messages are cleared, the tick count restarts at 0 and order
    /// numbering continues after the persisted orders.
    pub fn reset(&mut self) -> Result<u64, SimError> {
        let store = seed::open_store(&self.config)?;
        let tick = self.simulation.restart(store)?;
        info!(tick, "simulation reset");
        Ok(tick)
    }

    pub fn report(&mut self) -> Report {
        self.simulation.report()
    }

    pub fn inventory_snapshot(&self) -> &[InventoryRow] {
        self.simulation.inventory()
    }

    pub fn purchase_log(&self) -> &[PurchaseRecord] {
        self.simulation.purchase_log()
    }

    pub fn restock_log(&self) -> &[RestockRecord] {
        self.simulation.restock_log()
    }

    pub fn customer_purchase_summary(&self) -> Vec<CustomerSummary> {
        self.simulation.customer_purchase_summary()
    }

    pub fn tick(&self) -> u64 {
        self.simulation.tick()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store_path(&self) -> &Path {
        &self.config.store.path
    }

    pub fn simulation(&self) -> &Simulation<InMemoryKnowledgeStore> {
        &self.simulation
    }
}
