use std::path::PathBuf;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use bookstore_core::{CustomerId, EmployeeId, Money};
use bookstore_events::{InMemoryMessageBus, MessageBus, topics};
use bookstore_inventory::{InventoryLedger, InventoryRow};
use bookstore_knowledge::{EntityKind, FactValue, InMemoryKnowledgeStore, KnowledgeStore, vocab};
use bookstore_policy::DecisionPolicy;
use bookstore_purchasing::{RestockCoordinator, RestockRecord, SyncOutcome};
use bookstore_sales::{OrderSequence, PurchaseProcessor, PurchaseRecord};

use crate::actors::{Actor, CustomerActor, EmployeeActor, TickContext};
use crate::config::SimulationSettings;
use crate::error::SimError;
use crate::report::{self, CustomerSummary, Report};

/// One run's complete mutable state, advanced one tick at a time.
///
/// Each tick runs three phases in a fixed order: every actor is activated
/// once in a seeded random order, then all purchase requests are applied,
/// then restock need is evaluated. Requests published in the last phase are
/// first seen by employees on the following tick.
pub struct Simulation<S: KnowledgeStore = InMemoryKnowledgeStore> {
    settings: SimulationSettings,
    store: S,
    bus: InMemoryMessageBus,
    ledger: InventoryLedger,
    purchases: PurchaseProcessor,
    restocks: RestockCoordinator,
    policy: Box<dyn DecisionPolicy>,
    actors: Vec<Actor>,
    tick: u64,
}

impl<S: KnowledgeStore> Simulation<S> {
    /// Build a run on top of `store`: project inventory into the ledger,
    /// continue order numbering after persisted orders and register actors.
    pub fn new(settings: SimulationSettings, mut store: S) -> Result<Self, SimError> {
        settings.validate()?;
        let policy = settings
            .customer_policy
            .build(settings.preferred_genre.as_deref())
            .map_err(|e| SimError::config(e.to_string()))?;

        let state = RunState::load(&settings, &mut store)?;
        Ok(Self {
            settings,
            store,
            bus: InMemoryMessageBus::new(),
            ledger: state.ledger,
            purchases: state.purchases,
            restocks: state.restocks,
            policy,
            actors: state.actors,
            tick: 0,
        })
    }

    /// Start over on `store` with the current settings.
    ///
    /// Queued messages are dropped, the tick count returns to 0 and the
    /// reasoner gets a fresh chance. On error the run is left as it was.
    pub fn restart(&mut self, mut store: S) -> Result<u64, SimError> {
        let state = RunState::load(&self.settings, &mut store)?;
        self.bus.clear();
        self.store = store;
        self.ledger = state.ledger;
        self.purchases = state.purchases;
        self.restocks = state.restocks;
        self.actors = state.actors;
        self.tick = 0;
        Ok(self.tick)
    }

    /// Run one tick and return the new tick count.
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        let tick = self.tick;
        let mut rng = ChaCha8Rng::seed_from_u64(self.settings.random_seed.wrapping_add(tick));

        let mut order: Vec<usize> = (0..self.actors.len()).collect();
        order.shuffle(&mut rng);

        let mut ctx = TickContext {
            tick,
            rng: &mut rng,
            settings: &self.settings,
            policy: &*self.policy,
            ledger: &mut self.ledger,
            store: &mut self.store,
            bus: &mut self.bus,
            restocks: &mut self.restocks,
        };
        for slot in order {
            self.actors[slot].step(&mut ctx);
        }

        let sold = self.purchases.process(tick, &mut self.bus, &mut self.ledger, &mut self.store);
        let sync = self.restocks.synchronize(tick, false, &mut self.ledger, &mut self.store, &mut self.bus);
        debug!(tick, sold, restock_requests = sync.published, inferred = sync.inferred, "tick complete");
        tick
    }

    /// Run `ticks` ticks back to back.
    pub fn run(&mut self, ticks: u64) -> u64 {
        for _ in 0..ticks {
            self.advance();
        }
        self.tick
    }

    /// Synchronize with the reasoner now, regardless of the interval.
    pub fn force_sync(&mut self) -> SyncOutcome {
        self.restocks.synchronize(self.tick, true, &mut self.ledger, &mut self.store, &mut self.bus)
    }

    /// Force a sync, then summarise the run from the store's point of view.
    pub fn report(&mut self) -> Report {
        self.force_sync();
        Report {
            steps_run: self.tick,
            reasoner_active: self.restocks.reasoner_active(),
            generated_at: chrono::Utc::now(),
            inventory: report::inventory_lines(&self.ledger, &self.store),
            purchases: report::purchases_by_customer(&self.store),
            restocks: self.restocks.log().iter().map(Into::into).collect(),
        }
    }

    pub fn persist(&self) -> Result<PathBuf, SimError> {
        self.store.persist().map_err(SimError::Persistence)
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn set_sync_interval(&mut self, interval: u64) {
        self.settings.reasoner_sync_interval = interval;
        self.restocks.set_interval(interval);
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.settings.random_seed = seed;
    }

    pub fn inventory(&self) -> &[InventoryRow] {
        self.ledger.snapshot()
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn purchase_log(&self) -> &[PurchaseRecord] {
        self.purchases.log()
    }

    pub fn restock_log(&self) -> &[RestockRecord] {
        self.restocks.log()
    }

    pub fn pending_restock_requests(&self) -> usize {
        self.bus.pending(topics::RESTOCK)
    }

    pub fn reasoner_active(&self) -> bool {
        self.restocks.reasoner_active()
    }

    pub fn customer_purchase_summary(&self) -> Vec<CustomerSummary> {
        report::customer_summaries(&self.store)
    }
}

/// Everything derived from the store when a run starts.
struct RunState {
    ledger: InventoryLedger,
    purchases: PurchaseProcessor,
    restocks: RestockCoordinator,
    actors: Vec<Actor>,
}

impl RunState {
    fn load<S>(settings: &SimulationSettings, store: &mut S) -> Result<Self, SimError>
    where
        S: KnowledgeStore + ?Sized,
    {
        let ledger = InventoryLedger::load_from_store(store, settings.restock_threshold);
        let purchases = PurchaseProcessor::new(OrderSequence::rederive(store));
        let restocks = RestockCoordinator::new(settings.reasoner_sync_interval, i64::from(settings.restock_amount));
        let actors = register_actors(settings, &ledger, store)?;

        debug!(
            books = ledger.len(),
            actors = actors.len(),
            next_order = %purchases.next_order_id(),
            "simulation initialised"
        );
        Ok(Self {
            ledger,
            purchases,
            restocks,
            actors,
        })
    }
}

fn register_actors<S>(settings: &SimulationSettings, ledger: &InventoryLedger, store: &mut S) -> Result<Vec<Actor>, SimError>
where
    S: KnowledgeStore + ?Sized,
{
    let mut actors: Vec<Actor> = ledger.snapshot().iter().map(|row| Actor::Book(row.isbn.clone())).collect();

    for index in 0..settings.employee_count {
        let id = EmployeeId::numbered(index);
        store.resolve_or_create(EntityKind::Employee, &id.entity_name());
        actors.push(Actor::Employee(EmployeeActor::new(id)));
    }

    let customers: Vec<(CustomerId, f64)> = if settings.customers.is_empty() {
        (0..settings.customer_count)
            .map(|index| (CustomerId::numbered(index), settings.customer_budget))
            .collect()
    } else {
        settings
            .customers
            .iter()
            .map(|profile| {
                let id = CustomerId::new(profile.id.trim()).map_err(|e| SimError::config(e.to_string()))?;
                Ok((id, profile.budget.unwrap_or(settings.customer_budget)))
            })
            .collect::<Result<_, SimError>>()?
    };

    for (id, budget) in customers {
        let money = Money::from_major(budget).map_err(|e| SimError::config(format!("budget for {id}: {e}")))?;
        let entity = store.resolve_or_create(EntityKind::Customer, &id.entity_name());
        if store.attribute(&entity, vocab::HAS_BUDGET).is_none() {
            store.assert_attribute(&entity, vocab::HAS_BUDGET, FactValue::Float(budget));
        }
        actors.push(Actor::Customer(CustomerActor::new(id, money)));
    }

    Ok(actors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_policy::PolicyKind;

    fn store() -> InMemoryKnowledgeStore {
        let mut store = InMemoryKnowledgeStore::new("http://example.org/bookstore");
        let books = crate::seed::sample_inventory().unwrap();
        crate::seed::add_inventory(&mut store, &books, 5);
        store
    }

    #[test]
    fn actors_cover_books_staff_and_customers() {
        let sim = Simulation::new(SimulationSettings::default(), store()).unwrap();
        let books = sim.inventory().len();
        assert_eq!(sim.actors().len(), books + 1 + 2);
        assert!(sim.store().find(EntityKind::Employee, "employee_0").is_some());
        let customer = sim.store().find(EntityKind::Customer, "customer_1").unwrap();
        assert_eq!(sim.store().attribute(&customer, vocab::HAS_BUDGET), Some(FactValue::Float(50.0)));
    }

    #[test]
    fn tick_count_increments_by_one() {
        let mut sim = Simulation::new(SimulationSettings::default(), store()).unwrap();
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.advance(), 1);
        assert_eq!(sim.run(4), 5);
    }

    #[test]
    fn genre_policy_without_genre_is_a_config_error() {
        let settings = SimulationSettings {
            customer_policy: PolicyKind::GenrePreference,
            ..SimulationSettings::default()
        };
        assert!(matches!(Simulation::new(settings, store()), Err(SimError::Config(_))));
    }

    #[test]
    fn interval_override_reaches_the_coordinator() {
        let mut sim = Simulation::new(SimulationSettings::default(), store()).unwrap();
        sim.set_sync_interval(7);
        assert_eq!(sim.settings().reasoner_sync_interval, 7);
        assert!(sim.restocks.is_due(7));
        assert!(!sim.restocks.is_due(3));
    }

    #[test]
    fn restart_drops_queued_restock_requests() {
        let settings = SimulationSettings {
            employee_count: 0,
            ..SimulationSettings::default()
        };
        let mut sim = Simulation::new(settings, store()).unwrap();
        sim.run(3);
        assert!(sim.pending_restock_requests() > 0);

        assert_eq!(sim.restart(store()).unwrap(), 0);
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.pending_restock_requests(), 0);
        assert!(sim.ledger().pending().is_empty());
        assert!(sim.purchase_log().is_empty());
    }
}
