use bookstore_core::{Isbn, OrderId};
use bookstore_inventory::InventoryLedger;
use bookstore_knowledge::{EntityKind, FactValue, InMemoryKnowledgeStore, KnowledgeStore, vocab};
use bookstore_policy::PolicyKind;
use bookstore_simulation::seed::{self, BookSeed};
use bookstore_simulation::{AppConfig, BudgetMode, ReasonerKind, SimError, Simulation, SimulationManager, SimulationSettings};
use proptest::prelude::*;

fn book(isbn: &str, price: f64, quantity: i64, low_threshold: i64) -> BookSeed {
    BookSeed {
        isbn: isbn.to_string(),
        title: format!("Title {isbn}"),
        author: String::new(),
        genre: "Fiction".to_string(),
        price,
        quantity,
        low_threshold: Some(low_threshold),
    }
}

fn store_with(books: &[BookSeed]) -> InMemoryKnowledgeStore {
    let mut store = InMemoryKnowledgeStore::new("http://example.org/bookstore");
    seed::add_inventory(&mut store, books, 5);
    store
}

fn sample_store() -> InMemoryKnowledgeStore {
    store_with(&seed::sample_inventory().unwrap())
}

/// One always-shopping greedy customer with a fixed per-visit budget.
fn lone_greedy_shopper(budget: f64) -> SimulationSettings {
    SimulationSettings {
        customer_count: 1,
        employee_count: 0,
        customer_budget: budget,
        budget_mode: BudgetMode::PerVisit,
        customer_policy: PolicyKind::Greedy,
        customer_spawn_chance: 1.0,
        ..SimulationSettings::default()
    }
}

fn isbn(s: &str) -> Isbn {
    Isbn::new(s).unwrap()
}

#[test]
fn same_seed_replays_identically() {
    let settings = SimulationSettings {
        customer_count: 4,
        customer_spawn_chance: 0.7,
        ..SimulationSettings::default()
    };
    let mut first = Simulation::new(settings.clone(), sample_store()).unwrap();
    let mut second = Simulation::new(settings, sample_store()).unwrap();
    first.run(40);
    second.run(40);

    assert!(!first.purchase_log().is_empty());
    assert_eq!(first.purchase_log(), second.purchase_log());
    assert_eq!(first.restock_log(), second.restock_log());
    assert_eq!(first.inventory(), second.inventory());
}

#[test]
fn different_seeds_diverge() {
    let settings = SimulationSettings {
        customer_count: 4,
        customer_spawn_chance: 0.7,
        ..SimulationSettings::default()
    };
    let mut first = Simulation::new(settings.clone(), sample_store()).unwrap();
    let mut second = Simulation::new(SimulationSettings { random_seed: 99, ..settings }, sample_store()).unwrap();
    first.run(40);
    second.run(40);
    assert_ne!(first.purchase_log(), second.purchase_log());
}

#[test]
fn greedy_customer_drains_a_row_then_it_needs_restock() {
    let mut sim = Simulation::new(lone_greedy_shopper(10.0), store_with(&[book("A", 10.0, 3, 5)])).unwrap();
    sim.run(3);

    assert_eq!(sim.purchase_log().len(), 3);
    let ids: Vec<OrderId> = sim.purchase_log().iter().map(|r| r.order_id).collect();
    assert_eq!(ids, vec![OrderId::new(0), OrderId::new(1), OrderId::new(2)]);

    let row = sim.ledger().get(&isbn("A")).unwrap();
    assert_eq!(row.quantity, 0);
    assert!(row.needs_restock);
}

#[test]
fn exhausted_row_makes_later_attempts_no_ops() {
    let mut sim = Simulation::new(lone_greedy_shopper(10.0), store_with(&[book("A", 10.0, 1, 5)])).unwrap();
    sim.advance();
    assert_eq!(sim.purchase_log().len(), 1);

    sim.advance();
    assert_eq!(sim.purchase_log().len(), 1);
    assert_eq!(sim.ledger().get(&isbn("A")).unwrap().quantity, 0);
}

#[test]
fn restock_is_fulfilled_on_the_following_tick() {
    let settings = SimulationSettings {
        customer_count: 0,
        employee_count: 1,
        reasoner_sync_interval: 1,
        restock_amount: 10,
        ..SimulationSettings::default()
    };
    let mut sim = Simulation::new(settings, store_with(&[book("A", 10.0, 0, 5)])).unwrap();

    sim.advance();
    assert!(sim.ledger().is_pending(&isbn("A")));
    assert_eq!(sim.ledger().get(&isbn("A")).unwrap().quantity, 0);
    assert!(sim.restock_log().is_empty());
    assert_eq!(sim.pending_restock_requests(), 1);

    sim.advance();
    let row = sim.ledger().get(&isbn("A")).unwrap();
    assert_eq!(row.quantity, 10);
    assert!(!sim.ledger().is_pending(&isbn("A")));
    assert_eq!(sim.restock_log().len(), 1);
    assert_eq!(sim.restock_log()[0].tick, 2);
    assert_eq!(sim.restock_log()[0].amount, 10);
}

#[test]
fn unavailable_reasoner_degrades_without_stopping() {
    let settings = SimulationSettings {
        customer_count: 3,
        customer_spawn_chance: 1.0,
        reasoner: ReasonerKind::Unavailable,
        ..SimulationSettings::default()
    };
    let store = store_with(&[book("A", 5.0, 6, 5), book("B", 7.0, 30, 5)]).with_reasoner(settings.reasoner.build());
    let mut sim = Simulation::new(settings, store).unwrap();

    sim.run(12);
    assert_eq!(sim.tick(), 12);
    assert!(!sim.reasoner_active());
    assert!(!sim.restock_log().is_empty(), "procedural check must still trigger restocks");

    let report = sim.report();
    assert!(!report.reasoner_active);
    assert_eq!(report.steps_run, 12);
}

#[test]
fn report_reads_inventory_back_from_store() {
    let mut sim = Simulation::new(lone_greedy_shopper(10.0), store_with(&[book("A", 10.0, 3, 5)])).unwrap();
    sim.run(2);
    let report = sim.report();

    assert!(report.reasoner_active);
    assert_eq!(report.inventory[0].quantity, 1);
    assert!(report.inventory[0].needs_restock);
    assert_eq!(report.purchases.get("customer_0"), Some(&vec!["A".to_string()]));

    let summary = sim.customer_purchase_summary();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].purchased_books, vec!["A".to_string()]);
}

#[test]
fn depleting_budget_stops_spending() {
    let settings = SimulationSettings {
        budget_mode: BudgetMode::Depleting,
        ..lone_greedy_shopper(25.0)
    };
    let mut sim = Simulation::new(settings, store_with(&[book("A", 10.0, 50, 5)])).unwrap();
    sim.run(6);
    assert_eq!(sim.purchase_log().len(), 2);
}

fn manager_config(dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.store.path = dir.join("store.json");
    config.simulation.customer_policy = PolicyKind::Greedy;
    config.simulation.budget_mode = BudgetMode::PerVisit;
    config.simulation.customer_spawn_chance = 1.0;
    config
}

#[test]
fn order_ids_continue_after_reset() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = SimulationManager::new(manager_config(dir.path())).unwrap();

    manager.advance(5, None, None).unwrap();
    let before = manager.purchase_log().last().unwrap().order_id;

    assert_eq!(manager.reset().unwrap(), 0);
    assert!(manager.purchase_log().is_empty());
    assert_eq!(manager.simulation().pending_restock_requests(), 0);
    manager.advance(3, None, None).unwrap();

    let after: Vec<OrderId> = manager.purchase_log().iter().map(|r| r.order_id).collect();
    assert!(!after.is_empty());
    assert!(after.iter().all(|id| *id > before));
    assert!(after.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn rejected_batches_change_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = SimulationManager::new(manager_config(dir.path())).unwrap();

    assert!(matches!(manager.advance(0, None, None), Err(SimError::Validation(_))));
    assert!(matches!(manager.advance(-3, None, None), Err(SimError::Validation(_))));
    assert!(matches!(manager.advance(2, Some(0), None), Err(SimError::Validation(_))));
    assert_eq!(manager.tick(), 0);
    assert_eq!(manager.config().simulation.reasoner_sync_interval, 3);
}

#[test]
fn overrides_persist_across_batches() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = SimulationManager::new(manager_config(dir.path())).unwrap();
    assert_eq!(manager.advance(2, Some(4), Some(7)).unwrap(), 2);
    assert_eq!(manager.config().simulation.reasoner_sync_interval, 4);
    assert_eq!(manager.simulation().settings().random_seed, 7);
    assert_eq!(manager.advance(1, None, None).unwrap(), 3);
}

#[test]
fn persisted_store_reloads_same_inventory() {
    let dir = tempfile::tempdir().unwrap();
    let config = manager_config(dir.path());
    let mut manager = SimulationManager::new(config.clone()).unwrap();
    manager.advance(10, None, None).unwrap();

    let mut reloaded = InMemoryKnowledgeStore::load(&config.store.path).unwrap();
    let ledger = InventoryLedger::load_from_store(&mut reloaded, config.simulation.restock_threshold);

    let expected: Vec<_> = manager
        .inventory_snapshot()
        .iter()
        .map(|r| (r.isbn.clone(), r.quantity, r.low_threshold))
        .collect();
    let actual: Vec<_> = ledger
        .snapshot()
        .iter()
        .map(|r| (r.isbn.clone(), r.quantity, r.low_threshold))
        .collect();
    assert_eq!(expected, actual);
    assert_eq!(reloaded.count(EntityKind::Order), manager.purchase_log().len());
}

#[test]
fn unwritable_store_path_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file, not a directory").unwrap();

    let mut config = AppConfig::default();
    config.store.path = blocker.join("store.json");
    assert!(matches!(SimulationManager::new(config), Err(SimError::Persistence(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn ledger_and_store_agree_and_requests_stay_unique(seed in any::<u64>(), ticks in 1u64..30, interval in 1u64..5) {
        let settings = SimulationSettings {
            random_seed: seed,
            reasoner_sync_interval: interval,
            customer_count: 3,
            customer_spawn_chance: 0.8,
            budget_mode: BudgetMode::PerVisit,
            ..SimulationSettings::default()
        };
        let mut sim = Simulation::new(settings, sample_store()).unwrap();

        for _ in 0..ticks {
            sim.advance();
            for row in sim.inventory() {
                let inventory = sim.store().find(EntityKind::Inventory, &format!("inv_{}", row.isbn)).unwrap();
                prop_assert_eq!(
                    sim.store().attribute(&inventory, vocab::AVAILABLE_QUANTITY),
                    Some(FactValue::Int(i64::from(row.quantity)))
                );
            }
            prop_assert_eq!(sim.pending_restock_requests(), sim.ledger().pending().len());
        }

        let ids: Vec<u64> = sim.purchase_log().iter().map(|r| r.order_id.sequence()).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
