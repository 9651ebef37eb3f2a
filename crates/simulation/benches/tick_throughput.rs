use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use bookstore_knowledge::InMemoryKnowledgeStore;
use bookstore_simulation::seed;
use bookstore_simulation::{ReasonerKind, Simulation, SimulationSettings};

fn sample_store() -> InMemoryKnowledgeStore {
    let mut store = InMemoryKnowledgeStore::new("http://example.org/bookstore");
    let books = seed::sample_inventory().expect("bundled inventory");
    seed::add_inventory(&mut store, &books, 5);
    store
}

fn bench_tick_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_batches");

    for ticks in [10u64, 100, 1_000] {
        group.throughput(Throughput::Elements(ticks));
        group.bench_with_input(BenchmarkId::from_parameter(ticks), &ticks, |b, &ticks| {
            b.iter(|| {
                let settings = SimulationSettings {
                    customer_count: 10,
                    ..SimulationSettings::default()
                };
                let mut sim = Simulation::new(settings, sample_store()).expect("simulation");
                black_box(sim.run(ticks))
            });
        });
    }

    group.finish();
}

fn bench_inference_vs_heuristic(c: &mut Criterion) {
    let mut group = c.benchmark_group("restock_detection");

    for (label, reasoner, interval) in [
        ("rules_every_tick", ReasonerKind::Rules, 1),
        ("rules_every_third", ReasonerKind::Rules, 3),
        ("heuristic", ReasonerKind::Unavailable, 1),
    ] {
        group.bench_function(label, |b| {
            b.iter(|| {
                let settings = SimulationSettings {
                    reasoner,
                    reasoner_sync_interval: interval,
                    customer_count: 10,
                    ..SimulationSettings::default()
                };
                let store = sample_store().with_reasoner(reasoner.build());
                let mut sim = Simulation::new(settings, store).expect("simulation");
                black_box(sim.run(200))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_tick_batches, bench_inference_vs_heuristic);
criterion_main!(benches);
