use criterion::{black_box, criterion_group, criterion_main, Criterion};
use splitwise_engine::engine::settlement::SettlementEngine;
use splitwise_engine::simulation::generator::{generate_random_group, GroupConfig};

fn bench_group(c: &mut Criterion, name: &str, participant_count: usize, expense_count: usize) {
    let config = GroupConfig {
        participant_count,
        expense_count,
        ..Default::default()
    };
    let group = generate_random_group(&config).unwrap();

    c.bench_function(name, |b| {
        b.iter(|| {
            SettlementEngine::compute_settlements(
                black_box(group.participants()),
                black_box(group.expenses()),
            )
        })
    });
}

fn bench_settle_5_participants(c: &mut Criterion) {
    bench_group(c, "settle_5_participants", 5, 50);
}

fn bench_settle_100_participants(c: &mut Criterion) {
    bench_group(c, "settle_100_participants", 100, 1_000);
}

fn bench_settle_1000_participants(c: &mut Criterion) {
    bench_group(c, "settle_1000_participants", 1_000, 10_000);
}

criterion_group!(
    benches,
    bench_settle_5_participants,
    bench_settle_100_participants,
    bench_settle_1000_participants
);
criterion_main!(benches);
