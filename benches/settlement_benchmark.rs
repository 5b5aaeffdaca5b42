use criterion::{black_box, criterion_group, criterion_main, Criterion};
use split_ledger::settlement::aggregator::BalanceAggregator;
use split_ledger::settlement::planner::SettlementPlanner;
use split_ledger::simulation::random_group::{generate_random_group, GroupConfig, GroupSnapshot};

fn snapshot(member_count: usize, expense_count: usize) -> GroupSnapshot {
    let config = GroupConfig {
        member_count,
        expense_count,
        ..Default::default()
    };
    generate_random_group(&config).expect("generated group is valid")
}

fn bench_aggregate_10_members(c: &mut Criterion) {
    let group = snapshot(10, 100);

    c.bench_function("aggregate_10_members", |b| {
        b.iter(|| BalanceAggregator::compute_balances(black_box(&group.members), black_box(&group.expenses)))
    });
}

fn bench_settle_100_members(c: &mut Criterion) {
    let group = snapshot(100, 1_000);
    let balances = BalanceAggregator::compute_balances(&group.members, &group.expenses)
        .expect("balances aggregate");
    let planner = SettlementPlanner::default();

    c.bench_function("settle_100_members", |b| {
        b.iter(|| planner.compute_payments(black_box(&balances)))
    });
}

fn bench_pipeline_1000_members(c: &mut Criterion) {
    let group = snapshot(1_000, 5_000);
    let planner = SettlementPlanner::default();

    c.bench_function("pipeline_1000_members", |b| {
        b.iter(|| {
            let balances =
                BalanceAggregator::compute_balances(black_box(&group.members), black_box(&group.expenses))
                    .expect("balances aggregate");
            planner.compute_payments(&balances)
        })
    });
}

criterion_group!(
    benches,
    bench_aggregate_10_members,
    bench_settle_100_members,
    bench_pipeline_1000_members
);
criterion_main!(benches);
