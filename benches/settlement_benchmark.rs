use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;
use settlement_engine::core::currency::{CurrencyCode, RateTable};
use settlement_engine::core::ledger::{BalanceSheet, ExpenseLedger};
use settlement_engine::settlement::planner::SettlementPlanner;
use settlement_engine::simulation::scenario::{generate_scenario, Scenario, ScenarioConfig};

fn scenario(participants: usize, expenses: usize) -> Scenario {
    let config = ScenarioConfig {
        participant_count: participants,
        currencies: vec![CurrencyCode::new("USD"), CurrencyCode::new("EUR")],
        expense_count: expenses,
        ..Default::default()
    };
    generate_scenario(&config)
}

fn rates() -> RateTable {
    RateTable::new(CurrencyCode::new("USD"))
        .with_rate(CurrencyCode::new("EUR"), dec!(0.92))
        .unwrap()
}

fn balances_for(scenario: &Scenario) -> BalanceSheet {
    let mut ledger = ExpenseLedger::new(scenario.group.clone(), rates());
    for (payer, amount, currency) in &scenario.expenses {
        ledger.add_expense(payer, *amount, currency, None).unwrap();
    }
    ledger.net_balances()
}

fn bench_ledger_100_expenses(c: &mut Criterion) {
    let scenario = scenario(10, 100);

    c.bench_function("ledger_10_participants_100_expenses", |b| {
        b.iter(|| {
            let mut ledger = ExpenseLedger::new(scenario.group.clone(), rates());
            for (payer, amount, currency) in &scenario.expenses {
                ledger
                    .add_expense(black_box(payer), *amount, currency, None)
                    .unwrap();
            }
            ledger.net_balances()
        })
    });
}

fn bench_plan_10_participants(c: &mut Criterion) {
    let balances = balances_for(&scenario(10, 50));

    c.bench_function("plan_10_participants", |b| {
        b.iter(|| SettlementPlanner::plan(black_box(&balances)))
    });
}

fn bench_plan_100_participants(c: &mut Criterion) {
    let balances = balances_for(&scenario(100, 500));

    c.bench_function("plan_100_participants", |b| {
        b.iter(|| SettlementPlanner::plan(black_box(&balances)))
    });
}

fn bench_plan_1000_participants(c: &mut Criterion) {
    let balances = balances_for(&scenario(1000, 5000));

    c.bench_function("plan_1000_participants", |b| {
        b.iter(|| SettlementPlanner::plan(black_box(&balances)))
    });
}

criterion_group!(
    benches,
    bench_ledger_100_expenses,
    bench_plan_10_participants,
    bench_plan_100_participants,
    bench_plan_1000_participants
);
criterion_main!(benches);
