use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use settlement_engine::core::currency::{CurrencyCode, RateTable};
use settlement_engine::core::ledger::{ExpenseLedger, LedgerError};
use settlement_engine::core::participant::{Group, ParticipantId};
use settlement_engine::rates::source::{RatePayload, RateSource, StaticRateSource};
use settlement_engine::settlement::planner::SettlementPlanner;

fn group_of(names: &[&str]) -> Group {
    Group::new(names.iter().map(|n| ParticipantId::new(*n)).collect()).unwrap()
}

/// Full pipeline test: rates → ledger → balances → plan.
#[test]
fn full_pipeline_weekend_trip() {
    let usd = CurrencyCode::new("USD");
    let eur = CurrencyCode::new("EUR");
    let ngn = CurrencyCode::new("NGN");

    let rates = RateTable::new(usd.clone())
        .with_rate(eur.clone(), dec!(0.90))
        .unwrap()
        .with_rate(ngn.clone(), dec!(1500))
        .unwrap();

    let mut ledger = ExpenseLedger::new(group_of(&["alice", "bob", "carol", "dave"]), rates);

    ledger
        .add_expense(&ParticipantId::new("alice"), dec!(180), &eur, Some("hotel"))
        .unwrap();
    ledger
        .add_expense(&ParticipantId::new("bob"), dec!(60), &usd, Some("fuel"))
        .unwrap();
    ledger
        .add_expense(
            &ParticipantId::new("carol"),
            dec!(30000),
            &ngn,
            Some("dinner"),
        )
        .unwrap();

    // 180 EUR -> 200 USD, 30000 NGN -> 20 USD; gross 280 USD.
    assert_eq!(ledger.gross_total(), dec!(280.00));
    let balances = ledger.net_balances();
    assert!(balances.is_balanced());
    // Each member's share is 70.
    assert_eq!(balances.balance(&ParticipantId::new("alice")), dec!(130));
    assert_eq!(balances.balance(&ParticipantId::new("bob")), dec!(-10));
    assert_eq!(balances.balance(&ParticipantId::new("carol")), dec!(-50));
    assert_eq!(balances.balance(&ParticipantId::new("dave")), dec!(-70));

    let plan = SettlementPlanner::plan(&balances).unwrap();
    // One creditor, three debtors: exactly three payments, largest debt first.
    assert_eq!(plan.len(), 3);
    assert_eq!(plan.payments()[0].from.as_str(), "dave");
    assert_eq!(plan.payments()[0].amount, dec!(70.00));
    assert_eq!(plan.payments()[1].from.as_str(), "carol");
    assert_eq!(plan.payments()[2].from.as_str(), "bob");
    assert_eq!(plan.total_transferred(), dec!(130.00));

    let settled = plan.apply_to(&balances);
    for (_, balance) in settled.iter() {
        assert_eq!(balance, Decimal::ZERO);
    }
}

/// Three participants, one payer of 90 USD: the plan is exactly two
/// 30.00 payments, ordered by the name tie-break.
#[test]
fn three_way_split_scenario() {
    let usd = CurrencyCode::new("USD");
    let mut ledger = ExpenseLedger::new(group_of(&["A", "B", "C"]), RateTable::new(usd.clone()));
    ledger
        .add_expense(&ParticipantId::new("A"), dec!(90), &usd, None)
        .unwrap();

    let balances = ledger.net_balances();
    assert_eq!(balances.balance(&ParticipantId::new("A")), dec!(60));
    assert_eq!(balances.balance(&ParticipantId::new("B")), dec!(-30));
    assert_eq!(balances.balance(&ParticipantId::new("C")), dec!(-30));

    let plan = SettlementPlanner::plan(&balances).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.payments()[0].from.as_str(), "B");
    assert_eq!(plan.payments()[0].to.as_str(), "A");
    assert_eq!(plan.payments()[0].amount, dec!(30.00));
    assert_eq!(plan.payments()[1].from.as_str(), "C");
    assert_eq!(plan.payments()[1].to.as_str(), "A");
    assert_eq!(plan.payments()[1].amount, dec!(30.00));
}

/// Two participants with a converted expense: 100 EUR at 1.10 USD/EUR
/// becomes 110 USD, split 55 each.
#[test]
fn conversion_scenario() {
    let usd = CurrencyCode::new("USD");
    let eur = CurrencyCode::new("EUR");
    // 1 EUR = 1.10 USD, so one USD buys 1/1.10 EUR.
    let rates = RateTable::new(usd.clone())
        .with_rate(eur.clone(), dec!(1) / dec!(1.10))
        .unwrap();

    let mut ledger = ExpenseLedger::new(group_of(&["A", "B"]), rates);
    let expense = ledger
        .add_expense(&ParticipantId::new("A"), dec!(100), &eur, None)
        .unwrap();
    assert_eq!(expense.converted_amount(), dec!(110.00));

    let balances = ledger.net_balances();
    assert_eq!(balances.balance(&ParticipantId::new("A")), dec!(55));
    assert_eq!(balances.balance(&ParticipantId::new("B")), dec!(-55));

    let plan = SettlementPlanner::plan(&balances).unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.payments()[0].from.as_str(), "B");
    assert_eq!(plan.payments()[0].to.as_str(), "A");
    assert_eq!(plan.payments()[0].amount, dec!(55.00));
}

/// A rejected expense leaves the session able to continue.
#[test]
fn rejected_expense_does_not_poison_session() {
    let usd = CurrencyCode::new("USD");
    let mut ledger = ExpenseLedger::new(group_of(&["alice", "bob"]), RateTable::new(usd.clone()));

    let err = ledger.add_expense(&ParticipantId::new("mallory"), dec!(40), &usd, None);
    assert!(matches!(err, Err(LedgerError::UnknownParticipant { .. })));
    assert!(ledger.net_balances().is_balanced());
    assert_eq!(
        ledger.net_balances().balance(&ParticipantId::new("alice")),
        Decimal::ZERO
    );

    ledger
        .add_expense(&ParticipantId::new("alice"), dec!(40), &usd, None)
        .unwrap();
    assert_eq!(
        ledger.net_balances().balance(&ParticipantId::new("alice")),
        dec!(20)
    );
}

/// Session setup through the rate source interface.
#[test]
fn rate_source_bootstraps_session() {
    let usd = CurrencyCode::new("USD");
    let payload = r#"{
        "result": "success",
        "base_code": "USD",
        "conversion_rates": { "USD": 1, "EUR": 0.90 }
    }"#;
    let table = RatePayload::from_json(payload)
        .unwrap()
        .into_table(&usd)
        .unwrap();
    let source = StaticRateSource::new(table);

    let rates = source.fetch_rates(&usd).unwrap();
    let mut ledger = ExpenseLedger::new(group_of(&["alice", "bob"]), rates);
    ledger
        .add_expense(
            &ParticipantId::new("alice"),
            dec!(90),
            &CurrencyCode::new("EUR"),
            None,
        )
        .unwrap();
    assert_eq!(ledger.gross_total(), dec!(100.00));
}

/// A failed rate fetch aborts before any expense can be recorded.
#[test]
fn failed_rate_fetch_aborts_setup() {
    let table = RateTable::new(CurrencyCode::new("USD"));
    let source = StaticRateSource::new(table);
    assert!(source.fetch_rates(&CurrencyCode::new("JPY")).is_err());
}

/// JSON round-trip of the derived outputs.
#[test]
fn plan_and_balances_serialize() {
    let usd = CurrencyCode::new("USD");
    let mut ledger = ExpenseLedger::new(group_of(&["A", "B", "C"]), RateTable::new(usd.clone()));
    ledger
        .add_expense(&ParticipantId::new("A"), dec!(90), &usd, Some("dinner"))
        .unwrap();

    let balances = ledger.net_balances();
    let json = serde_json::to_string(&balances).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(parsed["balances"].get("A").is_some());

    let plan = SettlementPlanner::plan(&balances).unwrap();
    let json = serde_json::to_string(&plan).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["payments"][0]["from"], "B");
    assert_eq!(parsed["payments"][0]["to"], "A");

    let expense_json = serde_json::to_string(&ledger.expenses()[0]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&expense_json).unwrap();
    assert_eq!(parsed["payer"], "A");
    assert_eq!(parsed["description"], "dinner");
}
