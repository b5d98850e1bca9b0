//! Basic multi-currency settlement example.
//!
//! Demonstrates the full pipeline: rate snapshot, expense recording,
//! net balances, and the greedy payment plan.

use rust_decimal_macros::dec;
use settlement_engine::core::currency::{CurrencyCode, RateTable};
use settlement_engine::core::ledger::ExpenseLedger;
use settlement_engine::core::participant::{Group, ParticipantId};
use settlement_engine::settlement::planner::SettlementPlanner;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  settlement-engine: Basic Settlement Example ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let usd = CurrencyCode::new("USD");
    let eur = CurrencyCode::new("EUR");
    let ngn = CurrencyCode::new("NGN");

    let rates = RateTable::new(usd.clone())
        .with_rate(eur.clone(), dec!(0.90))
        .expect("positive rate")
        .with_rate(ngn.clone(), dec!(1500))
        .expect("positive rate");

    let group = Group::new(vec![
        ParticipantId::new("alice"),
        ParticipantId::new("bob"),
        ParticipantId::new("carol"),
    ])
    .expect("non-empty group");

    let mut ledger = ExpenseLedger::new(group, rates);

    ledger
        .add_expense(&ParticipantId::new("alice"), dec!(180), &eur, Some("hotel"))
        .unwrap();
    ledger
        .add_expense(&ParticipantId::new("bob"), dec!(45), &usd, Some("taxi"))
        .unwrap();
    ledger
        .add_expense(
            &ParticipantId::new("carol"),
            dec!(22500),
            &ngn,
            Some("dinner"),
        )
        .unwrap();

    println!("━━━ Expenses ({} settlement) ━━━\n", ledger.settlement_currency());
    for expense in ledger.expenses() {
        println!(
            "  {} paid {} {} ({} {}) for {}",
            expense.payer(),
            expense.original_amount(),
            expense.original_currency(),
            expense.converted_amount(),
            ledger.settlement_currency(),
            expense.description().unwrap_or("unspecified"),
        );
    }

    let balances = ledger.net_balances();
    println!("\n━━━ Net Balances ━━━\n");
    for (participant, balance) in balances.entries() {
        let status = if balance > dec!(0) {
            "CREDITOR"
        } else if balance < dec!(0) {
            "DEBTOR"
        } else {
            "SETTLED"
        };
        println!("  {:<8} {:>10}  [{}]", participant.to_string(), balance.round_dp(2), status);
    }

    let plan = SettlementPlanner::plan(&balances).expect("ledger balances net to zero");
    println!("\n━━━ Settlement Plan ━━━\n");
    for payment in plan.payments() {
        println!("  {} {}", payment, ledger.settlement_currency());
    }
    println!("\n  {} payments, {} {} moved", plan.len(), plan.total_transferred(), ledger.settlement_currency());
}
