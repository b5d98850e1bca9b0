//! Random expense scenario generation.
//!
//! Generates synthetic groups and expense sequences to exercise the
//! ledger and planner under realistic load.

use crate::core::currency::CurrencyCode;
use crate::core::participant::{Group, ParticipantId};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Configuration for generating a random expense scenario.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Number of participants in the group.
    pub participant_count: usize,
    /// Currencies expenses may be paid in. The first entry is treated
    /// as the settlement currency by [`generate_scenario`].
    pub currencies: Vec<CurrencyCode>,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Minimum expense amount.
    pub min_amount: Decimal,
    /// Maximum expense amount.
    pub max_amount: Decimal,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            participant_count: 5,
            currencies: vec![CurrencyCode::new("USD")],
            expense_count: 30,
            min_amount: Decimal::from(1),
            max_amount: Decimal::from(500),
        }
    }
}

/// A generated scenario: the group plus raw expense tuples ready to be
/// fed into a ledger.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub group: Group,
    pub expenses: Vec<(ParticipantId, Decimal, CurrencyCode)>,
}

/// Generate a random scenario for the given configuration.
///
/// # Panics
///
/// Panics if the configuration names zero participants or zero
/// currencies; generation is test tooling, not validated input.
pub fn generate_scenario(config: &ScenarioConfig) -> Scenario {
    assert!(config.participant_count > 0, "need at least one participant");
    assert!(!config.currencies.is_empty(), "need at least one currency");

    let mut rng = rand::thread_rng();

    let members: Vec<ParticipantId> = (0..config.participant_count)
        .map(|i| ParticipantId::new(format!("participant-{:03}", i)))
        .collect();
    let group = Group::new(members.clone()).expect("participant_count checked above");

    let min_cents = (config.min_amount * Decimal::from(100))
        .trunc()
        .to_i64()
        .unwrap_or(100);
    let max_cents = (config.max_amount * Decimal::from(100))
        .trunc()
        .to_i64()
        .unwrap_or(50_000);

    let mut expenses = Vec::with_capacity(config.expense_count);
    for _ in 0..config.expense_count {
        let payer = members[rng.gen_range(0..members.len())].clone();
        let currency = config.currencies[rng.gen_range(0..config.currencies.len())].clone();
        let cents = rng.gen_range(min_cents.max(1)..=max_cents.max(2));
        let amount = Decimal::new(cents, 2);
        expenses.push((payer, amount, currency));
    }

    Scenario { group, expenses }
}
