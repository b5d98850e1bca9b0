use crate::core::currency::{CurrencyCode, CurrencyError, RateTable};
use crate::core::expense::Expense;
use crate::core::participant::{Group, ParticipantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Tolerance for treating a balance as zero: half of the smallest
/// settlement unit at two decimal places.
///
/// Shared by the ledger's zero-sum check and the planner's cursor
/// advancement so both sides agree on what "settled" means.
pub const EPSILON: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

/// Errors arising from ledger construction and expense recording.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("a settlement group must have at least one participant")]
    EmptyGroup,
    #[error("unknown participant {participant}: not a member of the group")]
    UnknownParticipant { participant: ParticipantId },
    #[error("expense amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },
    #[error(transparent)]
    Currency(#[from] CurrencyError),
    #[error("zero-sum invariant violated: balances sum to {residual}")]
    InvariantViolation { residual: Decimal },
}

/// Net position of each participant in the settlement currency.
///
/// A positive balance means the participant is owed (net creditor).
/// A negative balance means the participant owes (net debtor).
///
/// The sheet is derived state: it can always be rebuilt from the group
/// and the expense sequence, and after every insertion its balances sum
/// to zero within [`EPSILON`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    balances: HashMap<ParticipantId, Decimal>,
}

impl BalanceSheet {
    /// Build a sheet with every group member at zero.
    pub fn for_group(group: &Group) -> Self {
        Self {
            balances: group
                .iter()
                .map(|p| (p.clone(), Decimal::ZERO))
                .collect(),
        }
    }

    /// Net balance of a participant. Zero for anyone not on the sheet.
    pub fn balance(&self, participant: &ParticipantId) -> Decimal {
        self.balances
            .get(participant)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn credit(&mut self, participant: &ParticipantId, amount: Decimal) {
        *self
            .balances
            .entry(participant.clone())
            .or_insert(Decimal::ZERO) += amount;
    }

    pub(crate) fn debit(&mut self, participant: &ParticipantId, amount: Decimal) {
        self.credit(participant, -amount);
    }

    /// Sum of all balances. Exactly zero in theory; within [`EPSILON`]
    /// in practice once per-expense rounding is involved.
    pub fn total(&self) -> Decimal {
        self.balances.values().sum()
    }

    /// True if the balances sum to zero within [`EPSILON`].
    pub fn is_balanced(&self) -> bool {
        self.total().abs() <= EPSILON
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> {
        self.balances.iter().map(|(p, &b)| (p, b))
    }

    /// All entries sorted by participant name, for deterministic output.
    pub fn entries(&self) -> Vec<(&ParticipantId, Decimal)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Append-only record of a group's shared expenses.
///
/// Every expense is converted into the settlement currency (the rate
/// table's base) at insertion time and split equally across the fixed
/// group: the payer is credited `converted - split`, every other member
/// is debited `split`. Balances accumulate in [`Decimal`] so dozens of
/// small expenses cannot drift the zero-sum invariant the way float
/// accumulation would.
///
/// # Examples
///
/// ```
/// use settlement_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let group = Group::new(vec![
///     ParticipantId::new("alice"),
///     ParticipantId::new("bob"),
///     ParticipantId::new("carol"),
/// ]).unwrap();
/// let rates = RateTable::new(CurrencyCode::new("USD"));
/// let mut ledger = ExpenseLedger::new(group, rates);
///
/// ledger.add_expense(
///     &ParticipantId::new("alice"),
///     dec!(90),
///     &CurrencyCode::new("USD"),
///     Some("groceries"),
/// ).unwrap();
///
/// let balances = ledger.net_balances();
/// assert_eq!(balances.balance(&ParticipantId::new("alice")), dec!(60));
/// assert_eq!(balances.balance(&ParticipantId::new("bob")), dec!(-30));
/// ```
#[derive(Debug, Clone)]
pub struct ExpenseLedger {
    group: Group,
    rates: RateTable,
    expenses: Vec<Expense>,
    balances: BalanceSheet,
}

impl ExpenseLedger {
    /// Create a ledger for a fixed group against a rate snapshot.
    ///
    /// The settlement currency is the rate table's base currency.
    pub fn new(group: Group, rates: RateTable) -> Self {
        let balances = BalanceSheet::for_group(&group);
        Self {
            group,
            rates,
            expenses: Vec::new(),
            balances,
        }
    }

    /// Record a shared expense and update every member's balance.
    ///
    /// A rejected expense (bad amount, unknown payer, unknown currency)
    /// leaves the ledger completely unchanged, so a session can report
    /// the error and continue with the next entry.
    pub fn add_expense(
        &mut self,
        payer: &ParticipantId,
        amount: Decimal,
        currency: &CurrencyCode,
        description: Option<&str>,
    ) -> Result<&Expense, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount { amount });
        }
        if !self.group.contains(payer) {
            return Err(LedgerError::UnknownParticipant {
                participant: payer.clone(),
            });
        }

        let converted = self.rates.to_base(amount, currency)?;
        let split = converted / Decimal::from(self.group.len());

        // Apply to a scratch sheet first so an invariant failure cannot
        // leave the ledger half-updated.
        let mut next = self.balances.clone();
        for member in self.group.iter() {
            if member == payer {
                next.credit(member, converted - split);
            } else {
                next.debit(member, split);
            }
        }
        if !next.is_balanced() {
            return Err(LedgerError::InvariantViolation {
                residual: next.total(),
            });
        }

        self.balances = next;
        self.expenses.push(Expense::new(
            payer.clone(),
            amount,
            currency.clone(),
            converted,
            description.map(str::to_string),
        ));
        Ok(self.expenses.last().expect("expense just pushed"))
    }

    /// Snapshot of current net balances. Pure read, no mutation.
    pub fn net_balances(&self) -> BalanceSheet {
        self.balances.clone()
    }

    /// The audit list of recorded expenses, in insertion order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    /// The currency all balances are denominated in.
    pub fn settlement_currency(&self) -> &CurrencyCode {
        self.rates.base_currency()
    }

    /// Total of all expenses in the settlement currency.
    pub fn gross_total(&self) -> Decimal {
        self.expenses.iter().map(|e| e.converted_amount()).sum()
    }
}
