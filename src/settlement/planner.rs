use crate::core::currency::SETTLEMENT_DP;
use crate::core::ledger::{BalanceSheet, EPSILON};
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from settlement planning.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The balance sheet does not net to zero within tolerance.
    ///
    /// This is an internal invariant violation, not a user error: a
    /// correctly maintained balance sheet always nets to zero, so a
    /// residual here points at a conversion or split defect upstream.
    /// Failing loudly beats silently emitting a wrong plan.
    #[error("balance sheet does not net to zero: residual {residual}")]
    Unbalanced { residual: Decimal },
}

/// A single peer-to-peer payment in the settlement currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub from: ParticipantId,
    pub to: ParticipantId,
    /// Always positive.
    pub amount: Decimal,
}

impl std::fmt::Display for Payment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} pays {} {}", self.from, self.to, self.amount)
    }
}

/// An ordered sequence of payments that zeroes every balance.
///
/// The plan is derived, discardable output: recomputing it from the
/// same balance sheet always yields the same payments in the same
/// order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettlementPlan {
    payments: Vec<Payment>,
}

impl SettlementPlan {
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Total amount moved by the plan.
    pub fn total_transferred(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    /// Apply every payment to a balance sheet and return the result.
    ///
    /// Applying a plan to the sheet that produced it settles every
    /// balance up to the sub-cent residue equal splits leave behind
    /// (at most half a cent per group member).
    pub fn apply_to(&self, balances: &BalanceSheet) -> BalanceSheet {
        let mut settled = balances.clone();
        for payment in &self.payments {
            settled.credit(&payment.from, payment.amount);
            settled.debit(&payment.to, payment.amount);
        }
        settled
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.payments.is_empty() {
            return writeln!(f, "Everyone is settled; no payments required.");
        }
        for payment in &self.payments {
            writeln!(f, "{}", payment)?;
        }
        Ok(())
    }
}

/// Greedy two-pointer matcher over sorted debtors and creditors.
///
/// Matching the largest outstanding debt against the largest
/// outstanding credit tends to produce larger individual payments and
/// fewer total transactions. The result is a good heuristic, not a
/// proven global minimum (minimal transaction count is an NP-hard
/// partition-type problem), and the plan never exceeds
/// `debtors + creditors - 1` payments.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Compute the payment plan that zeroes a balance sheet.
    ///
    /// Balances are first rounded to settlement precision (half-even);
    /// participants within [`EPSILON`] of zero are omitted entirely.
    /// Debtors are walked most-negative-first and creditors
    /// largest-first, with ties on amount broken by participant name
    /// ascending so the output order never depends on map iteration
    /// order. When a debtor and a creditor exhaust on the same step,
    /// both cursors advance together; this tie-break is part of the
    /// output contract.
    pub fn plan(balances: &BalanceSheet) -> Result<SettlementPlan, SettlementError> {
        // The invariant check runs on the unrounded sheet: per-balance
        // rounding below can shift debtor and creditor totals apart by
        // a cent on fractional splits without the sheet being wrong.
        let residual = balances.total();
        if residual.abs() > EPSILON {
            return Err(SettlementError::Unbalanced { residual });
        }

        // Magnitudes, post-rounding: debtors hold |balance| owed,
        // creditors hold the amount they are owed.
        let mut debtors: Vec<(ParticipantId, Decimal)> = Vec::new();
        let mut creditors: Vec<(ParticipantId, Decimal)> = Vec::new();
        for (participant, balance) in balances.iter() {
            let rounded = balance.round_dp(SETTLEMENT_DP);
            if rounded < -EPSILON {
                debtors.push((participant.clone(), -rounded));
            } else if rounded > EPSILON {
                creditors.push((participant.clone(), rounded));
            }
        }

        // Largest magnitude first; name breaks ties deterministically.
        debtors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        creditors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut payments = Vec::new();
        let mut i = 0;
        let mut j = 0;
        while i < debtors.len() && j < creditors.len() {
            let payment = debtors[i].1.min(creditors[j].1);
            payments.push(Payment {
                from: debtors[i].0.clone(),
                to: creditors[j].0.clone(),
                amount: payment,
            });
            debtors[i].1 -= payment;
            creditors[j].1 -= payment;

            // On simultaneous exhaustion both cursors advance in the
            // same step.
            if debtors[i].1 <= EPSILON {
                i += 1;
            }
            if creditors[j].1 <= EPSILON {
                j += 1;
            }
        }

        Ok(SettlementPlan { payments })
    }
}
