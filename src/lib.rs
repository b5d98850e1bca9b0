//! # settlement-engine
//!
//! Multi-currency expense splitting and debt settlement engine.
//!
//! Given a fixed group of participants and a sequence of shared expenses
//! paid in possibly different currencies, this engine normalizes every
//! expense into a single settlement currency and computes a minimal set
//! of peer-to-peer payments that returns every participant's net balance
//! to zero.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, currencies, expenses, ledger
//! - **settlement** — Greedy debtor/creditor matching into a payment plan
//! - **rates** — Exchange rate source interface and payload parsing
//! - **simulation** — Random scenario generation for testing

pub mod core;
pub mod rates;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{CurrencyCode, RateTable};
    pub use crate::core::expense::Expense;
    pub use crate::core::ledger::{BalanceSheet, ExpenseLedger};
    pub use crate::core::participant::{Group, ParticipantId};
    pub use crate::rates::source::{RateSource, StaticRateSource};
    pub use crate::settlement::planner::{Payment, SettlementPlan, SettlementPlanner};
}
