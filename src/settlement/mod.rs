//! Debtor/creditor matching into an ordered payment plan.

pub mod planner;
