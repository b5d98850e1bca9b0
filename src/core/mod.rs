//! Foundational types: participants, currencies, expenses, and the ledger.

pub mod currency;
pub mod expense;
pub mod ledger;
pub mod participant;
