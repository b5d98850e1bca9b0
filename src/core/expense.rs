use crate::core::currency::CurrencyCode;
use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shared expense paid by one participant on behalf of the group.
///
/// Records both the original amount in the currency it was paid in and
/// the amount converted into the settlement currency. The conversion is
/// performed once at insertion time against the session's rate snapshot
/// and never recomputed, so the audit trail stays stable even though
/// real-world rates move.
///
/// Expenses are immutable once created and owned by the ledger that
/// created them; the ledger's insertion order is the audit order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier for this expense.
    id: Uuid,
    /// The participant who paid.
    payer: ParticipantId,
    /// The amount as paid. Always positive.
    original_amount: Decimal,
    /// The currency the amount was paid in.
    original_currency: CurrencyCode,
    /// The amount in the settlement currency, fixed at insertion time.
    converted_amount: Decimal,
    /// Optional free-form description ("dinner", "fuel").
    description: Option<String>,
    /// When this expense was recorded.
    created_at: DateTime<Utc>,
}

impl Expense {
    pub(crate) fn new(
        payer: ParticipantId,
        original_amount: Decimal,
        original_currency: CurrencyCode,
        converted_amount: Decimal,
        description: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            payer,
            original_amount,
            original_currency,
            converted_amount,
            description,
            created_at: Utc::now(),
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn original_amount(&self) -> Decimal {
        self.original_amount
    }

    pub fn original_currency(&self) -> &CurrencyCode {
        &self.original_currency
    }

    pub fn converted_amount(&self) -> Decimal {
        self.converted_amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_accessors() {
        let expense = Expense::new(
            ParticipantId::new("alice"),
            dec!(100),
            CurrencyCode::new("EUR"),
            dec!(110.00),
            Some("dinner".to_string()),
        );
        assert_eq!(expense.payer().as_str(), "alice");
        assert_eq!(expense.original_amount(), dec!(100));
        assert_eq!(expense.original_currency().as_str(), "EUR");
        assert_eq!(expense.converted_amount(), dec!(110.00));
        assert_eq!(expense.description(), Some("dinner"));
    }

    #[test]
    fn test_expense_json_shape() {
        let expense = Expense::new(
            ParticipantId::new("bob"),
            dec!(42),
            CurrencyCode::new("USD"),
            dec!(42.00),
            None,
        );
        let json = serde_json::to_string(&expense).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["payer"], "bob");
        assert_eq!(value["original_currency"], "USD");
        assert!(value["description"].is_null());
    }
}
