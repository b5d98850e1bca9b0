use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Number of decimal places carried by amounts in the settlement currency.
pub const SETTLEMENT_DP: u32 = 2;

/// ISO 4217-style currency code.
///
/// Supports standard fiat currencies (USD, EUR, NGN, etc.) as well as
/// arbitrary identifiers for informal settlement units.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(usd, eur);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from currency conversion.
#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("unknown currency {code}: not present in the rate table")]
    UnknownCurrency { code: CurrencyCode },
    #[error("rate for {code} must be positive, got {rate}")]
    InvalidRate { code: CurrencyCode, rate: Decimal },
}

/// Immutable snapshot of exchange rates against a single base currency.
///
/// Each entry maps a currency code to "units of that currency per 1 unit
/// of base". The base currency always maps to exactly 1. The table is
/// fetched once at session start and never refreshed, so every conversion
/// within a run is internally consistent even if real-world rates move.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::currency::{CurrencyCode, RateTable};
/// use rust_decimal_macros::dec;
///
/// let rates = RateTable::new(CurrencyCode::new("USD"))
///     .with_rate(CurrencyCode::new("EUR"), dec!(0.90))
///     .unwrap();
///
/// let converted = rates.convert(
///     dec!(100),
///     &CurrencyCode::new("EUR"),
///     &CurrencyCode::new("USD"),
/// ).unwrap();
/// assert_eq!(converted, dec!(111.11));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    base_currency: CurrencyCode,
    /// currency -> units per 1 unit of base.
    rates: HashMap<CurrencyCode, Decimal>,
}

impl RateTable {
    /// Create a rate table for the given base currency.
    ///
    /// The base currency is seeded with rate 1.
    pub fn new(base_currency: CurrencyCode) -> Self {
        let mut rates = HashMap::new();
        rates.insert(base_currency.clone(), Decimal::ONE);
        Self {
            base_currency,
            rates,
        }
    }

    /// Builder-style variant of [`RateTable::set_rate`].
    pub fn with_rate(mut self, code: CurrencyCode, rate: Decimal) -> Result<Self, CurrencyError> {
        self.set_rate(code, rate)?;
        Ok(self)
    }

    /// Record the rate for a currency: 1 unit of base = `rate` units of `code`.
    pub fn set_rate(&mut self, code: CurrencyCode, rate: Decimal) -> Result<(), CurrencyError> {
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate { code, rate });
        }
        self.rates.insert(code, rate);
        Ok(())
    }

    /// The settlement (base) currency of this table.
    pub fn base_currency(&self) -> &CurrencyCode {
        &self.base_currency
    }

    /// True if the table has a rate for `code`.
    pub fn supports(&self, code: &CurrencyCode) -> bool {
        self.rates.contains_key(code)
    }

    /// All currency codes the table can convert, in sorted order.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Look up the rate for a currency.
    ///
    /// Rates are validated positive on insertion; the check here guards
    /// against a table deserialized from an untrusted payload.
    pub fn rate(&self, code: &CurrencyCode) -> Result<Decimal, CurrencyError> {
        let rate = self
            .rates
            .get(code)
            .copied()
            .ok_or_else(|| CurrencyError::UnknownCurrency { code: code.clone() })?;
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate {
                code: code.clone(),
                rate,
            });
        }
        Ok(rate)
    }

    /// Convert an amount between two currencies in the table.
    ///
    /// When `from == to` the amount is returned rounded to settlement
    /// precision with no rate lookup: the fast path avoids introducing
    /// rounding noise from a divide/multiply pair that cancels out.
    ///
    /// Otherwise the amount is divided by `from`'s rate into the base
    /// currency (a division by 1 when `from` is already the base), then
    /// multiplied by `to`'s rate. The result is rounded to two decimal
    /// places half-to-even; settlement determinism depends on this
    /// rounding mode, so it is part of the contract.
    pub fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, CurrencyError> {
        if from == to {
            if !self.supports(from) {
                return Err(CurrencyError::UnknownCurrency { code: from.clone() });
            }
            return Ok(amount.round_dp(SETTLEMENT_DP));
        }
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        let in_base = amount / from_rate;
        Ok((in_base * to_rate).round_dp(SETTLEMENT_DP))
    }

    /// Convert an amount into the settlement currency.
    pub fn to_base(&self, amount: Decimal, from: &CurrencyCode) -> Result<Decimal, CurrencyError> {
        self.convert(amount, from, &self.base_currency)
    }
}
