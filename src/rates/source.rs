use crate::core::currency::{CurrencyCode, RateTable};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors arising from rate acquisition.
///
/// Callers treat every variant identically: abort session setup and
/// surface the failure. The engine never proceeds with a partial or
/// stale table, since every conversion in the run depends on it.
#[derive(Debug, Error)]
pub enum RateSourceError {
    #[error("rate source unavailable: {0}")]
    Unavailable(String),
    #[error("rate source does not support base currency {code}")]
    UnsupportedBaseCurrency { code: CurrencyCode },
    #[error("malformed rate payload: {0}")]
    MalformedPayload(String),
}

/// A provider of exchange rate snapshots.
///
/// The engine requires exactly one fetch per session, before any
/// expense is recorded. Transport concerns (HTTP, timeouts, retries,
/// caching) belong to the implementor, not the engine; from the
/// engine's point of view the fetch either yields a complete
/// [`RateTable`] or the session does not start.
pub trait RateSource {
    fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateTable, RateSourceError>;
}

/// An in-memory rate source backed by a fixed table.
///
/// Useful for tests and for hosts that obtain rates out of band.
///
/// # Examples
///
/// ```
/// use settlement_engine::core::currency::{CurrencyCode, RateTable};
/// use settlement_engine::rates::source::{RateSource, StaticRateSource};
/// use rust_decimal_macros::dec;
///
/// let table = RateTable::new(CurrencyCode::new("USD"))
///     .with_rate(CurrencyCode::new("EUR"), dec!(0.90))
///     .unwrap();
/// let source = StaticRateSource::new(table);
///
/// let rates = source.fetch_rates(&CurrencyCode::new("USD")).unwrap();
/// assert!(rates.supports(&CurrencyCode::new("EUR")));
///
/// let err = source.fetch_rates(&CurrencyCode::new("JPY"));
/// assert!(err.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StaticRateSource {
    table: RateTable,
}

impl StaticRateSource {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }
}

impl RateSource for StaticRateSource {
    fn fetch_rates(&self, base: &CurrencyCode) -> Result<RateTable, RateSourceError> {
        if base != self.table.base_currency() {
            return Err(RateSourceError::UnsupportedBaseCurrency { code: base.clone() });
        }
        Ok(self.table.clone())
    }
}

/// Wire format of the upstream exchange rate API response.
///
/// Matches the `latest/<BASE>` endpoint shape: a `result` marker,
/// the echoed base code, and a map of conversion rates expressed as
/// units of each currency per one unit of base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePayload {
    pub result: String,
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub base_code: Option<String>,
    #[serde(default)]
    pub conversion_rates: HashMap<String, Decimal>,
}

impl RatePayload {
    /// Parse a raw JSON payload.
    pub fn from_json(json: &str) -> Result<Self, RateSourceError> {
        serde_json::from_str(json).map_err(|e| RateSourceError::MalformedPayload(e.to_string()))
    }

    /// Validate the payload and build a rate table for `base`.
    ///
    /// A non-success `result` is mapped to
    /// [`RateSourceError::UnsupportedBaseCurrency`] when the upstream
    /// error type names an unsupported code, and to
    /// [`RateSourceError::Unavailable`] otherwise. A success payload
    /// whose base code disagrees with the request, or that carries a
    /// non-positive rate, is malformed.
    pub fn into_table(self, base: &CurrencyCode) -> Result<RateTable, RateSourceError> {
        if self.result != "success" {
            if self.error_type.as_deref() == Some("unsupported-code") {
                return Err(RateSourceError::UnsupportedBaseCurrency { code: base.clone() });
            }
            return Err(RateSourceError::Unavailable(format!(
                "upstream result {:?} ({})",
                self.result,
                self.error_type.as_deref().unwrap_or("no error type")
            )));
        }
        if let Some(echoed) = &self.base_code {
            if echoed != base.as_str() {
                return Err(RateSourceError::MalformedPayload(format!(
                    "requested base {} but payload is for {}",
                    base, echoed
                )));
            }
        }
        if self.conversion_rates.is_empty() {
            return Err(RateSourceError::MalformedPayload(
                "payload carries no conversion rates".to_string(),
            ));
        }

        let mut table = RateTable::new(base.clone());
        for (code, rate) in self.conversion_rates {
            table
                .set_rate(CurrencyCode::new(code), rate)
                .map_err(|e| RateSourceError::MalformedPayload(e.to_string()))?;
        }
        Ok(table)
    }
}
