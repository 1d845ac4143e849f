//! Quote value object and the errors raised while building one

use thiserror::Error;

/// Failures the user should see as a plain `Error: ...`.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Failed to fetch fast info: {0}")]
    FastInfo(String),
    #[error("Missing price/previous close (invalid symbol or data unavailable)")]
    MissingPrice,
}

/// Everything that can go wrong while fetching a quote.
///
/// Only [`FetchError::Quote`] is an expected, domain-level failure. The other
/// variants describe data the provider should never return and are reported as
/// unexpected.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error("{field} for {symbol} is not a finite number: {value}")]
    NonFinite {
        symbol: String,
        field: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: String,
}

impl Quote {
    /// Builds a quote from a price snapshot.
    ///
    /// `symbol` is uppercased. A missing or empty `name` falls back to the
    /// uppercased symbol. `change_percent` is `0.0` when `previous_close` is zero.
    pub fn from_snapshot(
        symbol: &str,
        name: Option<String>,
        price: f64,
        previous_close: f64,
        currency: String,
    ) -> Result<Self, FetchError> {
        let symbol = symbol.to_uppercase();
        ensure_finite(&symbol, "price", price)?;
        ensure_finite(&symbol, "previous close", previous_close)?;

        let change = price - previous_close;
        let change_percent = if previous_close != 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };
        ensure_finite(&symbol, "change", change)?;
        ensure_finite(&symbol, "change percent", change_percent)?;

        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| symbol.clone());

        Ok(Quote {
            name,
            symbol,
            price,
            change,
            change_percent,
            currency,
        })
    }
}

fn ensure_finite(symbol: &str, field: &'static str, value: f64) -> Result<(), FetchError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FetchError::NonFinite {
            symbol: symbol.to_string(),
            field,
            value,
        })
    }
}
