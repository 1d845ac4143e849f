use tracing::{debug, instrument};

use super::provider::{QuoteProvider, company_name};
use super::quote::{FetchError, Quote, QuoteError};

/// Fetches a quote for `symbol`.
///
/// The fast snapshot decides success or failure. Company metadata is looked up
/// afterwards and only ever affects the display name.
#[instrument(name = "FetchQuote", skip(provider))]
pub async fn fetch_quote(
    provider: &(dyn QuoteProvider + Send + Sync),
    symbol: &str,
) -> Result<Quote, FetchError> {
    let symbol = symbol.trim().to_uppercase();

    let snapshot = provider
        .fast_quote(&symbol)
        .await
        .map_err(|e| QuoteError::FastInfo(format!("{e:#}")))?;
    debug!(?snapshot, "Received fast quote");

    let (Some(price), Some(previous_close)) = (snapshot.last_price, snapshot.previous_close)
    else {
        return Err(QuoteError::MissingPrice.into());
    };
    let currency = snapshot.currency.unwrap_or_default();

    let name = match provider.full_info(&symbol).await {
        Ok(info) => company_name(&info),
        Err(e) => {
            debug!(error = %e, "Company info unavailable, using symbol as name");
            None
        }
    };

    Quote::from_snapshot(&symbol, name, price, previous_close, currency)
}
