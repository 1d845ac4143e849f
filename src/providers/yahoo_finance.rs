use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::core::config::DEFAULT_YAHOO_COOKIE_URL;
use crate::core::provider::{FastQuote, InfoMap, QuoteProvider};

// QuoteProvider backed by the public Yahoo Finance endpoints
pub struct YahooFinanceProvider {
    base_url: String,
    cookie_url: String,
    client: reqwest::Client,
    // The quote endpoint wants a session cookie plus a matching crumb.
    crumb: OnceCell<String>,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        let parsed = Url::parse(base_url).with_context(|| {
            format!(
                "Invalid Yahoo Finance base URL '{base_url}'. \
                 Set providers.yahoo.base_url in the config file to an http(s) URL"
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!(
                "Unsupported scheme '{}' in Yahoo Finance base URL. \
                 Set providers.yahoo.base_url in the config file to an http(s) URL",
                parsed.scheme()
            );
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()
            .context("Failed to initialize the HTTP client for Yahoo Finance")?;

        Ok(YahooFinanceProvider {
            base_url: base_url.to_string(),
            cookie_url: DEFAULT_YAHOO_COOKIE_URL.to_string(),
            client,
            crumb: OnceCell::new(),
        })
    }

    /// Overrides the page visited to obtain the session cookie.
    pub fn with_cookie_url(mut self, cookie_url: &str) -> Self {
        self.cookie_url = cookie_url.to_string();
        self
    }

    /// Builds `{base_url}/<segments...>`, percent-encoding every segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL cannot carry a path: {}", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Returns the session crumb, fetching it on first use. Failures are not cached.
    async fn crumb(&self) -> Result<&str> {
        let crumb = self
            .crumb
            .get_or_try_init(|| async {
                // Only the Set-Cookie header matters; this page answers 404.
                if let Err(e) = self.client.get(&self.cookie_url).send().await {
                    debug!(error = %e, "Cookie request failed");
                }

                let url = self.endpoint(&["v1", "test", "getcrumb"])?;
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| anyhow!("Request error: {} while fetching crumb", e))?;
                if !response.status().is_success() {
                    return Err(anyhow!(
                        "HTTP error: {} while fetching crumb",
                        response.status()
                    ));
                }

                let crumb = response.text().await?.trim().to_string();
                if crumb.is_empty() {
                    return Err(anyhow!("Empty crumb returned by Yahoo Finance"));
                }
                debug!("Obtained Yahoo Finance crumb");
                Ok::<_, anyhow::Error>(crumb)
            })
            .await?;
        Ok(crumb)
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
    #[serde(rename = "chartPreviousClose")]
    chart_previous_close: Option<f64>,
    currency: Option<String>,
}

#[derive(Deserialize, Debug)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: QuoteResult,
}

#[derive(Deserialize, Debug)]
struct QuoteResult {
    result: Option<Vec<InfoMap>>,
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    #[instrument(name = "YahooFastQuote", skip(self), fields(symbol = %symbol))]
    async fn fast_quote(&self, symbol: &str) -> Result<FastQuote> {
        let mut url = self.endpoint(&["v8", "finance", "chart", symbol])?;
        url.query_pairs_mut()
            .append_pair("interval", "1d")
            .append_pair("range", "1d");
        debug!("Requesting fast quote from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        // Unknown symbols come back as a 404 with a well-formed body and no result,
        // so the body is parsed before the status is looked at.
        let status = response.status();
        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!(
                "Failed to parse chart response for {} (HTTP {}): {}",
                symbol,
                status,
                e
            )
        })?;

        let Some(item) = data.chart.result.and_then(|r| r.into_iter().next()) else {
            debug!(%status, "No chart data for symbol");
            return Ok(FastQuote::default());
        };

        Ok(FastQuote {
            last_price: item.meta.regular_market_price,
            previous_close: item
                .meta
                .previous_close
                .or(item.meta.chart_previous_close),
            currency: item.meta.currency.filter(|c| !c.is_empty()),
        })
    }

    #[instrument(name = "YahooFullInfo", skip(self), fields(symbol = %symbol))]
    async fn full_info(&self, symbol: &str) -> Result<InfoMap> {
        let crumb = self.crumb().await?;
        let mut url = self.endpoint(&["v7", "finance", "quote"])?;
        url.query_pairs_mut()
            .append_pair("symbols", symbol)
            .append_pair("crumb", crumb);
        debug!("Requesting company info from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let data = response
            .json::<YahooQuoteResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse quote response for {}: {}", symbol, e))?;

        data.quote_response
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| anyhow!("No company info found for symbol: {}", symbol))
    }
}
