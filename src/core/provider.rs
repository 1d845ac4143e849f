//! Market data abstractions

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Free-form company metadata as returned by the provider.
pub type InfoMap = Map<String, Value>;

/// Lightweight price snapshot. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FastQuote {
    pub last_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub currency: Option<String>,
}

#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fast_quote(&self, symbol: &str) -> Result<FastQuote>;
    async fn full_info(&self, symbol: &str) -> Result<InfoMap>;
}

/// Picks a display name from company metadata, preferring `longName`.
pub fn company_name(info: &InfoMap) -> Option<String> {
    ["longName", "shortName"]
        .iter()
        .filter_map(|key| info.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info(value: Value) -> InfoMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_prefers_long_name() {
        let map = info(json!({"longName": "Apple Inc.", "shortName": "Apple"}));
        assert_eq!(company_name(&map).as_deref(), Some("Apple Inc."));
    }

    #[test]
    fn test_falls_back_to_short_name() {
        let map = info(json!({"longName": "", "shortName": "Apple"}));
        assert_eq!(company_name(&map).as_deref(), Some("Apple"));

        let map = info(json!({"longName": null, "shortName": "Apple"}));
        assert_eq!(company_name(&map).as_deref(), Some("Apple"));
    }

    #[test]
    fn test_no_name() {
        assert_eq!(company_name(&InfoMap::new()), None);
        assert_eq!(company_name(&info(json!({"shortName": 42}))), None);
    }
}
