//! Text rendering of quotes

use chrono::{Local, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use super::quote::Quote;

const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Renders a quote as a three-block summary headed by `timestamp`.
pub fn format_quote(quote: &Quote, timestamp: &str) -> String {
    let sign = if quote.change >= 0.0 { "+" } else { "" };
    let mut output = format!(
        "{timestamp}\n\n{} ({})\n\n{:.2} {sign}{:.2} ({sign}{:.2}%)",
        quote.name, quote.symbol, quote.price, quote.change, quote.change_percent
    );
    if !quote.currency.is_empty() {
        output.push(' ');
        output.push_str(&quote.currency);
    }
    output
}

/// Current time, e.g. `Tue Oct 13 09:30:00 EDT 2026`.
///
/// Without a named zone the system local time is used, whose zone renders as a
/// numeric offset.
pub fn now_str(tz: Option<Tz>) -> String {
    match tz {
        Some(tz) => Utc::now().with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string(),
        None => Local::now().format(TIMESTAMP_FORMAT).to_string(),
    }
}

/// Resolves the display zone from config, then the `TZ` environment variable,
/// then the system zone. `None` only when none of them names a known zone.
pub fn resolve_timezone(configured: Option<&str>) -> Option<Tz> {
    if let Some(name) = configured {
        return parse_zone(name);
    }
    if let Some(tz) = std::env::var("TZ").ok().and_then(|name| parse_zone(&name)) {
        return Some(tz);
    }
    match iana_time_zone::get_timezone() {
        Ok(name) => parse_zone(&name),
        Err(e) => {
            debug!(error = %e, "System timezone unavailable, using local time");
            None
        }
    }
}

fn parse_zone(name: &str) -> Option<Tz> {
    match name.trim().trim_start_matches(':').parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(e) => {
            warn!(timezone = name, error = %e, "Unknown timezone");
            None
        }
    }
}
