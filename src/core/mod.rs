//! Core business logic abstractions

pub mod config;
pub mod fetch;
pub mod format;
pub mod log;
pub mod provider;
pub mod quote;

// Re-export main types for cleaner imports
pub use fetch::fetch_quote;
pub use format::format_quote;
pub use provider::{FastQuote, InfoMap, QuoteProvider};
pub use quote::{FetchError, Quote, QuoteError};
