pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::repl::{ReplOptions, run_repl, spawn_stdin_reader};
use crate::core::config::AppConfig;
use crate::core::format::resolve_timezone;
use crate::providers::YahooFinanceProvider;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Loads configuration, sets up the Yahoo Finance provider and runs the prompt
/// loop on stdin/stdout until the user quits.
pub async fn run(config_path: Option<&str>) -> Result<()> {
    info!("Stock quote starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let yahoo = &config.providers.yahoo;
    let provider = YahooFinanceProvider::new(&yahoo.base_url, &yahoo.user_agent)?
        .with_cookie_url(&yahoo.cookie_url);

    let options = ReplOptions {
        pause: config.pause(),
        timezone: resolve_timezone(config.timezone.as_deref()),
    };

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Unable to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    let mut input = spawn_stdin_reader();
    let mut stdout = std::io::stdout();
    run_repl(&provider, &mut input, &mut stdout, &options, interrupt).await
}
