//! Interactive prompt loop: read a symbol, look it up, print the result.

use anyhow::Result;
use chrono_tz::Tz;
use std::future::Future;
use std::io::{BufRead, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::ui;
use crate::core::format::{format_quote, now_str};
use crate::core::{FetchError, QuoteProvider, fetch_quote};

pub const PROMPT: &str = "Please enter a symbol: ";
pub const GOODBYE: &str = "Goodbye!";
pub const EMPTY_SYMBOL_NOTICE: &str = "  (!) Please enter a non-empty symbol.";
const QUIT_WORDS: [&str; 3] = ["q", "quit", "exit"];

#[derive(Debug, Clone, Default)]
pub struct ReplOptions {
    /// Pause after every lookup
    pub pause: Duration,
    /// Zone for the timestamp line; system local time when `None`
    pub timezone: Option<Tz>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Quit,
    Symbol(&'a str),
}

/// Classifies one line of user input.
pub fn parse_input(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Empty
    } else if QUIT_WORDS
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        Input::Quit
    } else {
        Input::Symbol(trimmed)
    }
}

/// Reads stdin on a dedicated thread so a pending read never holds up shutdown.
///
/// The channel closes at end of input or on the first read error.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read from stdin");
                    break;
                }
            }
        }
    });
    rx
}

pub fn print_banner<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(
        out,
        "{}",
        ui::style_text("Stock Quote (Yahoo Finance)", ui::StyleType::Title)
    )?;
    writeln!(out, "Example tickers: AAPL, MSFT, GOOGL, ADBE")?;
    writeln!(out, "Type 'q' to quit.\n")
}

/// Runs the prompt loop until the user quits, input ends, or `interrupt` fires.
///
/// Lookup failures are printed and the loop carries on. Only write errors on
/// `out` end the loop early.
pub async fn run_repl<W, I>(
    provider: &(dyn QuoteProvider + Send + Sync),
    input: &mut mpsc::Receiver<String>,
    out: &mut W,
    options: &ReplOptions,
    interrupt: I,
) -> Result<()>
where
    W: Write,
    I: Future<Output = ()>,
{
    print_banner(out)?;
    tokio::pin!(interrupt);

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            () = &mut interrupt => None,
            line = input.recv() => line,
        };
        let Some(line) = line else {
            writeln!(out, "\n{GOODBYE}")?;
            return Ok(());
        };

        let symbol = match parse_input(&line) {
            Input::Empty => {
                writeln!(
                    out,
                    "{}\n",
                    ui::style_text(EMPTY_SYMBOL_NOTICE, ui::StyleType::Subtle)
                )?;
                continue;
            }
            Input::Quit => {
                writeln!(out, "{GOODBYE}")?;
                return Ok(());
            }
            Input::Symbol(symbol) => symbol,
        };

        lookup(provider, symbol, out, options).await?;
        tokio::time::sleep(options.pause).await;
    }
}

async fn lookup<W: Write>(
    provider: &(dyn QuoteProvider + Send + Sync),
    symbol: &str,
    out: &mut W,
    options: &ReplOptions,
) -> Result<()> {
    let spinner = ui::new_spinner(format!("Fetching {symbol}..."));
    let result = fetch_quote(provider, symbol).await;
    spinner.finish_and_clear();

    match result {
        Ok(quote) => {
            debug!(?quote, "Quote fetched");
            let timestamp = now_str(options.timezone);
            writeln!(out, "\n{}\n", format_quote(&quote, &timestamp))?;
        }
        Err(FetchError::Quote(e)) => {
            debug!(error = %e, "Quote lookup failed");
            let message = format!("Error: {e}");
            writeln!(out, "\n{}\n", ui::style_text(&message, ui::StyleType::Error))?;
        }
        Err(e @ FetchError::NonFinite { .. }) => {
            warn!(error = %e, "Provider returned unusable data");
            let message = format!("Unexpected error: {e}");
            writeln!(out, "\n{}\n", ui::style_text(&message, ui::StyleType::Error))?;
        }
    }
    Ok(())
}
