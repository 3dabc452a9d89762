//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Bag printing price quotes
#[derive(Debug, Parser)]
#[command(name = "bagquote", about = "Bag printing price quotes", long_about = None)]
pub struct Config {
    /// Directory holding `rules/` and `products/` fixture sets
    #[arg(long, env = "BAGQUOTE_FIXTURES", default_value = "./fixtures", global = true)]
    pub fixtures: PathBuf,

    /// Fixture set to load
    #[arg(short, long, env = "BAGQUOTE_SET", default_value = "default", global = true)]
    pub set: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Seconds a fetched rule snapshot is reused before it is read again
    #[arg(
        long,
        env = "BAGQUOTE_CACHE_TTL_SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(i64).range(1..),
        global = true
    )]
    pub cache_ttl_secs: i64,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quote one order line
    Quote(QuoteArgs),

    /// Quote a product at every quantity band
    Ladder(LadderArgs),

    /// Report overlapping and missing tiers
    Check(CheckArgs),

    /// Read `QUANTITY [COLORS]` lines from stdin and quote each
    Interactive(InteractiveArgs),
}

/// Arguments for `quote`
#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Product key from the products fixture
    pub product: String,

    /// Order quantity; values below 1 are raised to 1
    #[arg(short, long, default_value = "1", value_parser = parse_quantity)]
    pub quantity: u32,

    /// Print colors; omit for an unprinted order
    #[arg(short, long)]
    pub colors: Option<u32>,

    /// Product size
    #[arg(long)]
    pub size: Option<String>,
}

/// Arguments for `ladder`
#[derive(Debug, Args)]
pub struct LadderArgs {
    /// Product key from the products fixture
    pub product: String,

    /// Print colors; omit for unprinted prices
    #[arg(short, long)]
    pub colors: Option<u32>,
}

/// Arguments for `check`
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Highest quantity that must be covered
    #[arg(long, default_value_t = 9999)]
    pub upto: u32,
}

/// Arguments for `interactive`
#[derive(Debug, Args)]
pub struct InteractiveArgs {
    /// Product key from the products fixture
    pub product: String,

    /// Product size
    #[arg(long)]
    pub size: Option<String>,
}

/// Parse a user-entered quantity, raising anything below 1 to 1.
///
/// # Errors
///
/// Returns an error if `s` is not a whole number.
pub fn parse_quantity(s: &str) -> Result<u32, String> {
    let value: i64 = s
        .trim()
        .parse()
        .map_err(|error| format!("invalid quantity {s:?}: {error}"))?;

    Ok(u32::try_from(value.max(1)).unwrap_or(u32::MAX))
}
