//! # Slash CLI Library
//!
//! Command-line harness around `slash-core`: argument parsing, config,
//! logging and output.
//!
//! ## Module Organization
//! ```text
//! slash_cli/
//! ├── lib.rs          ◄─── You are here (parsing, tracing, dispatch)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Live checkout session
//! │   └── config.rs   ◄─── Configuration state
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── checkout.rs ◄─── quote / validate / pay / session
//! │   └── spin.rs     ◄─── Spin wheel
//! └── error.rs        ◄─── Error type for commands
//! ```
//!
//! ## Output
//! Results go to stdout (JSON or a bill summary); logs go to stderr so
//! `session` output stays machine-readable.

pub mod commands;
pub mod error;
pub mod state;

use std::io::{self, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use slash_core::{CheckoutSession, Money, Rate};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{checkout, spin, PayArgs, QuoteArgs, SessionArgs, SpinArgs, ValidateArgs};
use error::CliError;
use state::{ConfigState, SessionState};

#[derive(Debug, Parser)]
#[command(
    name = "slash",
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[arg(long, global = true, help = "(Optional) Convenience fee percentage, overrides SLASH_TAX_RATE")]
    pub tax_rate: Option<String>,

    #[arg(long, global = true, help = "(Optional) Cashback cap percentage, overrides SLASH_CASHBACK_CAP")]
    pub cashback_cap: Option<String>,

    #[arg(long, global = true, help = "(Optional) Maximum bill in rupees, overrides SLASH_MAX_BILL")]
    pub max_bill: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate totals for one bill
    Quote(QuoteArgs),
    /// Check a bill amount the way the bill field does
    Validate(ValidateArgs),
    /// Quote a bill and print the UPI payment link
    Pay(PayArgs),
    /// Read pay-screen events as JSON lines from stdin
    Session(SessionArgs),
    /// Play one spin of a campaign wheel
    Spin(SpinArgs),
}

/// Runs the CLI.
///
/// ## Startup Sequence
/// 1. Initialize tracing
/// 2. Parse arguments
/// 3. Load `SLASH_*` config, then apply flag overrides
/// 4. Dispatch the subcommand
pub fn run() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = apply_overrides(ConfigState::from_env(), &cli)?;
    info!(
        tax_rate = %config.tax_rate,
        cashback_cap = %config.cashback_cap,
        max_bill = %config.max_bill_amount,
        "Configuration loaded"
    );

    dispatch(&config, &cli.command)
}

fn dispatch(config: &ConfigState, command: &Command) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Quote(args) => {
            let session = checkout::quote(config, args)?;
            if args.json {
                print_json(&mut out, &checkout::QuoteReport::new(&session))?;
            } else {
                writeln!(out, "{}", checkout::render_summary(&session))?;
            }
        }
        Command::Validate(args) => {
            let report = checkout::validate(config, args)?;
            match &report.message {
                Some(message) => writeln!(out, "{}", message)?,
                None => writeln!(out, "ok")?,
            }
        }
        Command::Pay(args) => {
            let report = checkout::pay(config, args)?;
            print_json(&mut out, &report)?;
        }
        Command::Session(args) => {
            let store = args.store.policy()?;
            let wallet = Money::parse(&args.wallet).map_err(CliError::from)?;
            let state = SessionState::new(CheckoutSession::new(
                store,
                config.checkout_policy()?,
                wallet,
            ));
            info!(session = %state.id(), "Session started");

            let stdin = io::stdin();
            checkout::run_session(&state, stdin.lock(), &mut out)?;
        }
        Command::Spin(args) => {
            let result = spin::run_spin(args, chrono::Utc::now())?;
            print_json(&mut out, &result)?;
        }
    }

    Ok(())
}

fn print_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}

/// Applies command-line overrides on top of the environment config.
///
/// Unlike environment values, a bad flag is an error.
pub fn apply_overrides(mut config: ConfigState, cli: &Cli) -> Result<ConfigState, CliError> {
    if let Some(raw) = &cli.tax_rate {
        config.tax_rate = Rate::parse_percent("tax rate", raw)?;
    }
    if let Some(raw) = &cli.cashback_cap {
        config.cashback_cap = Rate::parse_percent("cashback cap", raw)?;
    }
    if let Some(raw) = &cli.max_bill {
        config.max_bill_amount = Money::parse(raw)?;
    }
    config.checkout_policy()?;
    Ok(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=slash=trace` - Show trace for slash crates only
/// - Default: INFO, DEBUG for slash crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,slash=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
