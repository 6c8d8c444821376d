//! # Kasir Register Library
//!
//! Terminal register for Kasir POS. Startup and the stdin command loop live
//! here so `main.rs` stays a one-liner and everything is testable.
//!
//! ## Module Organization
//! ```text
//! kasir_register/
//! ├── lib.rs          ◄─── You are here (startup & logging)
//! ├── config.rs       ◄─── RegisterConfig (defaults → TOML → env)
//! ├── command.rs      ◄─── Line parsing into Command
//! ├── register.rs     ◄─── Register: catalog + owned checkout session
//! └── error.rs        ◄─── RegisterError
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Register Startup                                  │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter, written to stderr             │
//! │     • Default: info,kasir=debug; override with RUST_LOG                 │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • --config <path>, else register.toml in the platform config dir    │
//! │     • KASIR_* environment overrides                                     │
//! │                                                                         │
//! │  3. Load Catalog ─────────────────────────────────────────────────────► │
//! │     • --catalog <path>, else catalog_path from config                   │
//! │     • Backend JSON mapped and validated into Products                   │
//! │                                                                         │
//! │  4. Command Loop ─────────────────────────────────────────────────────► │
//! │     • One command per stdin line until quit / EOF                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod register;

use kasir_core::Catalog;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::RegisterConfig;
use error::{RegisterError, RegisterResult};
use register::Register;

const USAGE: &str = "\
Kasir POS register

Usage: kasir-register [OPTIONS]

Options:
  --catalog, -p <path>   Product catalog JSON (array or {\"data\": [...]})
  --config, -c <path>    Config file (default: register.toml in the config dir)
  --help, -h             Show this help";

/// Command-line arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub catalog: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub help: bool,
}

impl CliArgs {
    /// Parses arguments, excluding the program name.
    pub fn parse<I, S>(args: I) -> RegisterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut cli = CliArgs::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--catalog" | "-p" => {
                    cli.catalog = Some(PathBuf::from(option_value(&args, i)?));
                    i += 1;
                }
                "--config" | "-c" => {
                    cli.config = Some(PathBuf::from(option_value(&args, i)?));
                    i += 1;
                }
                "--help" | "-h" => {
                    cli.help = true;
                }
                other => {
                    return Err(RegisterError::command(format!(
                        "unexpected argument '{}'",
                        other
                    )));
                }
            }
            i += 1;
        }

        Ok(cli)
    }
}

fn option_value(args: &[String], i: usize) -> RegisterResult<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| RegisterError::command(format!("{} needs a value", args[i])))
}

/// Runs the register against stdin/stdout.
pub fn run() -> RegisterResult<()> {
    let cli = CliArgs::parse(std::env::args().skip(1))?;
    if cli.help {
        println!("{}", USAGE);
        return Ok(());
    }

    init_tracing();
    info!("Starting Kasir register");

    let config = RegisterConfig::load(cli.config)?;
    let catalog = match cli.catalog.as_deref().or(config.catalog_path.as_deref()) {
        Some(path) => load_catalog(path)?,
        None => {
            warn!("No catalog configured; starting with an empty catalog");
            Catalog::default()
        }
    };

    let mut register = Register::new(config, catalog);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    register.run(stdin.lock(), &mut stdout.lock())?;

    info!("Register closed");
    Ok(())
}

/// Reads a catalog file exported from the backend.
pub fn load_catalog(path: &Path) -> RegisterResult<Catalog> {
    let payload = std::fs::read_to_string(path)?;
    let catalog = Catalog::from_json_str(&payload)?;
    info!(?path, products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kasir=trace` - Show trace for kasir crates only
/// - Default: `info,kasir=debug`
///
/// Logs go to stderr; stdout belongs to the register.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kasir=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
