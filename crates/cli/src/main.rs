//! ServeRest CLI - Fixture data generation and the purchase scenario.
//!
//! # Usage
//!
//! ```bash
//! # Write tests/data/create_user_data.json with MAX_USERS_COUNT users
//! serverest generate users
//!
//! # Write update payloads for 10 products
//! serverest generate products --update --count 10
//!
//! # Run the whole chain against BASE_URI and check out every cart
//! serverest scenario
//!
//! # Same, but cancel the carts and mirror logs into logs/
//! serverest --log-file scenario --cancel
//! ```
//!
//! # Commands
//!
//! - `generate` - Write fixture payloads for users or products
//! - `scenario` - Create users, log in, create products and carts, verify
//!   totals, then close every cart
//!
//! # Environment Variables
//!
//! Read from the process environment or `.env`: `BASE_URI`, the `MAX_*`
//! limits, `FIXTURE_DATA_DIR`, `RUST_LOG`, and `LOG_FORMAT` (`json` switches
//! console output to JSON lines).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::generate::Entity;
use commands::scenario::Close;

/// Directory the `--log-file` mirror is written to.
const LOG_DIR: &str = "logs";

#[derive(Parser)]
#[command(name = "serverest")]
#[command(author, version, about = "ServeRest API test data tools")]
struct Cli {
    /// Also write all log output to `logs/log_<timestamp>.log`
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fixture payloads and write them to the fixture directory
    Generate {
        /// Which entity to generate
        #[arg(value_enum)]
        entity: Entity,

        /// Generate update payloads instead of create payloads
        #[arg(short, long)]
        update: bool,

        /// Number of records (defaults to the configured maximum)
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Run the full purchase flow against the configured service
    Scenario {
        /// Check out every cart (default)
        #[arg(long, conflicts_with = "cancel")]
        checkout: bool,

        /// Cancel every cart, returning its stock to the products
        #[arg(long)]
        cancel: bool,

        /// Leave created users and products in place
        #[arg(long)]
        keep: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_path = match init_tracing(cli.log_file) {
        Ok(path) => path,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Failed to open log file: {e}");
            std::process::exit(1);
        }
    };
    if let Some(path) = log_path {
        tracing::info!(path = %path.display(), "Mirroring logs to file");
    }

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Generate {
            entity,
            update,
            count,
        } => {
            commands::generate::run(entity, update, count)?;
        }
        Commands::Scenario {
            checkout: _,
            cancel,
            keep,
        } => {
            let close = if cancel { Close::Cancel } else { Close::Checkout };
            commands::scenario::run(close, keep).await?;
        }
    }
    Ok(())
}

/// Install the subscriber, optionally mirroring into a timestamped file.
///
/// Returns the path of the mirror file when one was opened.
fn init_tracing(log_file: bool) -> std::io::Result<Option<PathBuf>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "serverest_cli=info,serverest_fixtures=info,serverest_client=info".into());

    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    let (file_layer, path) = if log_file {
        let path = log_file_path();
        fs::create_dir_all(LOG_DIR)?;
        let file = File::create(&path)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file));
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(file_layer)
        .init();

    Ok(path)
}

/// `logs/log_<YYYY-MM-DD_HH-MM-SS>.log` for the current local time.
fn log_file_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    PathBuf::from(LOG_DIR).join(format!("log_{stamp}.log"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_parses_entity_and_flags() {
        let cli = Cli::try_parse_from(["serverest", "generate", "products", "--update", "-c", "4"])
            .unwrap();
        match cli.command {
            Commands::Generate {
                entity,
                update,
                count,
            } => {
                assert_eq!(entity, Entity::Products);
                assert!(update);
                assert_eq!(count, Some(4));
            }
            Commands::Scenario { .. } => panic!("expected generate"),
        }
    }

    #[test]
    fn test_scenario_rejects_checkout_with_cancel() {
        let result = Cli::try_parse_from(["serverest", "scenario", "--checkout", "--cancel"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_file_flag_is_global() {
        let cli = Cli::try_parse_from(["serverest", "scenario", "--log-file"]).unwrap();
        assert!(cli.log_file);
    }

    #[test]
    fn test_log_file_path_is_timestamped() {
        let path = log_file_path();
        assert!(path.starts_with(LOG_DIR));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("log_"));
        assert!(name.ends_with(".log"));
        // log_YYYY-MM-DD_HH-MM-SS.log
        assert_eq!(name.len(), "log_".len() + 19 + ".log".len());
    }
}
