//! `remote-dispatch` command line.
//!
//! Builds a dispatcher over the bundled order catalog and serves a single
//! call, or lists the registered routes.
//!
//! ```text
//! remote-dispatch routes
//! remote-dispatch call GET /orders/1
//! remote-dispatch call POST /orders -a amount=250 -a status=PAID
//! remote-dispatch call GET /orders/search -a min_amount=1000
//! remote-dispatch --metrics call PUT /orders/2/status -a status=SHIPPED
//! ```

mod catalog;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use remote_dispatch::config::load_or_default;
use remote_dispatch::observability::logging::{init_logging, LogFormat};
use remote_dispatch::observability::metrics;
use remote_dispatch::{build_dispatcher, ArgMap, ResultEnvelope};

use crate::catalog::OrderCatalog;

#[derive(Parser)]
#[command(name = "remote-dispatch")]
#[command(about = "Dispatch calls against the bundled order catalog", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log format override (pretty, json, compact)
    #[arg(long)]
    log_format: Option<LogFormat>,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a single call and print the result
    Call {
        /// HTTP verb (GET, POST, PUT, ...)
        verb: String,
        /// Request path
        path: String,
        /// Argument as key=value; repeatable
        #[arg(short = 'a', long = "arg", value_parser = parse_key_value)]
        args: Vec<(String, String)>,
    },
    /// List registered routes in registration order
    Routes,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got [{}]", raw))
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    let format = cli
        .log_format
        .or_else(|| LogFormat::parse(&config.observability.log_format))
        .unwrap_or_default();
    init_logging(&config.observability, format)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "remote-dispatch starting");

    let prometheus = if cli.metrics && config.observability.metrics_enabled {
        Some(metrics::install_prometheus()?)
    } else {
        None
    };

    let dispatcher = build_dispatcher(&config, &OrderCatalog::seeded())?;

    let code = match cli.command {
        Commands::Routes => {
            for definition in dispatcher.registry().all() {
                println!(
                    "{:<6} {:<24} {}",
                    definition.route().verb_label(),
                    definition.route().path_template(),
                    definition.name()
                );
            }
            ExitCode::SUCCESS
        }
        Commands::Call { verb, path, args } => {
            let args: ArgMap = args.into_iter().collect();
            let body = dispatcher.dispatch(&path, &verb, args);
            println!("{}", body);

            let failed = ResultEnvelope::parse(&body)
                .is_some_and(|envelope| envelope.code == dispatcher.envelope_config().failure_code);
            if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    };

    if let Some(handle) = prometheus {
        eprintln!("{}", handle.render());
    }
    Ok(code)
}
