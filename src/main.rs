//! Binary entrypoint for the Soulkeeper service.
//!
//! Commands:
//! - `start` - load the ledger and run the console host on stdin until `quit` or Ctrl-C
//! - `init` - create a starter `config.toml` and an empty souls document
//! - `status` - print player count and per-category totals from the souls document
//!
//! See the library crate docs for module-level details: `soulkeeper::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use soulkeeper::config::Config;
use soulkeeper::server::SoulServer;
use soulkeeper::souls::LedgerStore;
use soulkeeper::storage::read_document;

#[derive(Parser)]
#[command(name = "soulkeeper")]
#[command(about = "Per-player soul ledger and redemption commands for game servers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the service, reading game events and commands from stdin
    Start,
    /// Write a default configuration and an empty souls document
    Init,
    /// Show ledger statistics from the persisted souls document
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            info!("Starting Soulkeeper v{}", env!("CARGO_PKG_VERSION"));
            let mut server = SoulServer::new(config).await?;
            server.run().await?;
        }
        Commands::Init => {
            init_logging(&None, cli.verbose);
            info!("Initializing new Soulkeeper configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);

            let cfg = Config::default();
            let path = cfg.storage.souls_path();
            let doc = read_document(&path)?;
            info!(
                "Souls document ready at {} ({} player(s))",
                path.display(),
                doc.players.len()
            );
        }
        Commands::Status => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            let path = config.storage.souls_path();
            let doc = read_document(&path)?;
            let mut store = LedgerStore::new();
            let report = store.load_all(&doc);
            println!("Server: {}", config.server.name);
            println!("Souls file: {}", path.display());
            println!(
                "Players: {} ({} malformed record(s) skipped)",
                report.loaded, report.skipped
            );
            for (category, total) in store.category_totals() {
                println!("  {}: {}", category, total);
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
        // Foreground runs also echo to the terminal; piped runs keep stdout for game output
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = write_mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
