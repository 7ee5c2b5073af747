//! Binary entrypoint for the growlink CLI.
//!
//! Commands:
//! - `start [--port <path>]` - run the ingestion daemon
//! - `init` - create a starter `config.toml`
//! - `status` - print storage statistics as JSON
//! - `probe --port <path> [-b <baud>] [--timeout <s>]` - parse live traffic
//!   for a bounded time and print each record
//!
//! See the library crate docs for module-level details: `growlink::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};

use growlink::config::Config;
use growlink::server::IngestServer;

#[derive(Parser)]
#[command(name = "growlink")]
#[command(about = "Telemetry ingestion daemon for greenhouse sensor controllers")]
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
    /// Start the ingestion daemon
    Start {
        /// Controller serial port (e.g., /dev/ttyUSB0)
        #[arg(short, long)]
        port: Option<String>,
    },
    /// Initialize a new configuration file
    Init,
    /// Show storage statistics
    Status,
    /// Parse live controller traffic for a bounded time and print records
    Probe {
        /// Controller serial port
        #[arg(short, long)]
        port: String,
        /// Baud rate
        #[arg(short = 'b', long, default_value_t = 115200)]
        baud: u32,
        /// Seconds to listen before giving up
        #[arg(short, long, default_value_t = 10)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init, which writes
    // the default file later)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Start { port } => {
            let config = match pre_config {
                Some(c) => c,
                None => Config::load(&cli.config).await?,
            };
            info!("Starting growlink v{}", env!("CARGO_PKG_VERSION"));

            // Capture configured port before moving config into the server
            let configured_port = config.controller.port.clone();
            let require_device = config.controller.require_device_at_startup;
            let mut server = IngestServer::new(config).await?;

            // CLI overrides config; fall back to config when CLI absent
            let chosen_port = match port {
                Some(cli_port) => Some(cli_port),
                None => {
                    if !configured_port.is_empty() {
                        Some(configured_port)
                    } else {
                        None
                    }
                }
            };

            if let Some(port_path) = chosen_port {
                match server.connect_device(&port_path).await {
                    Ok(_) => info!("Connected to controller on {}", port_path),
                    Err(e) if require_device => {
                        return Err(e.context(format!(
                            "Failed to connect to controller on {}",
                            port_path
                        )));
                    }
                    Err(e) => {
                        warn!(
                            "Failed to connect to controller on {}: {} (daemon continuing without device)",
                            port_path, e
                        );
                    }
                }
            } else {
                info!("No --port specified and no configured port set; starting without device.");
            }

            info!("Ingest server starting...");
            server.run().await?;
        }
        Commands::Init => {
            info!("Initializing new configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Status => {
            let config = match pre_config {
                Some(c) => c,
                None => Config::load(&cli.config).await?,
            };
            let server = IngestServer::new(config).await?;
            server.show_status().await?;
        }
        Commands::Probe {
            port,
            baud,
            timeout,
        } => {
            use growlink::controller::ControllerLink;
            use growlink::protocol::FrameParser;
            use tokio::time::{Duration, Instant};

            let mut link = ControllerLink::open(&port, baud).await?;
            info!("Probing {} @ {} baud for {}s", port, baud, timeout);
            let mut parser = FrameParser::new();
            let mut buf = [0u8; 256];
            let deadline = Instant::now() + Duration::from_secs(timeout);
            let mut parsed = 0u64;
            while Instant::now() < deadline {
                let n = link.read_chunk(&mut buf).await?;
                for record in parser.feed_bytes(&buf[..n]) {
                    parsed += 1;
                    println!("{}", serde_json::to_string(&record)?);
                }
            }
            let m = growlink::metrics::snapshot();
            info!(
                "Probe finished: {} records, {} rejected frames, {} noise bytes",
                parsed, m.frames_rejected, m.resync_dropped
            );
            std::process::exit(if parsed > 0 { 0 } else { 1 });
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Some(file) = config.as_ref().and_then(|c| c.logging.file.clone()) {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            let write_mutex = mutex.clone();

            // If stdout is a terminal, echo to the console as well as the file
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
                writeln!(
                    fmt,
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                )
            });
        }
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
