//! mpdbd: the MPDB daemon binary

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use mpdb_core::Result;
use mpdb_engine::Engine;
use mpdb_executor::Executor;
use mpdb_server::{Server, ServerConfig, CONFIG_FILE_NAME};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mpdbd")]
#[command(about = "MPDB document store daemon (line-delimited JSON over TCP)")]
#[command(version)]
struct Args {
    /// Config file (default: ./mpdb.toml when present; created if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind to
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Snapshot file
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Keep data in memory only, no snapshot file
    #[arg(long)]
    ephemeral: bool,
}

fn load_config(args: &Args) -> Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            ServerConfig::write_default_if_missing(path)?;
            ServerConfig::from_file(path)?
        }
        None if Path::new(CONFIG_FILE_NAME).exists() => {
            ServerConfig::from_file(Path::new(CONFIG_FILE_NAME))?
        }
        None => ServerConfig::default(),
    };

    if let Some(bind) = &args.bind {
        config.bind = bind.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(data_file) = &args.data_file {
        config.data_file = data_file.clone();
    }
    if args.ephemeral {
        config.ephemeral = true;
    }
    Ok(config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);

    let engine = if config.ephemeral {
        warn!("Ephemeral mode, data will be lost on shutdown");
        Engine::cache()
    } else {
        info!(path = %config.data_file.display(), "Persistence enabled");
        Engine::open(&config.data_file)
    };

    let addr = config.listen_addr();
    let server = match Server::bind(&addr, Executor::new(engine), config.max_connections).await {
        Ok(server) => server,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!(
        %addr,
        max_connections = config.max_connections,
        "MPDB daemon started"
    );

    match server.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}
