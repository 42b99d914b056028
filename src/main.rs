use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;

use showrunner::config::Config;
use showrunner::logging;
use showrunner::rest::{self, ApiDoc, ApiState};

#[derive(Parser)]
#[command(name = "showrunner")]
#[command(about = "Show progression API for live cooking broadcasts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server (default)
    Serve {
        /// Port to listen on (default: 7010)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (default: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,
    },

    /// Print the OpenAPI document
    Openapi {
        /// Emit YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Openapi { yaml }) => cmd_openapi(yaml),
        Some(Commands::Serve { port, host }) => cmd_serve(config, cli.debug, port, host).await,
        None => cmd_serve(config, cli.debug, None, None).await,
    }
}

async fn cmd_serve(
    mut config: Config,
    debug: bool,
    port: Option<u16>,
    host: Option<String>,
) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }

    let logging_handle = logging::init_logging(&config, debug)?;
    if let Some(path) = &logging_handle.log_file_path {
        eprintln!("Logging to {}", path.display());
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let state = ApiState::from_config(config)?;
    rest::serve(state, addr).await
}

fn cmd_openapi(yaml: bool) -> Result<()> {
    let spec = if yaml {
        ApiDoc::yaml().context("Failed to render OpenAPI YAML")?
    } else {
        ApiDoc::json().context("Failed to render OpenAPI JSON")?
    };
    println!("{}", spec);
    Ok(())
}
