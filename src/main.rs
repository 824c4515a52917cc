//! pi-chart - Raspberry Pi Monitoring Server Binary
//!
//! Serves monitoring pages whose templates are filled in from GPIO pins,
//! sensors and system information.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pi_chart::metrics::SYMBOL_FAMILIES;
use pi_chart::{
    render, start_server, SensorSymbols, ServerConfig, ServiceState, DEFAULT_DIRECTORY,
    DEFAULT_PORT,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "pi_chart")]
#[command(about = "Simple Raspberry Pi monitoring tool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = "Serves HTML monitoring pages filled in from GPIO pins, sensors and system information")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 disables serving)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory to read template documents from
    #[arg(short = 'f', long, default_value = DEFAULT_DIRECTORY)]
    directory: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server (default)
    Serve,

    /// Expand one template document and print it
    Render(RenderArgs),

    /// Show version and supported template symbols
    Info,
}

#[derive(Args)]
struct RenderArgs {
    /// Template document to expand
    file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging
    init_logging(&cli)?;

    match &cli.command {
        Some(Commands::Serve) | None => {
            print_banner();
            serve_command(&cli).await?;
        }
        Some(Commands::Render(args)) => {
            render_command(args).await?;
        }
        Some(Commands::Info) => {
            info_command(&cli);
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(log_level(cli), &directives))
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn log_level(cli: &Cli) -> Level {
    if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// `RUST_LOG` style directives win; without any, `level` applies.
fn log_filter(level: Level, directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}

fn print_banner() {
    println!("pi-chart - Raspberry Pi Monitoring");
    println!("   Version: {}", pi_chart::VERSION);
    println!();
}

fn server_config(cli: &Cli) -> ServerConfig {
    ServerConfig::new(&cli.host, cli.port).with_directory(&cli.directory)
}

async fn serve_command(cli: &Cli) -> anyhow::Result<()> {
    let config = server_config(cli);

    info!("Server configuration:");
    info!("  - Bind address: {}", config.bind_address());
    info!("  - Document directory: {}", config.directory.display());
    info!("  - Backlog: {}", config.backlog);

    let state = ServiceState::new();
    let server = start_server(config, state.clone(), SensorSymbols::new()).await;

    println!("Press Ctrl-C to quit...");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down the service");
    state.stop();
    if let Some(server) = server {
        server.abort();
    }

    Ok(())
}

async fn render_command(args: &RenderArgs) -> anyhow::Result<()> {
    let document = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let mut symbols = SensorSymbols::new();
    let page = render(&document, &mut symbols)
        .with_context(|| format!("Failed to expand {}", args.file.display()))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&page)?;
    stdout.flush()?;

    Ok(())
}

fn info_command(cli: &Cli) {
    let config = server_config(cli);

    println!("pi-chart {}", pi_chart::VERSION);
    println!("================================");
    println!();
    println!("Server:");
    println!("  Bind address: {}", config.bind_address());
    println!("  Serving: {}", if config.is_enabled() { "enabled" } else { "disabled" });
    println!("  Document directory: {}", config.directory.display());
    println!();
    println!("Template symbols:");
    for family in SYMBOL_FAMILIES {
        println!("  {}", family);
    }
    println!();
    println!("Features compiled:");
    #[cfg(feature = "gpio")]
    println!("  - GPIO/I2C hardware support: ✓");
    #[cfg(not(feature = "gpio"))]
    println!("  - GPIO/I2C hardware support: ✗ (emulated)");
}
