use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_loader::{config::Config, web::WebServer};

#[derive(Parser)]
#[command(name = "m3u-loader")]
#[command(version)]
#[command(about = "Fetches M3U playlists, indexes their entries and serves an HLS player page")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("m3u_loader={},tower_http=trace", cli.log_level)
    } else {
        format!("m3u_loader={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::load_from_file(&cli.config)?;

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }

    if cli.print_config {
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    info!("Starting M3U Loader v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Fetcher: timeout={}, max_body_size={} bytes, max_redirects={}",
        humantime::format_duration(config.fetcher.timeout),
        config.fetcher.max_body_size,
        config.fetcher.max_redirects
    );

    let web_server = WebServer::new(config)?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );
    web_server.serve().await?;

    Ok(())
}
