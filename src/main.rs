use chat_gateway::config::config_search_paths;
use chat_gateway::{build_router, exchange_layer, open_exchange_log, AppState, GatewayConfig};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[derive(Parser)]
#[command(
    name = "chat-gateway",
    about = "OpenAI-shaped chat completions gateway in front of Azure OpenAI and Anthropic",
    version
)]
struct Cli {
    /// Path to config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Exact path routed to Anthropic (overrides config)
    #[arg(long)]
    anthropic_path: Option<String>,

    /// Exchange log file path
    #[arg(long, default_value = "chat-gateway.log")]
    log_file: PathBuf,

    /// Print config search paths and exit
    #[arg(long)]
    show_config_paths: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let exchange_log = open_exchange_log(&cli.log_file)?;

    // RUST_LOG only filters the console; exchange records always reach the file.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_gateway=info,tower_http=info".into()),
        ))
        .with(exchange_layer(exchange_log))
        .init();

    if cli.show_config_paths {
        println!("Config search paths:");
        for (i, path) in config_search_paths().iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
        return Ok(());
    }

    let mut config = GatewayConfig::find_and_load(cli.config.as_deref())?.with_env_overrides();

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(path) = cli.anthropic_path {
        config.anthropic_path = path;
    }

    for name in config.missing_azure_settings() {
        warn!("{} is not set; requests routed to Azure will fail", name);
    }

    info!("chat-gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("  Anthropic: {} -> {}", config.anthropic_path, config.anthropic_url());
    info!("  Azure:     * -> {}", config.azure_url());
    info!("  Port:      {}", config.port);
    info!("  Log file:  {}", cli.log_file.display());

    let mut client = reqwest::Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        client = client.timeout(std::time::Duration::from_secs(secs));
    }
    let client = client.build()?;

    let state = Arc::new(AppState {
        config: config.clone(),
        client,
    });

    let app = build_router(state);
    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
