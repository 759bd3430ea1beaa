use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use user_registry::load_config;

#[derive(Parser)]
#[command(name = "user-registry")]
#[command(about = "In-memory user registry HTTP service")]
struct Cli {
    /// Path to a JSON config file (overrides the default lookup)
    #[arg(short, long, env = "USER_REGISTRY_CONFIG")]
    config: Option<PathBuf>,
    /// Bind address, e.g. 0.0.0.0:5000
    #[arg(long, env = "USER_REGISTRY_BIND")]
    bind: Option<String>,
    /// Delay before /servicio_no_disponible answers, in milliseconds
    #[arg(long)]
    unavailable_delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config)?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(delay) = cli.unavailable_delay_ms {
        config.unavailable_delay_ms = delay;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting user registry on {} (unavailable delay {}ms)",
        config.bind, config.unavailable_delay_ms
    );

    user_registry::server::start_http(config).await
}
