use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portal::config::Config;
use portal::gateway::Gateway;
use portal::session::Session;
use portal::shell::{self, Cli};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first; only malformed values are fatal
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting portal client v{}", env!("CARGO_PKG_VERSION"));

    let gateway = Gateway::from_config(&config)?;
    info!("API gateway ready ({})", gateway.base_url());

    let session = Session::from_config(&config);

    if let Err(e) = shell::run(cli, &gateway, &session).await {
        error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
