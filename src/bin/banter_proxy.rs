//! Completion proxy server binary.

use banter::proxy::{self, ProxyConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,banter=debug")),
        )
        .init();

    let config = ProxyConfig::from_env()?;
    proxy::serve(config).await
}
