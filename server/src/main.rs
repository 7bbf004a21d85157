use clap::Parser;
use mindnote_server::cli::{Args, resolve_config};
use mindnote_server::server::run_server;
use mindnote_server::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment may be set directly.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    init_tracing(&config.observability.logging_level);

    tracing::debug!(config = ?config, "Resolved configuration");
    run_server(config).await?;
    Ok(())
}
