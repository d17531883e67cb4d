use clap::Parser;

use herald::{Args, LogFormat, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Args::parse().into_config();
    init_logging(LogFormat::for_debug(config.debug));
    tracing::info!(?config, "starting relay service");

    herald::run(config).await
}
