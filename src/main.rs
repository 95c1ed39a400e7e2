use anyhow::Context;
use catalog_chat::{
    config::{get_config, initialize_config},
    logging::init_logging,
    ui::run_ui,
};
use log::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    initialize_config().context("Failed to load configuration")?;
    let config = get_config();

    let _logger = init_logging(&config).context("Failed to start logging")?;
    info!("Starting catalog-chat against {}", config.endpoint);

    run_ui(&config).await.context("Terminal UI failed")?;
    Ok(())
}
