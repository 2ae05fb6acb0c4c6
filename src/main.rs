use anyhow::{Context, Result};
use swsh_executor::channel::BotbaseChannel;
use swsh_executor::config::{validate_config, ConfigLoader};
use swsh_executor::executor::DeviceExecutor;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = ConfigLoader::new(&config_path).load_or_default();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(false)
        .init();

    info!("starting swsh-executor v{}", env!("CARGO_PKG_VERSION"));
    validate_config(&config).context("configuration is not usable")?;

    let channel = BotbaseChannel::connect(&config.connection.host, config.connection.port)
        .await
        .with_context(|| {
            format!(
                "could not reach the debug channel at {}:{}",
                config.connection.host, config.connection.port
            )
        })?;
    info!("connected to {}", channel.peer());

    let executor = DeviceExecutor::new(channel, config);
    executor.initialize_hardware().await?;

    // Session check: a failure here needs the operator, not a retry.
    let session = executor
        .identify_trainer()
        .await
        .context("console is not ready for automation")?;
    info!(
        "console ready: {} ({:06}) on {:?}",
        session.trainer.name(),
        session.trainer.display_id(),
        session.variant
    );

    info!("session verified; press Ctrl+C to exit");
    tokio::signal::ctrl_c().await?;

    executor.clean_exit().await?;
    info!("shut down cleanly");
    Ok(())
}
