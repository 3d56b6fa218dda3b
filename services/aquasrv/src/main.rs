mod config;
mod error;
mod model;
mod poller;
mod storage;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[clap(short, long, value_parser, default_value = "aquasrv.toml")]
    config: PathBuf,
}

#[cfg(target_os = "linux")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use crate::config::Config;
    use crate::poller::Poller;
    use crate::storage::SensorStore;
    use reef_bus::EzoDriver;
    use tracing::info;

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    reef_common::init_logging(&config.log_config())?;

    info!("Starting aquarium acquisition service");

    let store = SensorStore::connect(&config.database, config.aquarium_id).await?;

    let bus = config.bus.clone();
    let driver = tokio::task::spawn_blocking(move || {
        EzoDriver::open(bus.index, bus.default_address).map(|d| d.with_tuning(bus.tuning))
    })
    .await??;
    info!(
        "bus {} open, default addr {}",
        config.bus.index, config.bus.default_address
    );

    Poller::new(driver, store, &config).run().await?;

    info!("service stopped");
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn main() -> anyhow::Result<()> {
    let _ = Args::parse();
    anyhow::bail!("aquasrv drives a Linux i2c-dev bus and only runs on Linux");
}
