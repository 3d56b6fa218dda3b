//! Discovery, identification and periodic acquisition
//!
//! The bus driver is shared behind one coarse lock; every transaction
//! (select address + write/read) happens whole under it, on a blocking
//! thread so the settle sleeps stay off the runtime.

use crate::config::Config;
use crate::error::{AquasrvError, Result};
use crate::model::{device_type, SensorKind, SensorReading};
use crate::storage::SensorStore;
use parking_lot::Mutex;
use reef_bus::{BusChannel, EzoDriver, EzoResponse};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Periodic acquisition loop over one bus driver
pub struct Poller<C> {
    driver: Arc<Mutex<EzoDriver<C>>>,
    store: SensorStore,
    interval: Duration,
    sensors: HashMap<SensorKind, u16>,
}

impl<C> Poller<C>
where
    C: BusChannel + Send + 'static,
{
    pub fn new(driver: EzoDriver<C>, store: SensorStore, config: &Config) -> Self {
        Self {
            driver: Arc::new(Mutex::new(driver)),
            store,
            interval: Duration::from_secs(config.poll.interval_secs),
            sensors: HashMap::new(),
        }
    }

    /// Sweep the bus, identify each present device with `I`, and keep the
    /// addresses of supported sensor types. Devices that cannot be
    /// identified are logged and skipped.
    pub async fn discover(&mut self) -> Result<()> {
        let driver = Arc::clone(&self.driver);
        let devices =
            tokio::task::spawn_blocking(move || driver.lock().list_devices()).await??;
        info!("bus sweep found {} devices", devices.len());

        for addr in devices {
            match self.transact(addr, "I".to_string()).await {
                Ok(EzoResponse::Reading(reply)) => {
                    match device_type(&reply).and_then(SensorKind::from_device_type) {
                        Some(kind) => {
                            info!("addr {} is a {} sensor", addr, kind);
                            self.sensors.insert(kind, addr);
                        }
                        None => debug!("addr {} unsupported device: {:?}", addr, reply),
                    }
                }
                Ok(other) => warn!("addr {} identification failed: {}", addr, other),
                Err(e) => warn!("addr {} identification failed: {}", addr, e),
            }
        }
        Ok(())
    }

    /// Run until ctrl-c. A bus without a temperature sensor ends the run
    /// immediately; pH compensation depends on it and there is nothing
    /// else to poll.
    pub async fn run(mut self) -> Result<()> {
        self.discover().await?;

        let Some(&rtd_addr) = self.sensors.get(&SensorKind::Rtd) else {
            warn!("no temperature sensor on the bus; nothing to poll");
            return Ok(());
        };
        let ph_addr = self.sensors.get(&SensorKind::Ph).copied();
        if ph_addr.is_none() {
            warn!("no pH sensor on the bus; polling temperature only");
        }

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("stop requested; shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.cycle(rtd_addr, ph_addr).await {
                        error!("acquisition cycle failed: {}", e);
                    }
                }
            }
        }

        if let Ok(mutex) = Arc::try_unwrap(self.driver) {
            mutex.into_inner().close();
        }
        Ok(())
    }

    /// One acquisition cycle: temperature first, then compensated pH
    async fn cycle(&self, rtd_addr: u16, ph_addr: Option<u16>) -> Result<()> {
        if let Err(e) = self.store.ping().await {
            warn!("database connection check failed: {}", e);
        }

        let temperature = match self.transact(rtd_addr, "R".to_string()).await? {
            EzoResponse::Reading(text) => parse_value(&text)?,
            other => {
                warn!("temperature reading failed: {}", other);
                return Ok(());
            }
        };
        self.store
            .insert_reading(&SensorReading {
                kind: SensorKind::Rtd,
                address: rtd_addr,
                value: temperature,
            })
            .await?;

        let Some(ph_addr) = ph_addr else {
            return Ok(());
        };
        match self.transact(ph_addr, format!("RT,{}", temperature)).await? {
            EzoResponse::Reading(text) => {
                let ph = parse_value(&text)?;
                self.store
                    .insert_reading(&SensorReading {
                        kind: SensorKind::Ph,
                        address: ph_addr,
                        value: ph,
                    })
                    .await?;
            }
            other => warn!("pH reading failed: {}", other),
        }
        Ok(())
    }

    /// One driver transaction under the coarse bus lock, off the runtime
    async fn transact(&self, addr: u16, command: String) -> Result<EzoResponse> {
        let driver = Arc::clone(&self.driver);
        let response = tokio::task::spawn_blocking(move || {
            let mut driver = driver.lock();
            driver.set_target_address(addr)?;
            driver.query(&command)
        })
        .await??;
        Ok(response)
    }
}

/// Parse a numeric reading payload
fn parse_value(text: &str) -> Result<f64> {
    text.trim()
        .parse()
        .map_err(|_| AquasrvError::Sensor(format!("unparseable reading: {:?}", text)))
}
