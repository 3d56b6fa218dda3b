//! MySQL persistence for sensor readings

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::model::SensorReading;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, info};

/// Handle over the shared connection pool
#[derive(Clone)]
pub struct SensorStore {
    pool: MySqlPool,
    aquarium_id: i64,
}

impl SensorStore {
    /// Connect the pool
    pub async fn connect(config: &DatabaseConfig, aquarium_id: i64) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        info!("database connected, aquarium {}", aquarium_id);
        Ok(Self { pool, aquarium_id })
    }

    /// Cheap liveness check. Not retried here; recovery policy belongs to
    /// the caller.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Insert one reading row
    pub async fn insert_reading(&self, reading: &SensorReading) -> Result<()> {
        sqlx::query(
            "INSERT INTO SENSOR_DATA (SENSOR_TYPE, SENSOR_ADDRESS, SENSOR_VALUE, AQUARIUM_ID) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(reading.kind.as_str())
        .bind(reading.address)
        .bind(reading.value)
        .bind(self.aquarium_id)
        .execute(&self.pool)
        .await?;

        debug!(
            "persisted {} = {} from addr {}",
            reading.kind, reading.value, reading.address
        );
        Ok(())
    }
}
