use thiserror::Error;

#[derive(Error, Debug)]
pub enum AquasrvError {
    #[error("Bus error: {0}")]
    Bus(#[from] reef_bus::BusError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error(transparent)]
    Common(#[from] reef_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Sensor error: {0}")]
    Sensor(String),
}

pub type Result<T> = std::result::Result<T, AquasrvError>;
