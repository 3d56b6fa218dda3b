//! Domain types for sensor identification and readings

use std::fmt;

/// Sensor families the service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Ph,
    Rtd,
}

impl SensorKind {
    /// Map the device-type field of an `I` reply to a supported kind
    pub fn from_device_type(device_type: &str) -> Option<Self> {
        match device_type {
            "pH" => Some(SensorKind::Ph),
            "RTD" => Some(SensorKind::Rtd),
            _ => None,
        }
    }

    /// Label persisted with readings
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Ph => "pH",
            SensorKind::Rtd => "RTD",
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract the device-type field from an `I` command reply.
///
/// Replies look like `?I,pH,1.98`; the second comma-field is the type.
pub fn device_type(reply: &str) -> Option<&str> {
    reply.split(',').nth(1)
}

/// One measurement bound for persistence
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub kind: SensorKind,
    pub address: u16,
    pub value: f64,
}
