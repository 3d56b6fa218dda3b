//! Bus Driver Error Types

use thiserror::Error;

/// Result type for reef-bus operations
pub type Result<T> = std::result::Result<T, BusError>;

/// Bus driver errors
///
/// Protocol-level failures reported by a sensor are not errors; they come
/// back as [`crate::EzoResponse::Fault`] so callers can branch on them
/// without error machinery.
#[derive(Debug, Error, Clone)]
pub enum BusError {
    /// The bus device node could not be opened. Fatal to driver
    /// construction.
    #[error("Bus channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// The channel refused to retarget to the requested slave address.
    /// Non-fatal to the driver; the caller may try another address.
    #[error("Address {addr} rejected: {reason}")]
    AddressRejected { addr: u16, reason: String },

    /// A raw write or read on the channel faulted. The bus itself is
    /// unusable for this transaction.
    #[error("Transport fault: {0}")]
    Transport(String),
}

impl BusError {
    /// Create a transport fault
    pub fn transport(msg: impl Into<String>) -> Self {
        BusError::Transport(msg.into())
    }

    /// Create an address rejection for `addr`
    pub fn address_rejected(addr: u16, reason: impl Into<String>) -> Self {
        BusError::AddressRejected {
            addr,
            reason: reason.into(),
        }
    }
}
