//! EZO bus device driver
//!
//! One driver instance owns one bus channel. Many circuits share the
//! channel and are reached by reprogramming the current target address
//! before each transaction, so every operation takes `&mut self`; wrap the
//! driver in a mutex if several callers need it.

use crate::command::CommandClass;
use crate::error::Result;
use crate::response::EzoResponse;
use crate::transport::BusChannel;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Default number of raw bytes requested per reply
pub const DEFAULT_REPLY_LEN: usize = 31;

/// One past the highest address probed by the discovery sweep (7-bit space)
const ADDRESS_SPACE: u16 = 128;

/// Settle-time tuning for the driver
///
/// The defaults are what the circuits need on the reference hardware.
/// Reading before the settle time elapses yields garbage or stale data, so
/// shrink these only against a simulated channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverTuning {
    /// Settle time for readings and calibrations (milliseconds)
    #[serde(default = "default_long_settle_ms")]
    pub long_settle_ms: u64,
    /// Settle time for every other acknowledged command (milliseconds)
    #[serde(default = "default_short_settle_ms")]
    pub short_settle_ms: u64,
}

fn default_long_settle_ms() -> u64 {
    1500
}

fn default_short_settle_ms() -> u64 {
    500
}

impl Default for DriverTuning {
    fn default() -> Self {
        Self {
            long_settle_ms: default_long_settle_ms(),
            short_settle_ms: default_short_settle_ms(),
        }
    }
}

/// Driver for EZO circuits multiplexed on one bus channel
pub struct EzoDriver<C> {
    channel: C,
    tuning: DriverTuning,
    current_address: u16,
}

#[cfg(target_os = "linux")]
impl EzoDriver<crate::transport::I2cChannel> {
    /// Open `/dev/i2c-<bus>` and target `address`.
    ///
    /// Fails with [`crate::BusError::ChannelUnavailable`] before any
    /// address is applied if the device node cannot be opened.
    pub fn open(bus: u8, address: u16) -> Result<Self> {
        let channel = crate::transport::I2cChannel::open(bus)?;
        Self::new(channel, address)
    }
}

impl<C: BusChannel> EzoDriver<C> {
    /// Wrap an open channel and apply the initial target address
    pub fn new(channel: C, address: u16) -> Result<Self> {
        let mut driver = Self {
            channel,
            tuning: DriverTuning::default(),
            current_address: address,
        };
        driver.set_target_address(address)?;
        Ok(driver)
    }

    /// Replace the settle-time tuning
    pub fn with_tuning(mut self, tuning: DriverTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Address the last successful [`Self::set_target_address`] applied
    pub fn target_address(&self) -> u16 {
        self.current_address
    }

    /// Reprogram both halves of the channel to target `address`.
    ///
    /// Cheap and idempotent; callers multiplexing many circuits invoke it
    /// before every transaction.
    pub fn set_target_address(&mut self, address: u16) -> Result<()> {
        self.channel.set_address(address)?;
        self.current_address = address;
        Ok(())
    }

    /// Send one command to the current target, NUL-terminated.
    ///
    /// The terminator is mandatory framing; receivers scan for it to find
    /// the end of the command. Bytes go out on the bus immediately.
    pub fn write(&mut self, command: &str) -> Result<()> {
        let mut frame = Vec::with_capacity(command.len() + 1);
        frame.extend_from_slice(command.as_bytes());
        frame.push(0);

        debug!("addr {} TX {:?}", self.current_address, command);
        self.channel.write(&frame)
    }

    /// Read and decode one reply of up to `max_bytes` raw bytes
    pub fn read(&mut self, max_bytes: usize) -> Result<EzoResponse> {
        let mut buf = vec![0u8; max_bytes];
        let n = self.channel.read(&mut buf)?;
        let response = EzoResponse::decode(&buf[..n])?;
        debug!("addr {} RX {}", self.current_address, response);
        Ok(response)
    }

    /// Write `command`, wait out its settle time, read the reply.
    ///
    /// Readings and calibrations get the long settle, sleep commands
    /// short-circuit without a read-back (the circuit stops answering),
    /// everything else gets the short settle. The delays are blocking
    /// sleeps on the calling thread.
    pub fn query(&mut self, command: &str) -> Result<EzoResponse> {
        self.write(command)?;

        match CommandClass::classify(command) {
            CommandClass::Long => {
                thread::sleep(Duration::from_millis(self.tuning.long_settle_ms));
            }
            CommandClass::Sleep => return Ok(EzoResponse::Asleep),
            CommandClass::Short => {
                thread::sleep(Duration::from_millis(self.tuning.short_settle_ms));
            }
        }

        self.read(DEFAULT_REPLY_LEN)
    }

    /// Probe every bus address, listing the ones that acknowledge.
    ///
    /// Presence means the 1-byte probe completed without a transport
    /// fault; the payload byte is never inspected. Faulting addresses are
    /// recorded as absent and the sweep continues. The pre-sweep target
    /// address is restored afterwards; only a failure of that restore
    /// propagates. The sweep holds the channel for all 128 probes.
    pub fn list_devices(&mut self) -> Result<Vec<u16>> {
        let saved = self.current_address;
        let mut present = Vec::new();

        for addr in 0..ADDRESS_SPACE {
            let probe = self.set_target_address(addr).and_then(|()| {
                let mut byte = [0u8; 1];
                self.channel.read(&mut byte).map(drop)
            });
            match probe {
                Ok(()) => present.push(addr),
                Err(e) => debug!("addr {} absent: {}", addr, e),
            }
        }

        self.set_target_address(saved)?;
        debug!("sweep found {} devices", present.len());
        Ok(present)
    }

    /// Release both halves of the channel.
    ///
    /// Consuming the driver makes a double release unrepresentable;
    /// dropping it has the same effect.
    pub fn close(self) {
        debug!("closing bus channel");
    }
}
