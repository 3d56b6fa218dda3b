//! Bus channel abstraction and the Linux i2c-dev backing
//!
//! The driver needs exactly three primitives from the platform: reprogram
//! the target slave address, write raw bytes, read raw bytes. They are
//! expressed as the [`BusChannel`] trait so tests can substitute a scripted
//! channel for real hardware.

use crate::error::Result;

/// Raw primitives of a shared bus channel
///
/// Implementations map their failures onto the driver's error taxonomy:
/// `set_address` fails with [`crate::BusError::AddressRejected`], `write`
/// and `read` with [`crate::BusError::Transport`].
pub trait BusChannel {
    /// Reprogram the slave address targeted by both halves of the channel
    fn set_address(&mut self, addr: u16) -> Result<()>;

    /// Write raw bytes to the currently targeted device
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read raw bytes from the currently targeted device into `buf`,
    /// returning how many bytes of `buf` hold reply data
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}

#[cfg(target_os = "linux")]
pub use self::i2c::I2cChannel;

#[cfg(target_os = "linux")]
mod i2c {
    use super::BusChannel;
    use crate::error::{BusError, Result};
    use i2cdev::core::I2CDevice;
    use i2cdev::linux::LinuxI2CDevice;
    use tracing::debug;

    /// Duplex handle pair onto one `/dev/i2c-<n>` device node
    ///
    /// Invariant: both halves always target the same slave address;
    /// [`BusChannel::set_address`] reprograms the pair together. Dropping
    /// the channel releases both halves.
    pub struct I2cChannel {
        path: String,
        read_half: LinuxI2CDevice,
        write_half: LinuxI2CDevice,
    }

    impl I2cChannel {
        /// Open the device node for a bus index.
        ///
        /// No slave is targeted yet; the driver applies its initial address
        /// right after construction.
        pub fn open(bus: u8) -> Result<Self> {
            let path = format!("/dev/i2c-{}", bus);

            // Address 0 is a placeholder until the driver retargets.
            let read_half = LinuxI2CDevice::new(&path, 0)
                .map_err(|e| BusError::ChannelUnavailable(format!("{}: {}", path, e)))?;
            let write_half = LinuxI2CDevice::new(&path, 0)
                .map_err(|e| BusError::ChannelUnavailable(format!("{}: {}", path, e)))?;

            debug!("opened {}", path);
            Ok(Self {
                path,
                read_half,
                write_half,
            })
        }
    }

    impl BusChannel for I2cChannel {
        fn set_address(&mut self, addr: u16) -> Result<()> {
            self.read_half
                .set_slave_address(addr)
                .and_then(|()| self.write_half.set_slave_address(addr))
                .map_err(|e| BusError::address_rejected(addr, e.to_string()))?;
            debug!("{} targeting addr {}", self.path, addr);
            Ok(())
        }

        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            self.write_half
                .write(bytes)
                .map_err(|e| BusError::transport(format!("{} write: {}", self.path, e)))?;
            debug!("{} TX {}B", self.path, bytes.len());
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            self.read_half
                .read(buf)
                .map_err(|e| BusError::transport(format!("{} read: {}", self.path, e)))?;
            debug!("{} RX {}B", self.path, buf.len());
            // i2c-dev clocks out the full request; shorter replies arrive
            // null-padded and the decoder strips the padding.
            Ok(buf.len())
        }
    }
}
