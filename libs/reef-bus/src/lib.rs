//! I2C bus driver for Atlas Scientific EZO sensor circuits
//!
//! Many circuits share one physical bus and are distinguished by a
//! runtime-programmable slave address. [`EzoDriver`] owns the channel and
//! exposes the address-scoped command/response protocol: NUL-terminated
//! ASCII commands out, a status byte plus MSB-adjusted payload back, with
//! a command-class-dependent settle time in between, plus a full-bus
//! discovery sweep.
//!
//! All I/O is synchronous and blocking. Exclusive use of the channel is
//! enforced through `&mut self`; callers that need concurrency put the
//! driver behind one coarse lock around "select address + transact".

pub mod command;
pub mod driver;
pub mod error;
pub mod response;
pub mod transport;

pub use command::CommandClass;
pub use driver::{DriverTuning, EzoDriver, DEFAULT_REPLY_LEN};
pub use error::{BusError, Result};
pub use response::EzoResponse;
pub use transport::BusChannel;

#[cfg(target_os = "linux")]
pub use transport::I2cChannel;
