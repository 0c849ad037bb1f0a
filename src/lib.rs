//! Declarative control of bench instruments over line-oriented transports.
//!
//! A driver is a [`Model`]: a table of [`Property`] records, each pairing a
//! query and a command template with a validator and an optional value map.
//! An [`Instrument`] binds a model to a [`Transport`] and turns named
//! property reads and writes into validated commands.
//!
//! ```no_run
//! use benchtop::{config::ConnectionConfig, instruments::keithley2400, protocols};
//!
//! # fn main() -> benchtop::Result<()> {
//! let config = ConnectionConfig::from_toml_str(
//!     r#"
//!     resource = "GPIB::1"
//!     gpib_controller = "/dev/ttyUSB0"
//!     "#,
//! )?;
//! let mut source = keithley2400::connect(protocols::open(&config)?)?;
//! source.set("source_mode", "current")?;
//! source.set("source_current", 0.005)?;
//! source.enable_source()?;
//! let volts: f64 = source.get_as("voltage")?;
//! # let _ = volts;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod instruments;
pub mod observer;
pub mod property;
pub mod protocols;
pub mod scpi;
pub mod validators;
pub mod value;

pub use error::{Error, Result, ValidationError};
pub use instruments::{Instrument, Model, Readable, Resettable, State, Writable};
pub use observer::{LogObserver, NoopObserver, Observer};
pub use property::{Property, Registry};
pub use protocols::{Simulated, Transport};
pub use value::{Param, Value};
