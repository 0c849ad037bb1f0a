use std::{net::ToSocketAddrs, time::Duration};

use crate::{
    config::ConnectionConfig,
    error::{Error, Result},
};

pub mod messenger;
pub mod prologix;
pub mod resource;
pub mod serial;
pub mod simulated;
pub mod tcp;

pub use self::messenger::Messenger;
pub use self::prologix::Prologix;
pub use self::resource::Resource;
pub use self::serial::Serial;
pub use self::simulated::{Exchange, Simulated};
pub use self::tcp::Tcp;

/// Opens the raw byte stream to a device.
pub trait Protocol {
    type Address;
    type Error;
    type IO: std::io::Read + std::io::Write;
    fn connect(
        self,
        address: Self::Address,
        time_out: Duration,
    ) -> std::result::Result<Self::IO, Self::Error>;
}

/// Line-level exchange with one device.
///
/// `read` blocks until a complete response is available or the link's own
/// timeout expires. Nothing here retries.
pub trait Transport {
    fn write(&mut self, command: &str) -> Result<()>;
    fn read(&mut self) -> Result<String>;
    /// `write` then `read` as one exchange.
    fn ask(&mut self, command: &str) -> Result<String> {
        self.write(command)?;
        self.read()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, command: &str) -> Result<()> {
        (**self).write(command)
    }
    fn read(&mut self) -> Result<String> {
        (**self).read()
    }
    fn ask(&mut self, command: &str) -> Result<String> {
        (**self).ask(command)
    }
}

pub type BoxedTransport = Box<dyn Transport + Send>;

/// Connects to the resource named in `config`.
pub fn open(config: &ConnectionConfig) -> Result<BoxedTransport> {
    let time_out = config.timeout();
    match config.resource()? {
        Resource::Serial { port } => {
            let io = config.serial.to_protocol()?.connect(port, time_out)?;
            Ok(Box::new(configure(Messenger::new(io), config)?))
        }
        Resource::Tcp { host, port } => {
            let address = (host.as_str(), port)
                .to_socket_addrs()?
                .next()
                .ok_or_else(|| Error::InvalidResource(format!("{}:{}", host, port)))?;
            let io = Tcp.connect(address, time_out)?;
            Ok(Box::new(configure(Messenger::new(io), config)?))
        }
        Resource::Gpib { address, .. } => {
            let controller = config.gpib_controller.clone().ok_or_else(|| {
                Error::InvalidConfig("GPIB resources need a gpib_controller port".to_string())
            })?;
            let io = config.serial.to_protocol()?.connect(controller, time_out)?;
            // Prologix applies the delay itself and never calls the link's `ask`.
            let link = configure(Messenger::new(io), config)?.with_delay(None);
            Ok(Box::new(Prologix::new(link, address)?.with_delay(config.delay())))
        }
    }
}

fn configure<IO: std::io::Read + std::io::Write>(
    messenger: Messenger<IO>,
    config: &ConnectionConfig,
) -> Result<Messenger<IO>> {
    Ok(messenger
        .with_write_termination(&config.write_termination)
        .with_read_termination(config.read_terminator()?)
        .with_delay(config.delay()))
}
