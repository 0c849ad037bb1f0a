//! GPIB through a Prologix GPIB-USB controller.
//!
//! The controller is a serial device that forwards plain lines to the
//! addressed instrument and interprets lines starting with `++` itself.

use std::time::Duration;

use super::Transport;
use crate::error::{Error, Result};

const ESC: char = '\u{1b}';
const MAX_ADDRESS: u8 = 30;

pub struct Prologix<T: Transport> {
    link: T,
    address: u8,
    delay: Option<Duration>,
}

impl<T: Transport> Prologix<T> {
    /// Puts the controller in controller mode with manual read-back and
    /// binds it to the instrument at `address`.
    pub fn new(mut link: T, address: u8) -> Result<Self> {
        if address > MAX_ADDRESS {
            return Err(Error::InvalidResource(format!("GPIB address {}", address)));
        }
        link.write("++mode 1")?;
        link.write("++auto 0")?;
        link.write("++eoi 1")?;
        Ok(Self {
            link,
            address,
            delay: None,
        })
    }

    /// Pause between sending a query and asking the controller to read back.
    pub fn with_delay(mut self, delay: Option<Duration>) -> Self {
        self.delay = delay;
        self
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn link(&self) -> &T {
        &self.link
    }

    pub fn into_inner(self) -> T {
        self.link
    }

    fn escape(command: &str) -> String {
        let mut escaped = String::with_capacity(command.len());
        for c in command.chars() {
            if matches!(c, '\r' | '\n' | ESC | '+') {
                escaped.push(ESC);
            }
            escaped.push(c);
        }
        escaped
    }
}

impl<T: Transport> Transport for Prologix<T> {
    fn write(&mut self, command: &str) -> Result<()> {
        self.link.write(&format!("++addr {}", self.address))?;
        self.link.write(&Self::escape(command))
    }

    fn read(&mut self) -> Result<String> {
        self.link.write("++read eoi")?;
        self.link.read()
    }

    fn ask(&mut self, command: &str) -> Result<String> {
        self.write(command)?;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.read()
    }
}
