//! IEEE 488.2 common commands and status registers.

use std::{fmt, str::FromStr};

use crate::error::{communication_error, Error};

pub mod error;

pub use self::error::ScpiError;

pub mod common {
    /// Identification
    pub const IDN: &str = "*IDN";
    /// Reset
    pub const RST: &str = "*RST";
    /// Clear status
    pub const CLS: &str = "*CLS";
    /// Operation complete
    pub const OPC: &str = "*OPC";
    /// Wait to complete
    pub const WAI: &str = "*WAI";
    /// Event status enable
    pub const ESE: &str = "*ESE";
    /// Event status register
    pub const ESR: &str = "*ESR";
    /// Service request enable
    pub const SRE: &str = "*SRE";
    /// Read status byte
    pub const STB: &str = "*STB";
    /// Self-test
    pub const TST: &str = "*TST";
    /// Oldest entry of the error queue
    pub const SYST_ERR: &str = "SYST:ERR";
    /// Preset the status subsystem
    pub const STAT_PRES: &str = ":STAT:PRES";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(String);

impl Command {
    pub fn new<S: ToString>(s: S) -> Self {
        Self(s.to_string())
    }
    pub fn query(mut self) -> Self {
        self.0.push('?');
        self
    }
    pub fn para<P: AsRef<str>>(mut self, para: P) -> Self {
        self.0.push(' ');
        self.0.push_str(para.as_ref());
        self
    }
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Command {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn register_value(s: &str) -> Result<u8, Error> {
    let x: f64 = s
        .trim()
        .parse()
        .map_err(|_| communication_error(format!("bad register value '{}'", s.trim())))?;
    if x.fract() == 0.0 && (0.0..=255.0).contains(&x) {
        Ok(x as u8)
    } else {
        Err(communication_error(format!("bad register value '{}'", s.trim())))
    }
}

/// Status byte returned by `*STB?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusByte(u8);

impl StatusByte {
    pub fn new(b: u8) -> Self {
        Self(b)
    }
    pub fn byte(&self) -> u8 {
        self.0
    }
    pub fn is_error_queue_nonempty(&self) -> bool {
        self.0 & (1 << 2) != 0
    }
    pub fn error_queue_nonempty(mut self) -> Self {
        self.0 |= 1 << 2;
        self
    }
    pub fn is_message_available(&self) -> bool {
        self.0 & (1 << 4) != 0
    }
    pub fn message_available(mut self) -> Self {
        self.0 |= 1 << 4;
        self
    }
    pub fn is_event_happened(&self) -> bool {
        self.0 & (1 << 5) != 0
    }
    pub fn event_happened(mut self) -> Self {
        self.0 |= 1 << 5;
        self
    }
    pub fn is_requesting_service(&self) -> bool {
        self.0 & (1 << 6) != 0
    }
}

impl FromStr for StatusByte {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        register_value(s).map(Self)
    }
}

impl fmt::Display for StatusByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standard event status register returned by `*ESR?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventStatusByte(u8);

impl EventStatusByte {
    pub fn new(b: u8) -> Self {
        Self(b)
    }
    pub fn byte(&self) -> u8 {
        self.0
    }
    pub fn is_opera_complete(&self) -> bool {
        self.0 & (1 << 0) != 0
    }
    pub fn opera_complete(mut self) -> Self {
        self.0 |= 1 << 0;
        self
    }
    pub fn is_query_err(&self) -> bool {
        self.0 & (1 << 2) != 0
    }
    pub fn query_err(mut self) -> Self {
        self.0 |= 1 << 2;
        self
    }
    pub fn is_device_dep_err(&self) -> bool {
        self.0 & (1 << 3) != 0
    }
    pub fn device_dep_err(mut self) -> Self {
        self.0 |= 1 << 3;
        self
    }
    pub fn is_execution_err(&self) -> bool {
        self.0 & (1 << 4) != 0
    }
    pub fn execution_err(mut self) -> Self {
        self.0 |= 1 << 4;
        self
    }
    pub fn is_command_err(&self) -> bool {
        self.0 & (1 << 5) != 0
    }
    pub fn command_err(mut self) -> Self {
        self.0 |= 1 << 5;
        self
    }
    pub fn is_power_on(&self) -> bool {
        self.0 & (1 << 7) != 0
    }
    pub fn has_error(&self) -> bool {
        self.is_query_err() || self.is_device_dep_err() || self.is_execution_err() || self.is_command_err()
    }
}

impl FromStr for EventStatusByte {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        register_value(s).map(Self)
    }
}

impl fmt::Display for EventStatusByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One `SYST:ERR?` entry, e.g. `-113,"Undefined header"`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}, \"{message}\"")]
pub struct DeviceError {
    pub code: i32,
    pub message: String,
}

impl DeviceError {
    /// Code 0 means the queue is empty.
    pub fn is_error(&self) -> bool {
        self.code != 0
    }
    pub fn class(&self) -> Option<ScpiError> {
        ScpiError::from_code(self.code)
    }
}

impl FromStr for DeviceError {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (code, message) = match s.find(',') {
            Some(i) => (&s[..i], &s[i + 1..]),
            None => (s, ""),
        };
        let code = code
            .trim()
            .trim_start_matches('+')
            .parse()
            .map_err(|_| communication_error(format!("bad error queue entry '{}'", s)))?;
        Ok(Self {
            code,
            message: message.trim().trim_matches('"').to_string(),
        })
    }
}
