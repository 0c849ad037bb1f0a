//! Connection settings, usually loaded from a TOML file.
//!
//! ```toml
//! resource = "GPIB::25"
//! timeout_ms = 3000
//! gpib_controller = "/dev/ttyUSB0"
//!
//! [serial]
//! baud_rate = 115200
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    protocols::{Resource, Serial},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub resource: String,
    pub timeout_ms: u64,
    pub write_termination: String,
    pub read_termination: String,
    /// Pause between the write and read halves of a query.
    pub delay_ms: u64,
    /// Serial port of the Prologix controller, for GPIB resources.
    pub gpib_controller: Option<String>,
    pub serial: SerialSettings,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            resource: String::new(),
            timeout_ms: 3000,
            write_termination: "\n".to_string(),
            read_termination: "\n".to_string(),
            delay_ms: 0,
            gpib_controller: None,
            serial: SerialSettings::default(),
        }
    }
}

impl ConnectionConfig {
    pub fn new<S: Into<String>>(resource: S) -> Self {
        Self {
            resource: resource.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "timeout_ms must be greater than 0".to_string(),
            ));
        }
        self.read_terminator()?;
        self.resource()?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn delay(&self) -> Option<Duration> {
        match self.delay_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn resource(&self) -> Result<Resource> {
        self.resource.parse()
    }

    /// Responses are split on a single byte.
    pub fn read_terminator(&self) -> Result<u8> {
        match self.read_termination.as_bytes() {
            [b] => Ok(*b),
            _ => Err(Error::InvalidConfig(format!(
                "read_termination must be one byte, got {:?}",
                self.read_termination
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Odd,
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowControl {
    None,
    Software,
    Hardware,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: u8,
    pub flow_control: FlowControl,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
            flow_control: FlowControl::None,
        }
    }
}

impl SerialSettings {
    pub fn to_protocol(&self) -> Result<Serial> {
        let data_bits = match self.data_bits {
            5 => serial::Bits5,
            6 => serial::Bits6,
            7 => serial::Bits7,
            8 => serial::Bits8,
            n => return Err(Error::InvalidConfig(format!("unsupported data bits: {}", n))),
        };
        let stop_bits = match self.stop_bits {
            1 => serial::Stop1,
            2 => serial::Stop2,
            n => return Err(Error::InvalidConfig(format!("unsupported stop bits: {}", n))),
        };
        let parity = match self.parity {
            Parity::None => serial::ParityNone,
            Parity::Odd => serial::ParityOdd,
            Parity::Even => serial::ParityEven,
        };
        let flow_control = match self.flow_control {
            FlowControl::None => serial::FlowNone,
            FlowControl::Software => serial::FlowSoftware,
            FlowControl::Hardware => serial::FlowHardware,
        };
        Ok(Serial {
            baud_rate: serial::BaudRate::from_speed(self.baud_rate as usize),
            data_bits,
            parity,
            stop_bits,
            flow_control,
        })
    }
}
