//! VISA-style resource names.

use std::str::FromStr;

use super::Serial;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// `ASRL3::INSTR`, `ASRL/dev/ttyUSB0::INSTR`
    Serial { port: String },
    /// `TCPIP0::192.168.1.20::5025::SOCKET`
    Tcp { host: String, port: u16 },
    /// `GPIB0::25::INSTR`
    Gpib { board: u8, address: u8 },
}

fn board_number(prefix: &str, rest: &str, name: &str) -> Result<u8, Error> {
    let digits = &rest[prefix.len()..];
    if digits.is_empty() {
        Ok(0)
    } else {
        digits
            .parse()
            .map_err(|_| Error::InvalidResource(name.to_string()))
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidResource(name.to_string());
        let mut parts: Vec<&str> = name.trim().split("::").collect();
        if parts.len() > 1 && parts[parts.len() - 1].eq_ignore_ascii_case("INSTR") {
            parts.pop();
        }
        let head = parts.first().copied().unwrap_or_default();
        let upper = head.to_ascii_uppercase();

        if upper.starts_with("ASRL") && parts.len() == 1 {
            let port = &head[4..];
            if port.is_empty() {
                return Err(invalid());
            }
            let port = match port.parse::<u32>() {
                Ok(n) => Serial::port_name(n),
                Err(_) => port.to_string(),
            };
            Ok(Resource::Serial { port })
        } else if upper.starts_with("TCPIP") && parts.len() == 4 {
            board_number("TCPIP", &upper, name)?;
            if !parts[3].eq_ignore_ascii_case("SOCKET") || parts[1].is_empty() {
                return Err(invalid());
            }
            let port = parts[2].parse().map_err(|_| invalid())?;
            Ok(Resource::Tcp {
                host: parts[1].to_string(),
                port,
            })
        } else if upper.starts_with("GPIB") && parts.len() == 2 {
            let board = board_number("GPIB", &upper, name)?;
            let address = parts[1].parse().map_err(|_| invalid())?;
            if address > 30 {
                return Err(invalid());
            }
            Ok(Resource::Gpib { board, address })
        } else {
            Err(invalid())
        }
    }
}
