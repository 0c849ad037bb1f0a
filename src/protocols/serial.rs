use std::time::Duration;

use serial::{SerialPort, SystemPort};

use super::Protocol;

#[derive(Clone, Copy, Debug)]
pub struct Serial {
    pub baud_rate: serial::BaudRate,
    pub data_bits: serial::CharSize,
    pub parity: serial::Parity,
    pub stop_bits: serial::StopBits,
    pub flow_control: serial::FlowControl,
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            baud_rate: serial::Baud9600,
            data_bits: serial::Bits8,
            parity: serial::ParityNone,
            stop_bits: serial::Stop1,
            flow_control: serial::FlowNone,
        }
    }
}

impl Serial {
    /// Platform name of a numbered port; `ASRL1` is the first port.
    pub fn port_name(number: u32) -> String {
        if cfg!(windows) {
            format!("COM{}", number)
        } else {
            format!("/dev/ttyS{}", number.saturating_sub(1))
        }
    }
}

impl Protocol for Serial {
    type Address = String;
    type Error = serial::Error;
    type IO = SystemPort;
    fn connect(self, address: Self::Address, time_out: Duration) -> Result<Self::IO, Self::Error> {
        let mut port = serial::open(&address)?;
        config_serial(&mut port, self)?;
        port.set_timeout(time_out)?;
        Ok(port)
    }
}

fn config_serial<T: SerialPort>(port: &mut T, config: Serial) -> serial::Result<()> {
    port.reconfigure(&|settings| {
        settings.set_baud_rate(config.baud_rate)?;
        settings.set_char_size(config.data_bits);
        settings.set_parity(config.parity);
        settings.set_stop_bits(config.stop_bits);
        settings.set_flow_control(config.flow_control);
        Ok(())
    })
}
