use super::Protocol;
use std::{
    io::Error,
    net::{SocketAddr, TcpStream},
    time::Duration,
};

/// Raw SCPI socket, e.g. `TCPIP::10.0.0.5::5025::SOCKET`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Tcp;

impl Protocol for Tcp {
    type IO = TcpStream;
    type Address = SocketAddr;
    type Error = Error;
    fn connect(self, address: Self::Address, time_out: Duration) -> Result<Self::IO, Self::Error> {
        let stream = TcpStream::connect_timeout(&address, time_out)?;
        stream.set_read_timeout(Some(time_out))?;
        stream.set_write_timeout(Some(time_out))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::{Messenger, Transport};
    use std::{
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread,
    };

    #[test]
    fn asks_over_a_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let device = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let mut stream = stream;
            stream.write_all(b"ACME,Counter,0,1.0\n").unwrap();
            line
        });

        let io = Tcp.connect(address, Duration::from_secs(2)).unwrap();
        let mut messenger = Messenger::new(io);
        assert_eq!(messenger.ask("*IDN?").unwrap(), "ACME,Counter,0,1.0");
        assert_eq!(device.join().unwrap(), "*IDN?\n");
    }

    #[test]
    fn silent_device_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        let device = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(300));
            drop(stream);
        });

        let io = Tcp.connect(address, Duration::from_millis(50)).unwrap();
        let mut messenger = Messenger::new(io);
        assert!(messenger.ask("FETC?").unwrap_err().is_timeout());
        device.join().unwrap();
    }
}
