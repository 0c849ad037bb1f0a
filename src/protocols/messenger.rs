use std::{
    io::{ErrorKind, Read, Write},
    time::Duration,
};

use bytes::{Buf, BytesMut};

use super::Transport;
use crate::error::{communication_error, Error, Result};

const CHUNK: usize = 256;
/// Longest response accepted without a terminator.
const MAX_LINE: usize = 64 * 1024;

/// Terminated-line transport over any byte stream: a serial port, a TCP
/// socket, or an in-memory buffer in tests.
pub struct Messenger<IO: Write + Read> {
    io: IO,
    buf: BytesMut,
    write_termination: String,
    read_termination: u8,
    delay: Option<Duration>,
}

impl<IO: Write + Read> Messenger<IO> {
    pub fn new(io: IO) -> Self {
        Self {
            io,
            buf: BytesMut::with_capacity(CHUNK),
            write_termination: "\n".to_string(),
            read_termination: b'\n',
            delay: None,
        }
    }
    pub fn with_write_termination(mut self, termination: &str) -> Self {
        self.write_termination = termination.to_string();
        self
    }
    pub fn with_read_termination(mut self, termination: u8) -> Self {
        self.read_termination = termination;
        self
    }
    /// Pause between the write and read halves of `ask`.
    pub fn with_delay(mut self, delay: Option<Duration>) -> Self {
        self.delay = delay;
        self
    }
    pub fn get_ref(&self) -> &IO {
        &self.io
    }
    pub fn get_mut(&mut self) -> &mut IO {
        &mut self.io
    }
    pub fn into_inner(self) -> IO {
        self.io
    }

    fn take_line(&mut self) -> Result<Option<String>> {
        let end = match self.buf.iter().position(|b| *b == self.read_termination) {
            Some(end) => end,
            None if self.buf.len() > MAX_LINE => {
                self.buf.clear();
                return Err(communication_error(format!(
                    "no terminator within {} bytes",
                    MAX_LINE
                )));
            }
            None => return Ok(None),
        };
        let line = self.buf.split_to(end);
        self.buf.advance(1);
        let line = std::str::from_utf8(&line)
            .map_err(|e| communication_error(format!("response is not UTF-8: {}", e)))?;
        Ok(Some(line.trim_end_matches(|c| c == '\r' || c == '\n').to_string()))
    }
}

impl<IO: Write + Read> Transport for Messenger<IO> {
    fn write(&mut self, command: &str) -> Result<()> {
        let mut message = String::with_capacity(command.len() + self.write_termination.len());
        message.push_str(command);
        message.push_str(&self.write_termination);
        self.io.write_all(message.as_bytes())?;
        self.io.flush()?;
        Ok(())
    }

    fn read(&mut self) -> Result<String> {
        let mut chunk = [0u8; CHUNK];
        loop {
            if let Some(line) = self.take_line()? {
                return Ok(line);
            }
            match self.io.read(&mut chunk) {
                Ok(0) => {
                    return Err(std::io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "connection closed by device",
                    )
                    .into())
                }
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
                Err(ref e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Err(Error::Timeout)
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn ask(&mut self, command: &str) -> Result<String> {
        self.write(command)?;
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.read()
    }
}
