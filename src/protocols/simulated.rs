//! A scripted stand-in for a real device.
//!
//! Responses come from a queue, optionally refilled by a responder that sees
//! every command. Every exchange is recorded so callers can check exactly
//! what went over the wire. Reading with nothing queued behaves like a
//! transport timeout.

use std::{collections::HashMap, collections::VecDeque, fmt};

use super::Transport;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Exchange {
    Write(String),
    Read(String),
    Ask(String, String),
}

pub type Responder = Box<dyn FnMut(&str) -> Option<String> + Send>;

#[derive(Default)]
pub struct Simulated {
    responses: VecDeque<String>,
    responder: Option<Responder>,
    exchanges: Vec<Exchange>,
}

impl Simulated {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_responder<F>(responder: F) -> Self
    where
        F: FnMut(&str) -> Option<String> + Send + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    /// A device that remembers `"<HEADER> <value>"` writes and answers
    /// `"<HEADER>?"` with the stored value.
    pub fn registers() -> Self {
        let mut registers: HashMap<String, String> = HashMap::new();
        Self::with_responder(move |command| {
            let command = command.trim();
            if let Some(header) = command.strip_suffix('?') {
                registers.get(header).cloned()
            } else {
                let mut split = command.splitn(2, ' ');
                let header = split.next()?;
                let value = split.next()?.trim();
                registers.insert(header.to_string(), value.to_string());
                None
            }
        })
    }

    pub fn push_response<S: Into<String>>(&mut self, response: S) {
        self.responses.push_back(response.into());
    }

    pub fn pending(&self) -> usize {
        self.responses.len()
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Number of transport operations; an `ask` counts once.
    pub fn operations(&self) -> usize {
        self.exchanges.len()
    }

    /// Every command sent to the device, including the query half of asks.
    pub fn writes(&self) -> Vec<&str> {
        self.exchanges
            .iter()
            .filter_map(|e| match e {
                Exchange::Write(c) | Exchange::Ask(c, _) => Some(c.as_str()),
                Exchange::Read(_) => None,
            })
            .collect()
    }

    pub fn clear_exchanges(&mut self) {
        self.exchanges.clear();
    }

    fn deliver(&mut self, command: &str) {
        if let Some(responder) = self.responder.as_mut() {
            if let Some(response) = responder(command) {
                self.responses.push_back(response);
            }
        }
    }

    fn next_response(&mut self) -> Result<String> {
        self.responses.pop_front().ok_or(Error::Timeout)
    }
}

impl Transport for Simulated {
    fn write(&mut self, command: &str) -> Result<()> {
        self.deliver(command);
        self.exchanges.push(Exchange::Write(command.to_string()));
        Ok(())
    }

    fn read(&mut self) -> Result<String> {
        let response = self.next_response()?;
        self.exchanges.push(Exchange::Read(response.clone()));
        Ok(response)
    }

    fn ask(&mut self, command: &str) -> Result<String> {
        self.deliver(command);
        match self.next_response() {
            Ok(response) => {
                self.exchanges
                    .push(Exchange::Ask(command.to_string(), response.clone()));
                Ok(response)
            }
            Err(e) => {
                self.exchanges.push(Exchange::Write(command.to_string()));
                Err(e)
            }
        }
    }
}

impl fmt::Debug for Simulated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulated")
            .field("responses", &self.responses)
            .field("exchanges", &self.exchanges)
            .finish()
    }
}
