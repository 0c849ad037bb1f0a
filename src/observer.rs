//! Hooks for watching instrument traffic.
//!
//! An [`Instrument`](crate::instruments::Instrument) reports every exchange
//! and state change to the observer it was built with. The default observer
//! ignores everything; [`LogObserver`] forwards to the `log` facade.

use crate::instruments::State;

pub trait Observer: Send {
    fn on_write(&mut self, _instrument: &str, _command: &str) {}
    fn on_read(&mut self, _instrument: &str, _response: &str) {}
    /// Called before each extra read of a completion poll, counting from 1.
    fn on_poll(&mut self, _instrument: &str, _attempt: usize) {}
    fn on_state_change(&mut self, _instrument: &str, _from: State, _to: State) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_write(&mut self, instrument: &str, command: &str) {
        log::debug!("{} <- {:?}", instrument, command);
    }
    fn on_read(&mut self, instrument: &str, response: &str) {
        log::debug!("{} -> {:?}", instrument, response);
    }
    fn on_poll(&mut self, instrument: &str, attempt: usize) {
        log::trace!("{}: waiting for completion, read #{}", instrument, attempt);
    }
    fn on_state_change(&mut self, instrument: &str, from: State, to: State) {
        log::info!("{}: {:?} -> {:?}", instrument, from, to);
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn on_write(&mut self, instrument: &str, command: &str) {
        (**self).on_write(instrument, command)
    }
    fn on_read(&mut self, instrument: &str, response: &str) {
        (**self).on_read(instrument, response)
    }
    fn on_poll(&mut self, instrument: &str, attempt: usize) {
        (**self).on_poll(instrument, attempt)
    }
    fn on_state_change(&mut self, instrument: &str, from: State, to: State) {
        (**self).on_state_change(instrument, from, to)
    }
}
