//! Fluke PM6666 timer/counter, driven with Agilent function names.

use super::{
    counter::{Counter, Function, GateKind},
    Instrument, Model,
};
use crate::{error::Result, property::Property, protocols::Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlukePM6666 {
    function: Function,
}

impl Default for FlukePM6666 {
    fn default() -> Self {
        Self {
            function: Function::Frequency,
        }
    }
}

const PROPERTIES: &[Property] = &[Property::measurement(
    "error",
    "SYST:ERR?",
    "Oldest error as [<error number>, <error string>]",
)];

const FUNCTIONS: &[(Function, &str)] = &[
    (Function::Frequency, "FREQ"),
    (Function::Period, "PER"),
    (Function::TimeInterval, "TIME"),
    (Function::Totalize, "TOTM"),
];

impl Model for FlukePM6666 {
    const DESCRIPTION: &'static str = "Fluke PM6666 Frequency Counter";
    const PROPERTIES: &'static [Property] = PROPERTIES;
    // device clear returns to default settings
    const RESET_SEQUENCE: &'static [&'static str] = &["D", "EOI ON"];
    fn on_reset(&mut self) {
        self.function = Function::Frequency;
    }
}

impl Counter for FlukePM6666 {
    const FUNCTIONS: &'static [(Function, &'static str)] = FUNCTIONS;
    const GATES: &'static [GateKind] = &[GateKind::Time];
    fn function(&self) -> Function {
        self.function
    }
    fn select(&mut self, function: Function) {
        self.function = function;
    }
}

pub fn connect<T: Transport>(transport: T) -> Result<Instrument<T, FlukePM6666>> {
    let mut counter = Instrument::new(transport, FlukePM6666::default());
    counter.reset()?;
    Ok(counter)
}
