//! Agilent 53132A universal counter (S/N prefix 3646 and later).

use super::{
    counter::{Counter, Function, GateKind},
    Instrument, Model,
};
use crate::{error::Result, property::Property, protocols::Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agilent53132A {
    function: Function,
}

impl Default for Agilent53132A {
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
    (Function::DutyCycle, "DCYC"),
    (Function::FallTime, "FTIM"),
    (Function::Frequency, "FREQ"),
    (Function::Maximum, "MAX"),
    (Function::Minimum, "MIN"),
    (Function::NegativeWidth, "NWID"),
    (Function::Period, "PER"),
    (Function::Phase, "PHA"),
    (Function::PeakToPeak, "PTP"),
    (Function::PositiveWidth, "PWID"),
    (Function::RiseTime, "RTIM"),
    (Function::TimeInterval, "TINT"),
    (Function::Totalize, "TOT"),
];

impl Model for Agilent53132A {
    const DESCRIPTION: &'static str = "Agilent 53132A Frequency Counter";
    const PROPERTIES: &'static [Property] = PROPERTIES;
    const RESET_SEQUENCE: &'static [&'static str] = &["*RST", "*CLS", "*SRE 0", "*ESE 0", ":STAT:PRES"];
    fn on_reset(&mut self) {
        self.function = Function::Frequency;
    }
}

impl Counter for Agilent53132A {
    const FUNCTIONS: &'static [(Function, &'static str)] = FUNCTIONS;
    const GATES: &'static [GateKind] = &[GateKind::Time, GateKind::Digits];
    fn function(&self) -> Function {
        self.function
    }
    fn select(&mut self, function: Function) {
        self.function = function;
    }
}

/// Binds a counter to `transport` and resets it to a known state.
pub fn connect<T: Transport>(transport: T) -> Result<Instrument<T, Agilent53132A>> {
    let mut counter = Instrument::new(transport, Agilent53132A::default());
    counter.reset()?;
    Ok(counter)
}
