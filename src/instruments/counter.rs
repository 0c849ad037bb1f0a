//! Universal frequency counters.
//!
//! Counters from different vendors share one interface using the Agilent
//! function names. Each model lists the functions it supports together with
//! its own wire mnemonic.

use std::{fmt, str::FromStr};

use super::{Instrument, Model};
use crate::{
    error::{Error, Result, ValidationError},
    format::format_command,
    protocols::Transport,
    validators::{strict_discrete_set, strict_range, Values},
    value::Value,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    DutyCycle,
    FallTime,
    Frequency,
    Maximum,
    Minimum,
    NegativeWidth,
    Period,
    Phase,
    PeakToPeak,
    PositiveWidth,
    RiseTime,
    TimeInterval,
    Totalize,
}

impl Function {
    pub const ALL: [Function; 13] = [
        Function::DutyCycle,
        Function::FallTime,
        Function::Frequency,
        Function::Maximum,
        Function::Minimum,
        Function::NegativeWidth,
        Function::Period,
        Function::Phase,
        Function::PeakToPeak,
        Function::PositiveWidth,
        Function::RiseTime,
        Function::TimeInterval,
        Function::Totalize,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Function::DutyCycle => "DCYC",
            Function::FallTime => "FTIM",
            Function::Frequency => "FREQ",
            Function::Maximum => "MAX",
            Function::Minimum => "MIN",
            Function::NegativeWidth => "NWID",
            Function::Period => "PER",
            Function::Phase => "PHA",
            Function::PeakToPeak => "PTP",
            Function::PositiveWidth => "PWID",
            Function::RiseTime => "RTIM",
            Function::TimeInterval => "TINT",
            Function::Totalize => "TOT",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Function {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Function::ALL
            .iter()
            .copied()
            .find(|f| f.mnemonic().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ValidationError::NotInSet {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

/// How long a measurement integrates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Gate time in seconds.
    Time(f64),
    /// Number of significant digits, 3 to 15.
    Digits(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateKind {
    Time,
    Digits,
}

impl Gate {
    pub fn kind(&self) -> GateKind {
        match self {
            Gate::Time(_) => GateKind::Time,
            Gate::Digits(_) => GateKind::Digits,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coupling {
    Ac,
    Dc,
}

impl Coupling {
    pub fn token(self) -> &'static str {
        match self {
            Coupling::Ac => "AC",
            Coupling::Dc => "DC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputSetting {
    /// 1 or 10.
    Attenuation(u32),
    Coupling(Coupling),
    /// 50 Ω or 1 MΩ.
    Impedance(f64),
}

const GATE_TIMES: Values = Values::Range(1e-3, 1000.0);
const GATE_DIGITS: Values = Values::Range(3.0, 15.0);
const CHANNELS: Values = Values::Range(1.0, 3.0);
const ATTENUATIONS: &[Value] = &[Value::Int(1), Value::Int(10)];
const IMPEDANCES: &[Value] = &[Value::Float(50.0), Value::Float(1e6)];

pub trait Counter: Model {
    /// Supported functions and the token the counter expects for each.
    const FUNCTIONS: &'static [(Function, &'static str)];
    const GATES: &'static [GateKind];

    fn function(&self) -> Function;
    fn select(&mut self, function: Function);

    fn wire_name(function: Function) -> Result<&'static str> {
        Self::FUNCTIONS
            .iter()
            .find(|(f, _)| *f == function)
            .map(|(_, token)| *token)
            .ok_or_else(|| {
                ValidationError::NotInSet {
                    value: function.to_string(),
                }
                .into()
            })
    }
}

impl<T: Transport, M: Counter> Instrument<T, M> {
    pub fn function(&self) -> Function {
        self.model().function()
    }

    /// Selects the measurement function, optionally on a given channel.
    pub fn set_function(&mut self, function: Function, channel: Option<u8>) -> Result<()> {
        let token = M::wire_name(function)?;
        let command = match channel {
            Some(channel) => {
                strict_discrete_set(Value::from(channel as u32), &CHANNELS)?;
                format!("FUNC '{} {}'", token, channel)
            }
            None => format!("FUNC '{}'", token),
        };
        self.write(&command)?;
        self.model_mut().select(function);
        self.mark_configured();
        Ok(())
    }

    pub fn gate(&mut self, gate: Gate) -> Result<()> {
        if !M::GATES.contains(&gate.kind()) {
            return Err(ValidationError::NotInSet {
                value: format!("{:?}", gate.kind()),
            }
            .into());
        }
        let stop = match gate {
            Gate::Time(seconds) => {
                let seconds = strict_range(Value::Float(seconds), &GATE_TIMES)?;
                vec![
                    ":FREQ:ARM:STOP:SOUR TIM".to_string(),
                    format_command(":FREQ:ARM:STOP:TIM %f", &seconds)?,
                ]
            }
            Gate::Digits(digits) => {
                let digits = strict_range(Value::from(digits as u32), &GATE_DIGITS)?;
                vec![
                    ":FREQ:ARM:STOP:SOUR DIG".to_string(),
                    format_command(":FREQ:ARM:STOP:DIG %d", &digits)?,
                ]
            }
        };
        self.write(":FREQ:ARM:STAR:SOUR IMM")?;
        for command in &stop {
            self.write(command)?;
        }
        self.mark_configured();
        Ok(())
    }

    pub fn input(&mut self, setting: InputSetting, channel: u8) -> Result<()> {
        let channel = strict_discrete_set(Value::from(channel as u32), &CHANNELS)?;
        let (template, value) = match setting {
            InputSetting::Attenuation(factor) => (
                ":INP%d:ATT %d",
                strict_discrete_set(Value::from(factor), &Values::Set(ATTENUATIONS))?,
            ),
            InputSetting::Coupling(coupling) => (":INP%d:COUP %s", Value::from(coupling.token())),
            InputSetting::Impedance(ohms) => (
                ":INP%d:IMP %f",
                strict_discrete_set(Value::Float(ohms), &Values::Set(IMPEDANCES))?,
            ),
        };
        let command = format_command(template, &Value::List(vec![channel, value]))?;
        self.write(&command)?;
        self.mark_configured();
        Ok(())
    }

    /// Runs one measurement of the selected function.
    pub fn measure(&mut self) -> Result<f64> {
        let token = M::wire_name(self.function())?;
        let fetch = format!("FETC:{}?", token);
        self.measure_when_complete("INIT", "*OPC?", &fetch)
    }

    pub fn measure_gated(&mut self, gate: Gate) -> Result<f64> {
        self.gate(gate)?;
        self.measure()
    }
}
