//! Sun Electronic Systems EC1 environment chamber.
//!
//! After power-up the chamber ignores everything until it receives `ON`, so
//! always bind it with [`connect`].

use super::{Instrument, Model};
use crate::{
    error::Result,
    property::Property,
    protocols::Transport,
    validators::{strict_discrete_set, strict_range, ValueMap, Values},
    value::Value,
};

/// Full EC1A range in °C.
pub const CHAMBER_TEMPS: Values = Values::Range(-73.0, 315.0);
/// Commercial range, 0 to 70 °C with 1 °C margin.
pub const COMMERCIAL_TEMPS: Values = Values::Range(-1.0, 71.0);
/// Industrial range, -40 to 85 °C with 1 °C margin.
pub const INDUSTRIAL_TEMPS: Values = Values::Range(-41.0, 86.0);
/// Military range, -55 to 125 °C with 1 °C margin.
pub const MILITARY_TEMPS: Values = Values::Range(-56.0, 126.0);

/// Seconds to dwell at a set temperature.
pub const DEFAULT_DWELL: u64 = 60;
/// Ramp rate while reaching the first set point, °C/min.
pub const TEMP_RATE_INIT: i64 = 20;
/// Ramp rate between measurement points, °C/min.
pub const TEMP_RATE_MEASURE: i64 = 10;
pub const MAX_RATE: i64 = 30;

const MODE_TOKENS: &[(Value, Value)] = &[
    (Value::text("HEAT"), Value::text("HON")),
    (Value::text("COOL"), Value::text("CON")),
];

const MODE: Property = Property::setting("mode", "%s", "Enable heating (HEAT) or cooling (COOL)")
    .validate(strict_discrete_set, Values::Map(ValueMap::new(MODE_TOKENS)))
    .map_values();
const RATE: Property = Property::setting("rate", "RATE=%d", "Ramp rate in °C/min")
    .validate(strict_range, Values::Range(0.0, MAX_RATE as f64));

const PROPERTIES: &[Property] = &[
    MODE,
    RATE,
    Property::control("set_point", "SET?", "SET=%.1f", "Set point in °C")
        .validate(strict_range, CHAMBER_TEMPS),
    Property::measurement("temperature", "TEMP?", "Chamber temperature in °C"),
    Property::measurement("user_temperature", "UCHAN?", "User probe temperature in °C"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SunEC1;

impl Model for SunEC1 {
    const DESCRIPTION: &'static str = "Sun Electronic EC1 Environment Chamber";
    const PROPERTIES: &'static [Property] = PROPERTIES;
    const ID_QUERY: &'static str = "VER?";
    const RESET_SEQUENCE: &'static [&'static str] = &["HOFF", "COFF"];
}

pub fn connect<T: Transport>(transport: T) -> Result<Instrument<T, SunEC1>> {
    let mut chamber = Instrument::new(transport, SunEC1);
    chamber.write("ON")?;
    Ok(chamber)
}

impl<T: Transport> Instrument<T, SunEC1> {
    /// Enables each of the whitespace-separated `modes` (`"HEAT"`, `"COOL"`
    /// or `"HEAT COOL"`) and sets the ramp rate. Every token and the rate
    /// are checked before anything is written.
    pub fn set_modes(&mut self, modes: &str, rate: i64) -> Result<()> {
        let mut commands = modes
            .split_whitespace()
            .map(|mode| MODE.encode(Value::from(mode.to_string())))
            .collect::<Result<Vec<_>>>()?;
        commands.push(RATE.encode(Value::Int(rate))?);
        for command in &commands {
            self.write(command)?;
        }
        self.mark_configured();
        Ok(())
    }

    pub fn temperature(&mut self) -> Result<f64> {
        self.get_as("temperature")
    }

    pub fn set_point(&mut self, celsius: f64) -> Result<()> {
        self.set("set_point", celsius)
    }
}
