//! Keithley 2000 digital multimeter.

use super::{Instrument, Model};
use crate::{
    error::Result,
    property::Property,
    protocols::Transport,
    validators::{strict_discrete_set, strict_range, truncated_range, ValueMap, Values},
    value::Value,
};

const MODES: &[(Value, Value)] = &[
    (Value::text("current"), Value::text("CURR:DC")),
    (Value::text("current ac"), Value::text("CURR:AC")),
    (Value::text("voltage"), Value::text("VOLT:DC")),
    (Value::text("voltage ac"), Value::text("VOLT:AC")),
    (Value::text("resistance"), Value::text("RES")),
    (Value::text("resistance 4W"), Value::text("FRES")),
    (Value::text("period"), Value::text("PER")),
    (Value::text("frequency"), Value::text("FREQ")),
    (Value::text("temperature"), Value::text("TEMP")),
    (Value::text("diode"), Value::text("DIOD")),
    (Value::text("continuity"), Value::text("CONT")),
];

const PROPERTIES: &[Property] = &[
    Property::control("mode", ":CONF?", ":CONF:%s", "Measurement mode")
        .validate(strict_discrete_set, Values::Map(ValueMap::new(MODES)))
        .map_values(),
    Property::control(
        "voltage_range",
        ":SENS:VOLT:RANG?",
        ":SENS:VOLT:RANG:AUTO 0;:SENS:VOLT:RANG %g",
        "DC voltage range in V; disables auto-ranging",
    )
    .validate(truncated_range, Values::Range(0.0, 1010.0)),
    Property::control(
        "voltage_nplc",
        ":SENS:VOLT:NPLC?",
        ":SENS:VOLT:NPLC %g",
        "Integration time in power line cycles",
    )
    .validate(strict_range, Values::Range(0.01, 10.0)),
    Property::measurement("voltage", ":READ?", "Reading in V"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keithley2000;

impl Model for Keithley2000 {
    const DESCRIPTION: &'static str = "Keithley 2000 Multimeter";
    const PROPERTIES: &'static [Property] = PROPERTIES;
    const RESET_SEQUENCE: &'static [&'static str] = &[":STAT:QUE:CLE", "*RST", ":STAT:PRES", "*CLS"];
}

pub fn connect<T: Transport>(transport: T) -> Result<Instrument<T, Keithley2000>> {
    Ok(Instrument::new(transport, Keithley2000))
}
