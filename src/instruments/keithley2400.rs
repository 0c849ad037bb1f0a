//! Keithley 2400 SourceMeter.

use super::{Instrument, Model};
use crate::{
    error::{communication_error, Result},
    property::Property,
    protocols::Transport,
    validators::{strict_discrete_set, strict_range, truncated_range, ValueMap, Values},
    value::Value,
};

const SOURCE_MODES: &[(Value, Value)] = &[
    (Value::text("current"), Value::text("CURR")),
    (Value::text("voltage"), Value::text("VOLT")),
];
const ON_OFF: &[(Value, Value)] = &[(Value::Bool(true), Value::Int(1)), (Value::Bool(false), Value::Int(0))];

const CURRENTS: Values = Values::Range(-1.05, 1.05);
const VOLTAGES: Values = Values::Range(-210.0, 210.0);

/// `:READ?` returns voltage, current, resistance, timestamp and status.
fn element(value: Value, index: usize) -> Result<Value> {
    match value {
        Value::List(items) => {
            let len = items.len();
            items.into_iter().nth(index).ok_or_else(|| {
                communication_error(format!("reading has {} elements, wanted #{}", len, index))
            })
        }
        scalar => Ok(scalar),
    }
}

fn voltage_element(value: Value) -> Result<Value> {
    element(value, 0)
}

fn current_element(value: Value) -> Result<Value> {
    element(value, 1)
}

const PROPERTIES: &[Property] = &[
    Property::control("source_mode", ":SOUR:FUNC?", ":SOUR:FUNC %s", "Source function, 'current' or 'voltage'")
        .validate(strict_discrete_set, Values::Map(ValueMap::new(SOURCE_MODES)))
        .map_values(),
    Property::measurement("source_enabled", "OUTP?", "Whether the output is on")
        .values(Values::Map(ValueMap::new(ON_OFF)))
        .map_values(),
    Property::control("source_current", ":SOUR:CURR?", ":SOUR:CURR:LEV %g", "Source current in A")
        .validate(strict_range, CURRENTS),
    Property::control(
        "source_current_range",
        ":SOUR:CURR:RANG?",
        ":SOUR:CURR:RANG:AUTO 0;:SOUR:CURR:RANG %g",
        "Source current range in A; disables auto-ranging",
    )
    .validate(truncated_range, CURRENTS),
    Property::control("source_voltage", ":SOUR:VOLT?", ":SOUR:VOLT:LEV %g", "Source voltage in V")
        .validate(strict_range, VOLTAGES),
    Property::control(
        "source_voltage_range",
        ":SOUR:VOLT:RANG?",
        ":SOUR:VOLT:RANG:AUTO 0;:SOUR:VOLT:RANG %g",
        "Source voltage range in V; disables auto-ranging",
    )
    .validate(truncated_range, VOLTAGES),
    Property::control("compliance_current", ":SENS:CURR:PROT?", ":SENS:CURR:PROT %g", "Compliance current in A")
        .validate(strict_range, CURRENTS),
    Property::control("compliance_voltage", ":SENS:VOLT:PROT?", ":SENS:VOLT:PROT %g", "Compliance voltage in V")
        .validate(strict_range, VOLTAGES),
    Property::measurement("current", ":READ?", "Measured current in A").get_process(current_element),
    Property::measurement("voltage", ":READ?", "Measured voltage in V").get_process(voltage_element),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keithley2400;

impl Model for Keithley2400 {
    const DESCRIPTION: &'static str = "Keithley 2400 SourceMeter";
    const PROPERTIES: &'static [Property] = PROPERTIES;
    const RESET_SEQUENCE: &'static [&'static str] = &[":STAT:QUE:CLE", "*RST", ":STAT:PRES", "*CLS"];
}

pub fn connect<T: Transport>(transport: T) -> Result<Instrument<T, Keithley2400>> {
    Ok(Instrument::new(transport, Keithley2400))
}

impl<T: Transport> Instrument<T, Keithley2400> {
    pub fn enable_source(&mut self) -> Result<()> {
        self.write("OUTP ON")
    }

    pub fn disable_source(&mut self) -> Result<()> {
        self.write("OUTP OFF")
    }

    /// Brings the active source level to zero, then turns the output off.
    pub fn shutdown(&mut self) -> Result<()> {
        let mode: String = self.get_as("source_mode")?;
        let level = if mode == "current" {
            "source_current"
        } else {
            "source_voltage"
        };
        self.set(level, 0.0)?;
        self.disable_source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::Simulated;

    #[test]
    fn configures_a_current_source() {
        let mut source = connect(Simulated::new()).unwrap();
        source.set("source_mode", "current").unwrap();
        source.set("source_current_range", 10e-3).unwrap();
        source.set("compliance_voltage", 10).unwrap();
        source.enable_source().unwrap();
        source.set("source_current", -0.005).unwrap();
        assert_eq!(
            source.transport().unwrap().writes(),
            vec![
                ":SOUR:FUNC CURR",
                ":SOUR:CURR:RANG:AUTO 0;:SOUR:CURR:RANG 0.01",
                ":SENS:VOLT:PROT 10",
                "OUTP ON",
                ":SOUR:CURR:LEV -0.005",
            ]
        );
    }

    #[test]
    fn ranges_are_clamped_levels_are_not() {
        let mut source = connect(Simulated::new()).unwrap();
        source.set("source_voltage_range", 500.0).unwrap();
        assert!(source.set("source_voltage", 500.0).unwrap_err().is_validation());
        assert!(source.set("source_mode", "resistance").unwrap_err().is_validation());
        assert_eq!(
            source.transport().unwrap().writes(),
            vec![":SOUR:VOLT:RANG:AUTO 0;:SOUR:VOLT:RANG 210"]
        );
    }

    #[test]
    fn reads_elements_of_a_reading() {
        let reading = "+1.000000E+00,+1.000000E-03,+9.910000E+37,+1.234E+02,+2.150800E+04";
        let mut source = connect(Simulated::with_responses(vec![reading, reading, "1"])).unwrap();
        assert_eq!(source.get_as::<f64>("voltage").unwrap(), 1.0);
        assert_eq!(source.get_as::<f64>("current").unwrap(), 1e-3);
        assert_eq!(source.get("source_enabled").unwrap(), Value::Bool(true));
    }

    #[test]
    fn shutdown_zeroes_the_active_source() {
        let mut source = connect(Simulated::with_responses(vec!["VOLT"])).unwrap();
        source.shutdown().unwrap();
        assert_eq!(
            source.transport().unwrap().writes(),
            vec![":SOUR:FUNC?", ":SOUR:VOLT:LEV 0", "OUTP OFF"]
        );
    }
}
