use benchtop::{
    instruments::{
        agilent_53132a::Agilent53132A, fluke_pm6666::FlukePM6666, keithley2000::Keithley2000,
        keithley2400::Keithley2400, sun_ec1::SunEC1,
    },
    property::Property,
    validators::Values,
    Instrument, Model, Simulated, Value,
};

fn all_properties() -> Vec<&'static Property> {
    Keithley2400::PROPERTIES
        .iter()
        .chain(Keithley2000::PROPERTIES)
        .chain(SunEC1::PROPERTIES)
        .chain(Agilent53132A::PROPERTIES)
        .chain(FlukePM6666::PROPERTIES)
        .collect()
}

#[test]
fn every_value_map_is_a_bijection() {
    let mut maps = 0;
    for property in all_properties() {
        if let Some(Values::Map(map)) = property.domain() {
            maps += 1;
            assert!(map.is_bijective(), "{} map is not a bijection", property.name());
            for key in map.keys() {
                let token = map.forward(key).unwrap();
                assert_eq!(map.reverse(token), Some(key), "{}", property.name());
            }
        }
    }
    assert_eq!(maps, 4);
}

#[test]
fn mapped_properties_decode_what_they_encode() {
    for property in all_properties() {
        let map = match property.domain() {
            Some(Values::Map(map)) if property.is_writable() => map,
            _ => continue,
        };
        for key in map.keys() {
            let command = property.encode(key.clone()).unwrap();
            let token = map.forward(key).unwrap().to_string();
            assert!(command.ends_with(&token), "{} -> {}", key, command);
            assert_eq!(&property.decode(&token).unwrap(), key);
        }
    }
}

#[test]
fn values_inside_the_range_round_trip() {
    let mut source = Instrument::new(Simulated::registers(), Keithley2400);
    let mut meter = Instrument::new(Simulated::registers(), Keithley2000);
    for i in 0..=40 {
        let volts = -210.0 + 10.5 * i as f64 + 0.123;
        let volts = volts.min(210.0);
        source.set("compliance_voltage", volts).unwrap();
        let read: f64 = source.get_as("compliance_voltage").unwrap();
        assert!((read - volts).abs() <= 1e-5 * volts.abs().max(1.0), "{} != {}", read, volts);
    }
    for nplc in &[0.01, 0.1, 1.0, 2.5, 10.0] {
        meter.set("voltage_nplc", *nplc).unwrap();
        assert_eq!(meter.get_as::<f64>("voltage_nplc").unwrap(), *nplc);
    }
}

#[test]
fn rejected_values_perform_zero_transport_operations() {
    let mut source = Instrument::new(Simulated::new(), Keithley2400);
    let mut chamber = Instrument::new(Simulated::new(), SunEC1);
    let mut meter = Instrument::new(Simulated::new(), Keithley2000);

    for amps in &[-1.06, 1.06, 5.0, f64::NAN] {
        assert!(source.set("source_current", *amps).unwrap_err().is_validation());
    }
    assert!(source.set("compliance_voltage", 210.5).unwrap_err().is_validation());
    assert!(source.set("source_mode", "power").unwrap_err().is_validation());
    assert!(source.set("source_current", "high").unwrap_err().is_validation());

    assert!(chamber.set("mode", "BOTH").unwrap_err().is_validation());
    assert!(chamber.set("rate", 31).unwrap_err().is_validation());
    assert!(chamber.set("set_point", -100.0).unwrap_err().is_validation());

    assert!(meter.set("mode", "capacitance").unwrap_err().is_validation());
    assert!(meter.set("voltage_nplc", 0.0).unwrap_err().is_validation());

    assert_eq!(source.transport().unwrap().operations(), 0);
    assert_eq!(chamber.transport().unwrap().operations(), 0);
    assert_eq!(meter.transport().unwrap().operations(), 0);
}

#[test]
fn heat_maps_to_hon() {
    let mut chamber = Instrument::new(Simulated::new(), SunEC1);
    chamber.set("mode", "HEAT").unwrap();
    assert!(chamber.set("mode", "BOTH").unwrap_err().is_validation());
    assert_eq!(chamber.transport().unwrap().writes(), vec!["HON"]);
}

#[test]
fn amplitude_scenario() {
    use benchtop::validators::strict_range;

    const AMPLITUDE: &[Property] = &[Property::control(
        "amplitude",
        "SOUR:VOLT?",
        "SOUR:VOLT %g",
        "Output amplitude in V",
    )
    .validate(strict_range, Values::Range(0.0, 10.0))];

    struct Generator;
    impl Model for Generator {
        const DESCRIPTION: &'static str = "Function generator";
        const PROPERTIES: &'static [Property] = AMPLITUDE;
    }

    let mut generator = Instrument::new(Simulated::with_responses(vec!["5.000"]), Generator);
    assert!(generator.set("amplitude", 12).unwrap_err().is_validation());
    assert_eq!(generator.transport().unwrap().operations(), 0);
    generator.set("amplitude", 5).unwrap();
    assert_eq!(generator.get("amplitude").unwrap(), Value::Float(5.0));
    assert_eq!(
        generator.transport().unwrap().writes(),
        vec!["SOUR:VOLT 5", "SOUR:VOLT?"]
    );
}
