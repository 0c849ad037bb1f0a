//! The instrument base.
//!
//! An [`Instrument`] owns one transport and is bound to one [`Model`], whose
//! property table turns named attributes into command strings. Drivers are
//! models: a description, a property table, and a few commands.

use std::time::Duration;

use crate::{
    error::{communication_error, Error, Result},
    observer::{NoopObserver, Observer},
    property::{Property, Registry},
    protocols::Transport,
    scpi::{common, Command, DeviceError, EventStatusByte, StatusByte},
    value::{parse_float, parse_response, Param, Value},
};

pub mod agilent_53132a;
pub mod counter;
pub mod fluke_pm6666;
pub mod keithley2000;
pub mod keithley2400;
pub mod sun_ec1;

/// Upper bound on `SYST:ERR?` reads in [`Instrument::check_errors`].
const ERROR_QUEUE_LIMIT: usize = 64;

pub trait Model {
    const DESCRIPTION: &'static str;
    const PROPERTIES: &'static [Property];
    const ID_QUERY: &'static str = "*IDN?";
    /// Commands that restore factory defaults, in order.
    const RESET_SEQUENCE: &'static [&'static str] = &[];
    /// Clears any driver-side state after the reset sequence.
    fn on_reset(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Connected,
    Configured,
    /// Only while a completion poll is running.
    Measuring,
    Closed,
}

pub struct Instrument<T: Transport, M: Model> {
    transport: Option<T>,
    model: M,
    name: String,
    delay: Option<Duration>,
    state: State,
    observer: Box<dyn Observer>,
}

impl<T: Transport, M: Model> Instrument<T, M> {
    pub fn new(transport: T, model: M) -> Self {
        Self {
            transport: Some(transport),
            model,
            name: M::DESCRIPTION.to_string(),
            delay: None,
            state: State::Connected,
            observer: Box::new(NoopObserver),
        }
    }

    pub fn with_observer<O: Observer + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Wait between the write and the read of every query.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn properties(&self) -> Registry {
        Registry::new(M::PROPERTIES)
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    fn transition(&mut self, to: State) {
        if self.state != to {
            let from = self.state;
            self.state = to;
            self.observer.on_state_change(&self.name, from, to);
        }
    }

    pub(crate) fn mark_configured(&mut self) {
        if self.state == State::Connected {
            self.transition(State::Configured);
        }
    }

    pub fn write(&mut self, command: &str) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(Error::Closed)?;
        self.observer.on_write(&self.name, command);
        transport.write(command)
    }

    pub fn read(&mut self) -> Result<String> {
        let transport = self.transport.as_mut().ok_or(Error::Closed)?;
        let response = transport.read()?;
        self.observer.on_read(&self.name, &response);
        Ok(response)
    }

    pub fn ask(&mut self, command: &str) -> Result<String> {
        let transport = self.transport.as_mut().ok_or(Error::Closed)?;
        self.observer.on_write(&self.name, command);
        let response = match self.delay {
            Some(delay) => {
                transport.write(command)?;
                std::thread::sleep(delay);
                transport.read()?
            }
            None => transport.ask(command)?,
        };
        self.observer.on_read(&self.name, &response);
        Ok(response)
    }

    /// Queries `command` and parses the response.
    pub fn values(&mut self, command: &str) -> Result<Value> {
        let response = self.ask(command)?;
        parse_response(&response)
    }

    pub fn get(&mut self, name: &str) -> Result<Value> {
        self.ensure_open()?;
        let property = self.properties().lookup(name)?;
        self.read_property(property)
    }

    /// A response that does not convert to `P` is [`Error::Communication`].
    pub fn get_as<P: Param>(&mut self, name: &str) -> Result<P> {
        let value = self.get(name)?;
        P::from_value(value).map_err(communication_error)
    }

    pub fn set<V: Into<Value>>(&mut self, name: &str, value: V) -> Result<()> {
        self.ensure_open()?;
        let property = self.properties().lookup(name)?;
        self.write_property(property, value.into())
    }

    pub fn read_property(&mut self, property: &Property) -> Result<Value> {
        self.ensure_open()?;
        let command = property
            .get_command()
            .ok_or(Error::NotReadable(property.name()))?;
        let response = self.ask(command)?;
        property.decode(&response)
    }

    /// Nothing is written unless `value` passes the property's validator.
    pub fn write_property(&mut self, property: &Property, value: Value) -> Result<()> {
        self.ensure_open()?;
        let command = property.encode(value)?;
        self.write(&command)?;
        self.mark_configured();
        Ok(())
    }

    /// Triggers a measurement, waits for the operation-complete sentinel and
    /// fetches the result.
    ///
    /// While the response to `opc_query` is empty the device is read again,
    /// without a new query, until something arrives. There is no retry limit:
    /// the transport's read timeout is the only way out of a silent device.
    pub fn measure_when_complete(
        &mut self,
        trigger: &str,
        opc_query: &str,
        fetch: &str,
    ) -> Result<f64> {
        self.ensure_open()?;
        let resume = self.state;
        self.transition(State::Measuring);
        let result = self.poll_completion(trigger, opc_query, fetch);
        self.transition(resume);
        result
    }

    fn poll_completion(&mut self, trigger: &str, opc_query: &str, fetch: &str) -> Result<f64> {
        self.write(trigger)?;
        let mut response = self.ask(opc_query)?;
        let mut attempt = 0;
        while response.trim().is_empty() {
            attempt += 1;
            self.observer.on_poll(&self.name, attempt);
            response = self.read()?;
        }
        let fetched = self.ask(fetch)?;
        parse_float(&fetched)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.ensure_open()?;
        for command in M::RESET_SEQUENCE {
            self.write(command)?;
        }
        self.model.on_reset();
        self.mark_configured();
        Ok(())
    }

    /// Releases the transport. Every later access fails with
    /// [`Error::Closed`].
    pub fn close(&mut self) -> Result<T> {
        let transport = self.transport.take().ok_or(Error::Closed)?;
        self.transition(State::Closed);
        Ok(transport)
    }

    pub fn id(&mut self) -> Result<String> {
        Ok(self.ask(M::ID_QUERY)?.trim().to_string())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.write(common::CLS)
    }

    pub fn event_status(&mut self) -> Result<EventStatusByte> {
        self.ask(Command::new(common::ESR).query().as_ref())?.parse()
    }

    pub fn status_byte(&mut self) -> Result<StatusByte> {
        self.ask(Command::new(common::STB).query().as_ref())?.parse()
    }

    pub fn set_event_enable(&mut self, mask: EventStatusByte) -> Result<()> {
        self.write(Command::new(common::ESE).para(mask.to_string()).as_ref())
    }

    pub fn set_service_enable(&mut self, mask: StatusByte) -> Result<()> {
        self.write(Command::new(common::SRE).para(mask.to_string()).as_ref())
    }

    pub fn next_error(&mut self) -> Result<DeviceError> {
        self.ask(Command::new(common::SYST_ERR).query().as_ref())?
            .parse()
    }

    /// Drains the error queue.
    pub fn check_errors(&mut self) -> Result<Vec<DeviceError>> {
        let mut errors = Vec::new();
        for _ in 0..ERROR_QUEUE_LIMIT {
            let error = self.next_error()?;
            if !error.is_error() {
                break;
            }
            errors.push(error);
        }
        Ok(errors)
    }
}

pub trait Readable {
    fn get(&mut self, name: &str) -> Result<Value>;
}

pub trait Writable {
    fn set(&mut self, name: &str, value: Value) -> Result<()>;
}

pub trait Resettable {
    fn reset(&mut self) -> Result<()>;
}

impl<T: Transport, M: Model> Readable for Instrument<T, M> {
    fn get(&mut self, name: &str) -> Result<Value> {
        Instrument::get(self, name)
    }
}

impl<T: Transport, M: Model> Writable for Instrument<T, M> {
    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        Instrument::set(self, name, value)
    }
}

impl<T: Transport, M: Model> Resettable for Instrument<T, M> {
    fn reset(&mut self) -> Result<()> {
        Instrument::reset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        protocols::{Exchange, Simulated},
        validators::{strict_discrete_set, strict_range, ValueMap, Values},
    };
    use std::sync::{Arc, Mutex};

    const MODE_TOKENS: &[(Value, Value)] = &[
        (Value::text("HEAT"), Value::text("HON")),
        (Value::text("COOL"), Value::text("CON")),
    ];
    const TABLE: &[Property] = &[
        Property::control("amplitude", "SOUR:VOLT?", "SOUR:VOLT %g", "Amplitude in V")
            .validate(strict_range, Values::Range(0.0, 10.0)),
        Property::setting("mode", "%s", "Heating or cooling")
            .validate(strict_discrete_set, Values::Map(ValueMap::new(MODE_TOKENS)))
            .map_values(),
        Property::measurement("error", "SYST:ERR?", "Oldest error"),
    ];

    struct Source;

    impl Model for Source {
        const DESCRIPTION: &'static str = "Test source";
        const PROPERTIES: &'static [Property] = TABLE;
        const RESET_SEQUENCE: &'static [&'static str] = &["*RST", "*CLS"];
    }

    fn source(device: Simulated) -> Instrument<Simulated, Source> {
        Instrument::new(device, Source)
    }

    fn exchanges(instrument: &Instrument<Simulated, Source>) -> Vec<Exchange> {
        instrument.transport().unwrap().exchanges().to_vec()
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl Observer for Recorder {
        fn on_write(&mut self, _: &str, command: &str) {
            self.0.lock().unwrap().push(format!("write {}", command));
        }
        fn on_poll(&mut self, _: &str, attempt: usize) {
            self.0.lock().unwrap().push(format!("poll {}", attempt));
        }
        fn on_state_change(&mut self, _: &str, from: State, to: State) {
            self.0.lock().unwrap().push(format!("{:?} -> {:?}", from, to));
        }
    }

    #[test]
    fn writes_and_reads_properties() {
        let mut instrument = source(Simulated::registers());
        assert_eq!(instrument.state(), State::Connected);
        instrument.set("amplitude", 5).unwrap();
        assert_eq!(instrument.state(), State::Configured);
        assert_eq!(instrument.get_as::<f64>("amplitude").unwrap(), 5.0);
        assert_eq!(
            exchanges(&instrument),
            vec![
                Exchange::Write("SOUR:VOLT 5".to_string()),
                Exchange::Ask("SOUR:VOLT?".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn rejected_values_never_reach_the_transport() {
        let mut instrument = source(Simulated::new());
        assert!(instrument.set("amplitude", 12).unwrap_err().is_validation());
        assert!(instrument.set("mode", "BOTH").unwrap_err().is_validation());
        assert!(matches!(
            instrument.get("mode"),
            Err(Error::NotReadable("mode"))
        ));
        assert!(matches!(
            instrument.set("error", 1),
            Err(Error::NotWritable("error"))
        ));
        assert!(matches!(
            instrument.get("frequency"),
            Err(Error::UnknownProperty(_))
        ));
        assert!(exchanges(&instrument).is_empty());
        assert_eq!(instrument.state(), State::Connected);
    }

    #[test]
    fn capability_traits_delegate() {
        fn configure<I: Writable + Resettable>(instrument: &mut I) -> Result<()> {
            instrument.reset()?;
            instrument.set("mode", Value::from("COOL"))
        }
        let mut instrument = source(Simulated::with_responses(vec!["+0,\"No error\""]));
        configure(&mut instrument).unwrap();
        let error = Readable::get(&mut instrument, "error").unwrap();
        assert_eq!(
            error,
            Value::List(vec![Value::Float(0.0), Value::from("No error")])
        );
        assert_eq!(
            instrument.transport().unwrap().writes(),
            vec!["*RST", "*CLS", "CON", "SYST:ERR?"]
        );
    }

    #[test]
    fn completion_poll_reads_until_sentinel() {
        let recorder = Recorder::default();
        let mut instrument = source(Simulated::with_responses(vec!["", "", "1", "+1.0E+06"]))
            .with_observer(recorder.clone());
        let value = instrument
            .measure_when_complete("INIT", "*OPC?", "FETC:FREQ?")
            .unwrap();
        assert_eq!(value, 1e6);
        assert_eq!(instrument.state(), State::Connected);
        assert_eq!(
            exchanges(&instrument),
            vec![
                Exchange::Write("INIT".to_string()),
                Exchange::Ask("*OPC?".to_string(), String::new()),
                Exchange::Read(String::new()),
                Exchange::Read("1".to_string()),
                Exchange::Ask("FETC:FREQ?".to_string(), "+1.0E+06".to_string()),
            ]
        );
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                "Connected -> Measuring",
                "write INIT",
                "write *OPC?",
                "poll 1",
                "poll 2",
                "write FETC:FREQ?",
                "Measuring -> Connected",
            ]
        );
    }

    #[test]
    fn completion_poll_timeout_propagates() {
        let mut instrument = source(Simulated::with_responses(vec!["", ""]));
        let error = instrument
            .measure_when_complete("INIT", "*OPC?", "FETC?")
            .unwrap_err();
        assert!(error.is_timeout());
        assert_eq!(instrument.state(), State::Connected);
    }

    #[test]
    fn unparseable_fetch_is_a_communication_error() {
        let mut instrument = source(Simulated::with_responses(vec!["1", "OVLD"]));
        assert!(matches!(
            instrument.measure_when_complete("INIT", "*OPC?", "FETC?"),
            Err(Error::Communication(_))
        ));
    }

    #[test]
    fn closed_instrument_refuses_everything() {
        let mut instrument = source(Simulated::registers());
        let device = instrument.close().unwrap();
        assert!(device.exchanges().is_empty());
        assert_eq!(instrument.state(), State::Closed);
        assert!(matches!(instrument.get("amplitude"), Err(Error::Closed)));
        assert!(matches!(instrument.set("amplitude", 1), Err(Error::Closed)));
        assert!(matches!(instrument.set("amplitude", 99), Err(Error::Closed)));
        assert!(matches!(instrument.write("*RST"), Err(Error::Closed)));
        assert!(matches!(instrument.reset(), Err(Error::Closed)));
        assert!(matches!(
            instrument.measure_when_complete("INIT", "*OPC?", "FETC?"),
            Err(Error::Closed)
        ));
        assert!(matches!(instrument.close(), Err(Error::Closed)));
    }

    #[test]
    fn status_and_error_queue() {
        let mut instrument = source(Simulated::with_responses(vec![
            "ACME,Source,0,1.0\n",
            "+36",
            "-113,\"Undefined header\"",
            "-222,\"Data out of range\"",
            "0,\"No error\"",
        ]));
        assert_eq!(instrument.id().unwrap(), "ACME,Source,0,1.0");
        let esr = instrument.event_status().unwrap();
        assert!(esr.is_command_err() && esr.is_query_err());
        let errors = instrument.check_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, -113);
        assert_eq!(errors[1].message, "Data out of range");
        instrument
            .set_event_enable(EventStatusByte::default().opera_complete())
            .unwrap();
        assert_eq!(
            instrument.transport().unwrap().writes(),
            vec!["*IDN?", "*ESR?", "SYST:ERR?", "SYST:ERR?", "SYST:ERR?", "*ESE 1"]
        );
    }

    #[test]
    fn delay_splits_queries() {
        let mut instrument =
            source(Simulated::with_responses(vec!["5.000"])).with_delay(Duration::from_millis(1));
        assert_eq!(instrument.get("amplitude").unwrap(), Value::Float(5.0));
        assert_eq!(
            exchanges(&instrument),
            vec![
                Exchange::Write("SOUR:VOLT?".to_string()),
                Exchange::Read("5.000".to_string()),
            ]
        );
    }
}
