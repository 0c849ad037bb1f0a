use benchtop::{
    instruments::agilent_53132a::Agilent53132A,
    protocols::Exchange,
    Instrument, LogObserver, Simulated, State,
};

fn counter(responses: Vec<&str>) -> Instrument<Simulated, Agilent53132A> {
    Instrument::new(Simulated::with_responses(responses), Agilent53132A::default())
        .with_observer(LogObserver)
}

fn fetch_position(exchanges: &[Exchange]) -> usize {
    exchanges
        .iter()
        .position(|e| matches!(e, Exchange::Ask(c, _) if c == "FETC:FREQ?"))
        .unwrap()
}

#[test]
fn empty_responses_are_read_until_the_sentinel() {
    for n in 0..6 {
        let mut responses = vec![""; n];
        responses.push("1");
        responses.push("+1.00000000000E+007");
        let mut counter = counter(responses);

        assert_eq!(counter.measure().unwrap(), 1e7);

        let device = counter.transport().unwrap();
        assert_eq!(fetch_position(device.exchanges()), n + 2);
        assert_eq!(device.operations(), n + 3);
        assert_eq!(device.pending(), 0);
    }
}

#[test]
fn immediate_sentinel_takes_two_operations() {
    let mut counter = counter(vec!["1", "50.0E+03"]);
    assert_eq!(counter.measure().unwrap(), 50e3);
    assert_eq!(
        counter.transport().unwrap().exchanges(),
        &[
            Exchange::Write("INIT".to_string()),
            Exchange::Ask("*OPC?".to_string(), "1".to_string()),
            Exchange::Ask("FETC:FREQ?".to_string(), "50.0E+03".to_string()),
        ]
    );
}

#[test]
fn silent_device_times_out_without_retries() {
    let mut counter = counter(vec!["", "", ""]);
    let error = counter.measure().unwrap_err();
    assert!(error.is_timeout());
    assert_eq!(counter.state(), State::Connected);
    // trigger, query and two empty reads; the failed read leaves no record
    assert_eq!(counter.transport().unwrap().operations(), 4);
}

#[test]
fn fetch_timeout_propagates() {
    let mut counter = counter(vec!["1"]);
    assert!(counter.measure().unwrap_err().is_timeout());
    assert_eq!(
        counter.transport().unwrap().writes(),
        vec!["INIT", "*OPC?", "FETC:FREQ?"]
    );
}
