use qviz_core::{
    concept::ConceptId,
    config::RunnerConfig,
    error::VizError,
    params::{ControlKind, ControlSpec, ParamValue, ParameterSet},
    registry::ConceptRegistry,
    scheduler::ManualScheduler,
};

fn wave_runner() -> qviz_core::runner::SimulationRunner<ManualScheduler> {
    ConceptRegistry::standard()
        .mount(ConceptId::WaveParticle, ManualScheduler::default(), &RunnerConfig::default())
        .expect("mount")
}

#[test]
fn value_within_bounds_is_reflected_by_get() {
    let mut runner = wave_runner();
    let stored = runner.adjust("frequency", 2.5, None).expect("in bounds");
    assert_eq!(stored, ParamValue::Number(2.5));
    assert_eq!(runner.parameters().get("frequency"), Some(ParamValue::Number(2.5)));
}

#[test]
fn out_of_bounds_value_is_rejected_by_the_control() {
    let mut runner = wave_runner();
    let err = runner.adjust("frequency", 7.0, None).unwrap_err();
    assert!(matches!(err, VizError::ParameterOutOfBounds { max, .. } if max == 5.0));
    assert_eq!(runner.parameters().number("frequency"), 1.0, "store must be untouched");

    assert!(runner.adjust("amplitude", f64::NAN, None).is_err());
    assert!(runner.adjust("amplitude", 5.0, None).is_err());
}

#[test]
fn mistyped_and_unknown_parameters_are_rejected() {
    let mut runner = wave_runner();
    assert!(matches!(
        runner.adjust("frequency", true, None),
        Err(VizError::ParameterTypeMismatch { .. })
    ));
    assert!(matches!(
        runner.adjust("particle_view", 1.0, None),
        Err(VizError::ParameterTypeMismatch { .. })
    ));
    assert!(matches!(
        runner.adjust("mass", 1.0, None),
        Err(VizError::UnknownParameter { .. })
    ));
}

#[test]
fn off_grid_values_snap_to_step() {
    let control = ControlSpec::slider("amplitude", "Amplitude", 10.0, 100.0, 5.0, 50.0);
    assert_eq!(control.accept(52.0.into()).unwrap(), ParamValue::Number(50.0));
    assert_eq!(control.accept(53.0.into()).unwrap(), ParamValue::Number(55.0));
    assert_eq!(control.accept(100.0.into()).unwrap(), ParamValue::Number(100.0));
}

#[test]
fn snapped_decimals_carry_no_float_noise() {
    let frequency = ControlSpec::slider("frequency", "Frequency", 0.1, 5.0, 0.1, 1.0);
    assert_eq!(frequency.accept(0.37.into()).unwrap(), ParamValue::Number(0.4));
    assert_eq!(frequency.accept(0.66.into()).unwrap(), ParamValue::Number(0.7));
    assert_eq!(frequency.accept(2.94.into()).unwrap(), ParamValue::Number(2.9));

    let potential = ControlSpec::slider("potential", "Potential", 0.5, 3.0, 0.1, 1.0);
    assert_eq!(potential.accept(1.26.into()).unwrap(), ParamValue::Number(1.3));

    let fine = ControlSpec::slider("fine", "Fine", 0.0, 1.0, 0.25, 0.5);
    assert_eq!(fine.accept(0.6.into()).unwrap(), ParamValue::Number(0.5));
}

#[test]
fn toggles_accept_booleans() {
    let mut runner = wave_runner();
    assert_eq!(runner.adjust("particle_view", true, None).unwrap(), ParamValue::Flag(true));
    assert!(runner.parameters().flag("particle_view"));
}

#[test]
fn parameter_set_trusts_its_caller() {
    let controls = vec![ControlSpec::slider("energy", "Energy", 10.0, 120.0, 5.0, 50.0)];
    let mut params = ParameterSet::from_controls(&controls);
    params.set("energy", ParamValue::Number(999.0)).expect("set never re-validates");
    assert_eq!(params.number("energy"), 999.0);
    assert!(params.set("nope", ParamValue::Number(1.0)).is_err());
}

#[test]
fn every_default_sits_inside_its_bounds() {
    let registry = ConceptRegistry::standard();
    for info in registry.catalog() {
        assert!(!info.controls.is_empty(), "{} has no controls", info.id);
        for control in &info.controls {
            if let ControlKind::Slider { min, max, default, .. } = control.kind {
                assert!(min <= default && default <= max, "{}.{}", info.id, control.name);
            }
            let default = control.default_value();
            assert_eq!(control.accept(default).expect("default accepted"), default);
        }
    }
}

#[test]
fn param_values_serialize_as_plain_json() {
    assert_eq!(serde_json::to_string(&ParamValue::Flag(true)).unwrap(), "true");
    assert_eq!(serde_json::to_string(&ParamValue::Number(2.5)).unwrap(), "2.5");
    let parsed: ParamValue = serde_json::from_str("false").unwrap();
    assert_eq!(parsed, ParamValue::Flag(false));
}
