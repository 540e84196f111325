use qviz_core::{
    concept::ConceptId,
    config::AppConfig,
    params::ParamValue,
    registry::ConceptRegistry,
    scheduler::ManualScheduler,
    store::KvStore,
};
use qviz_tools::headless::{parse_override, run_headless, HeadlessOptions};

fn store() -> KvStore {
    let store = KvStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn options(concept: ConceptId, frames: u64) -> HeadlessOptions {
    HeadlessOptions { concept, frames, overrides: Vec::new(), actions: Vec::new(), svg_path: None }
}

#[test]
fn completed_run_is_recorded_in_progress() {
    let store = store();
    let config = AppConfig::default_test().runner;
    let summary = run_headless(
        &ConceptRegistry::standard(),
        ManualScheduler::new(config.nominal_fps),
        &config,
        &options(ConceptId::Tunneling, 250),
        Some(&store),
    )
    .expect("headless run");

    assert_eq!(summary.rendered, 250);
    assert!(summary.snapshot.completed);
    let progress = summary.progress.expect("progress");
    assert!(progress.simulations_completed.contains("tunneling"));
    assert_eq!(store.load_progress().unwrap(), progress);
}

#[test]
fn short_run_records_nothing() {
    let store = store();
    let config = AppConfig::default_test().runner;
    let summary = run_headless(
        &ConceptRegistry::standard(),
        ManualScheduler::default(),
        &config,
        &options(ConceptId::DoubleSlit, 30),
        Some(&store),
    )
    .unwrap();
    assert!(!summary.snapshot.completed);
    assert!(summary.progress.unwrap().simulations_completed.is_empty());
}

#[test]
fn overrides_apply_before_the_run() {
    let config = AppConfig::default_test().runner;
    let mut opts = options(ConceptId::Uncertainty, 5);
    opts.overrides.push(parse_override("position_uncertainty=20").unwrap());
    let summary = run_headless(&ConceptRegistry::standard(), ManualScheduler::default(), &config, &opts, None)
        .unwrap();
    assert_eq!(
        summary.snapshot.parameters.get("position_uncertainty"),
        Some(ParamValue::Number(20.0))
    );
    assert!(summary.progress.is_none());

    let mut bad = options(ConceptId::Uncertainty, 5);
    bad.overrides.push(parse_override("position_uncertainty=500").unwrap());
    assert!(run_headless(&ConceptRegistry::standard(), ManualScheduler::default(), &config, &bad, None).is_err());
}

#[test]
fn override_parsing() {
    assert_eq!(parse_override("observing=true").unwrap(), ("observing".into(), ParamValue::Flag(true)));
    assert_eq!(parse_override("energy=90").unwrap(), ("energy".into(), ParamValue::Number(90.0)));
    assert!(parse_override("energy").is_err());
    assert!(parse_override("energy=lots").is_err());
}

#[test]
fn final_frame_is_written_as_svg() {
    let path = std::env::temp_dir().join(format!("qviz-headless-{}.svg", std::process::id()));
    let config = AppConfig::default_test().runner;
    let mut opts = options(ConceptId::WaveParticle, 10);
    opts.svg_path = Some(path.to_string_lossy().to_string());
    run_headless(&ConceptRegistry::standard(), ManualScheduler::default(), &config, &opts, None).unwrap();

    let svg = std::fs::read_to_string(&path).expect("svg written");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<polyline"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn actions_fire_after_the_frames() {
    let config = AppConfig::default_test().runner;
    let mut opts = options(ConceptId::QubitCircuit, 5);
    opts.overrides.push(("target_qubit".into(), ParamValue::Number(1.0)));
    opts.actions = vec!["gate_h".into(), "measure".into()];
    let summary = run_headless(
        &ConceptRegistry::standard(),
        ManualScheduler::new(config.nominal_fps),
        &config,
        &opts,
        None,
    )
    .expect("headless run");

    assert_eq!(summary.rendered, 5);
    assert_eq!(summary.snapshot.counters.measurements, 1);
}

#[test]
fn unknown_action_fails_the_run() {
    let config = AppConfig::default_test().runner;
    let mut opts = options(ConceptId::Tunneling, 1);
    opts.actions = vec!["measure".into()];
    let result = run_headless(
        &ConceptRegistry::standard(),
        ManualScheduler::new(config.nominal_fps),
        &config,
        &opts,
        None,
    );
    assert!(result.is_err());
}
