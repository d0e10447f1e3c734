//! Integration tests for the ReSimulator producer record.

use detsim_config::detector::DetectorSetup;
use detsim_config::resim::*;
use detsim_config::{common::render, ConfigError, OutputFormat, SelectionRule};

fn v12_setup() -> DetectorSetup {
    DetectorSetup::for_detector("ldmx-det-v12", false).unwrap()
}

fn resimulator(events: Option<&[u64]>, runs: RunSelector) -> ReSimulator {
    ReSimulator::new("r", &v12_setup(), build_selection(events, runs).unwrap())
}

/// Tests the producer identity.
#[test]
fn test_resimulator_identity() {
    let resim = ReSimulator::new("resim", &v12_setup(), ResimulationSelection::all());
    assert_eq!(resim.instance_name(), "resim");
    assert_eq!(resim.class_name(), RESIMULATOR_CLASS);
    assert_eq!(resim.module_name(), "SimCore");
}

/// Tests the flags for each selection mode.
#[test]
fn test_resimulator_flags() {
    let all = resimulator(None, RunSelector::Any);
    assert!(all.resimulate_all_events());
    assert!(!all.care_about_run());
    assert!(all.events_to_resimulate().is_empty());

    let by_event = resimulator(Some(&[1, 2]), RunSelector::Any);
    assert!(!by_event.resimulate_all_events());
    assert!(!by_event.care_about_run());

    let paired = resimulator(Some(&[1, 2]), RunSelector::Paired(vec![3, 4]));
    assert!(!paired.resimulate_all_events());
    assert!(paired.care_about_run());
}

/// Tests that a missing run is handed over as the "any run" marker.
#[test]
fn test_any_run_marker() {
    let resim = resimulator(Some(&[7]), RunSelector::Any);
    assert_eq!(
        resim.events_to_resimulate(),
        vec![EventToResimEntry { event: 7, run: ANY_RUN }]
    );
}

/// Tests that the largest allowed run survives the engine's signed encoding.
#[test]
fn test_largest_run_is_not_wrapped() {
    let resim = resimulator(Some(&[7]), RunSelector::Shared(MAX_RUN));
    assert_eq!(resim.events_to_resimulate()[0].run, i64::MAX);

    let json = serde_json::to_value(&resim).unwrap();
    assert_eq!(json["events_to_resimulate"][0]["run"], i64::MAX);
}

/// Tests that a run the engine cannot store never reaches the producer.
#[test]
fn test_oversized_run_rejected_before_encoding() {
    let oversized = build_selection(Some(&[7]), RunSelector::Shared(u64::MAX));
    assert!(matches!(
        oversized,
        Err(ConfigError::InvalidSelection(SelectionRule::RunOutOfRange { max: MAX_RUN }))
    ));
}

/// Tests that paired runs always land in events_to_resimulate.
#[test]
fn test_paired_runs_use_events_field() {
    let resim = resimulator(Some(&[5, 6]), RunSelector::Paired(vec![42, 43]));
    let json = serde_json::to_value(&resim).unwrap();
    assert_eq!(json["className"], "simcore::ReSimulator");
    assert_eq!(json["events_to_resimulate"][1]["event"], 6);
    assert_eq!(json["events_to_resimulate"][1]["run"], 43);
    assert!(json.get("runs_to_resimulate").is_none());
}

/// Tests that the handoff is derived from the selection.
#[test]
fn test_handoff_follows_selection() {
    let resim = resimulator(Some(&[5, 6]), RunSelector::Shared(42));
    let json = serde_json::to_value(&resim).unwrap();
    assert_eq!(json["resimulate_all_events"], resim.selection().resimulate_all_events());
    assert_eq!(json["care_about_run"], resim.selection().care_about_run());
    assert_eq!(
        json["events_to_resimulate"].as_array().unwrap().len(),
        resim.selection().targets().len()
    );
}

/// Tests that the resimulator carries the simulated detector.
#[test]
fn test_resimulator_carries_detector() {
    let setup = DetectorSetup::for_detector("ldmx-hcal-prototype-v1.0", true).unwrap();
    let resim = ReSimulator::new("r", &setup, ResimulationSelection::all());
    assert_eq!(resim.detector().detector, setup.detector);
    assert_eq!(resim.detector().sensitive_detectors, setup.sensitive_detectors);

    let json = serde_json::to_value(&resim).unwrap();
    assert_eq!(json["detector"], "ldmx-hcal-prototype-v1.0");
    assert_eq!(
        json["sensitive_detectors"].as_array().unwrap().len(),
        setup.sensitive_detectors.len()
    );
    assert_eq!(json["hcal_geometry"]["NumSections"], 1);
}

/// Tests the filter predicate exposed by the producer.
#[test]
fn test_resimulator_accepts() {
    let resim = resimulator(Some(&[5, 6]), RunSelector::Shared(42));
    assert!(resim.accepts(5, 42));
    assert!(!resim.accepts(5, 41));
    assert!(!resim.accepts(8, 42));
}

/// Tests rendering in every output format.
#[test]
fn test_resimulator_render() {
    let resim = ReSimulator::new(
        "resim",
        &v12_setup(),
        build_selection(Some(&[5]), RunSelector::Shared(42)).unwrap(),
    );

    let toml_text = render(&resim, OutputFormat::Toml).unwrap();
    assert!(toml_text.contains("care_about_run = true"));
    assert!(toml_text.contains("detector = \"ldmx-det-v12\""));

    let text = render(&resim, OutputFormat::Text).unwrap();
    assert_eq!(
        text,
        "resim (simcore::ReSimulator) on ldmx-det-v12: ByEventAndSharedRun [5/42]"
    );

    let all = ReSimulator::new("resim", &v12_setup(), ResimulationSelection::all());
    assert_eq!(
        render(&all, OutputFormat::Text).unwrap(),
        "resim (simcore::ReSimulator) on ldmx-det-v12: all events"
    );
}
