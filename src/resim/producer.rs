//! ReSimulator producer configuration.
//!
//! Wraps a [`ResimulationSelection`] and the simulated detector in the
//! producer record the engine instantiates. The engine reads a flat list of
//! event/run pairs plus two flags, with `-1` standing for "any run".

use super::selection::{ResimulationSelection, SelectionMode};
use crate::detector::DetectorSetup;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Engine class implementing resimulation.
pub const RESIMULATOR_CLASS: &str = "simcore::ReSimulator";

/// Engine module the resimulator lives in.
pub const SIMCORE_MODULE: &str = "SimCore";

/// Run number the engine interprets as "any run".
pub const ANY_RUN: i64 = -1;

/// Event/run pair as the engine reads it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EventToResimEntry {
    pub event: u64,
    pub run: i64,
}

/// Producer record for the resimulation step.
///
/// A resimulation has to reproduce the simulation that wrote its input, so
/// the record carries the same detector setup as the job's simulator. The
/// engine-facing flags and event list are derived from the selection when
/// serialized and cannot drift from it.
#[derive(Clone, Debug)]
pub struct ReSimulator {
    instance_name: String,
    detector: DetectorSetup,
    selection: ResimulationSelection,
}

impl ReSimulator {
    /// Creates the producer record for `selection` on the simulated `detector`.
    pub fn new(instance_name: &str, detector: &DetectorSetup, selection: ResimulationSelection) -> Self {
        Self {
            instance_name: instance_name.to_string(),
            detector: detector.clone(),
            selection,
        }
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn class_name(&self) -> &'static str {
        RESIMULATOR_CLASS
    }

    pub fn module_name(&self) -> &'static str {
        SIMCORE_MODULE
    }

    /// Detector setup copied from the originating simulation.
    pub fn detector(&self) -> &DetectorSetup {
        &self.detector
    }

    pub fn selection(&self) -> &ResimulationSelection {
        &self.selection
    }

    pub fn resimulate_all_events(&self) -> bool {
        self.selection.resimulate_all_events()
    }

    pub fn care_about_run(&self) -> bool {
        self.selection.care_about_run()
    }

    /// Event/run pairs in the engine's encoding, [`ANY_RUN`] for no constraint.
    pub fn events_to_resimulate(&self) -> Vec<EventToResimEntry> {
        self.selection
            .targets()
            .iter()
            .map(|t| EventToResimEntry {
                event: t.event,
                // runs are bounded by MAX_RUN when the selection is built
                run: t.run.map_or(ANY_RUN, |r| r as i64),
            })
            .collect()
    }

    /// Filter predicate the driver applies to each input event.
    pub fn accepts(&self, event: u64, run: u64) -> bool {
        self.selection.accepts(event, run)
    }
}

impl Serialize for ReSimulator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("ReSimulator", 9)?;
        record.serialize_field("instanceName", &self.instance_name)?;
        record.serialize_field("className", RESIMULATOR_CLASS)?;
        record.serialize_field("moduleName", SIMCORE_MODULE)?;
        record.serialize_field("detector", &self.detector.detector)?;
        record.serialize_field("resimulate_all_events", &self.resimulate_all_events())?;
        record.serialize_field("care_about_run", &self.care_about_run())?;
        record.serialize_field("events_to_resimulate", &self.events_to_resimulate())?;
        record.serialize_field("sensitive_detectors", &self.detector.sensitive_detectors)?;
        record.serialize_field("hcal_geometry", &self.detector.hcal_geometry)?;
        record.end()
    }
}

impl fmt::Display for ReSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) on {}: ",
            self.instance_name, RESIMULATOR_CLASS, self.detector.detector
        )?;
        match self.selection.mode() {
            SelectionMode::All => write!(f, "all events"),
            mode => {
                let targets = self
                    .selection
                    .targets()
                    .iter()
                    .map(|t| match t.run {
                        Some(run) => format!("{}/{}", t.event, run),
                        None => t.event.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{mode:?} [{targets}]")
            }
        }
    }
}
