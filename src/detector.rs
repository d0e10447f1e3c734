//! Detector Setup.
//!
//! Maps a detector name to the sensitive detectors the simulation must load
//! and to the Hcal readout geometry reconstruction must use.

use crate::common::Result;
use crate::geometry::{HcalGeometry, HcalReadoutGeometry};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// Sensitive detectors known to the simulation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensitiveDetector {
    TrackerTagger,
    TrackerRecoil,
    Hcal,
    Ecal,
    TrigScintTarget,
    TrigScintUp,
    TrigScintTag,
    TrigScintDown,
    TrigScintTestbeam,
    TrigScintPad1,
    TrigScintPad2,
    TrigScintPad3,
    ScoringPlaneEcal,
    ScoringPlaneHcal,
    ScoringPlaneTarget,
    ScoringPlaneTrigScint,
    ScoringPlaneTracker,
    ScoringPlaneMagnet,
}

impl SensitiveDetector {
    /// Scoring planes added when a setup includes them.
    pub const SCORING_PLANES: [SensitiveDetector; 6] = [
        SensitiveDetector::ScoringPlaneEcal,
        SensitiveDetector::ScoringPlaneHcal,
        SensitiveDetector::ScoringPlaneTarget,
        SensitiveDetector::ScoringPlaneTrigScint,
        SensitiveDetector::ScoringPlaneTracker,
        SensitiveDetector::ScoringPlaneMagnet,
    ];

    /// Engine class implementing this sensitive detector.
    pub fn class_name(self) -> &'static str {
        use SensitiveDetector::*;
        match self {
            TrackerTagger | TrackerRecoil => "simcore::TrackerSD",
            Hcal => "simcore::HcalSD",
            Ecal => "simcore::EcalSD",
            TrigScintTarget | TrigScintUp | TrigScintTag | TrigScintDown | TrigScintTestbeam
            | TrigScintPad1 | TrigScintPad2 | TrigScintPad3 => "simcore::TrigScintSD",
            ScoringPlaneEcal | ScoringPlaneHcal | ScoringPlaneTarget | ScoringPlaneTrigScint
            | ScoringPlaneTracker | ScoringPlaneMagnet => "simcore::ScoringPlaneSD",
        }
    }

    /// Instance label distinguishing detectors that share a class.
    pub fn label(self) -> &'static str {
        use SensitiveDetector::*;
        match self {
            TrackerTagger => "tagger",
            TrackerRecoil => "recoil",
            Hcal => "hcal",
            Ecal => "ecal",
            TrigScintTarget => "target",
            TrigScintUp => "up",
            TrigScintTag => "tag",
            TrigScintDown => "down",
            TrigScintTestbeam => "testbeam",
            TrigScintPad1 => "pad1",
            TrigScintPad2 => "pad2",
            TrigScintPad3 => "pad3",
            ScoringPlaneEcal => "ecal",
            ScoringPlaneHcal => "hcal",
            ScoringPlaneTarget => "target",
            ScoringPlaneTrigScint => "trigscint",
            ScoringPlaneTracker => "tracker",
            ScoringPlaneMagnet => "magnet",
        }
    }
}

impl fmt::Display for SensitiveDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.class_name(), self.label())
    }
}

impl Serialize for SensitiveDetector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SensitiveDetector", 2)?;
        state.serialize_field("class_name", self.class_name())?;
        state.serialize_field("name", self.label())?;
        state.end()
    }
}

/// Sensitive detectors for a detector name.
///
/// The tracker, calorimeter, and target trigger-scintillator detectors are
/// always present. The remaining trigger-scintillator pads depend on the
/// detector family.
pub fn sensitive_detectors_for(detector: &str, include_scoring_planes: bool) -> Vec<SensitiveDetector> {
    use SensitiveDetector::*;

    let trigscint: &[SensitiveDetector] = if detector.contains("v12") {
        &[TrigScintUp, TrigScintTag, TrigScintDown]
    } else if detector.contains("hcal-prototype") {
        &[TrigScintTestbeam]
    } else {
        &[TrigScintPad1, TrigScintPad2, TrigScintPad3]
    };

    let mut sds = vec![TrackerTagger, TrackerRecoil, Hcal, Ecal, TrigScintTarget];
    sds.extend_from_slice(trigscint);
    if include_scoring_planes {
        sds.extend_from_slice(&SensitiveDetector::SCORING_PLANES);
    }
    sds
}

/// Everything the engine needs to know about the detector of a job.
#[derive(Clone, Debug, Serialize)]
pub struct DetectorSetup {
    pub detector: String,
    pub include_scoring_planes: bool,
    pub sensitive_detectors: Vec<SensitiveDetector>,
    pub hcal_geometry: HcalReadoutGeometry,
}

impl DetectorSetup {
    /// Builds the setup for a detector with the default geometry registry.
    pub fn for_detector(detector: &str, include_scoring_planes: bool) -> Result<Self> {
        Self::with_registry(&HcalGeometry::new()?, detector, include_scoring_planes)
    }

    /// Builds the setup for a detector, resolving geometry in `registry`.
    ///
    /// Fails before anything else is configured if the detector has no
    /// readout geometry.
    pub fn with_registry(
        registry: &HcalGeometry,
        detector: &str,
        include_scoring_planes: bool,
    ) -> Result<Self> {
        let hcal_geometry = registry.lookup(detector)?.clone();
        let sensitive_detectors = sensitive_detectors_for(detector, include_scoring_planes);
        debug!(
            "Detector '{detector}' uses {} sensitive detector(s)",
            sensitive_detectors.len()
        );

        Ok(Self {
            detector: detector.to_string(),
            include_scoring_planes,
            sensitive_detectors,
            hcal_geometry,
        })
    }
}

impl fmt::Display for DetectorSetup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Detector: {}", self.detector)?;
        writeln!(f, "Sensitive detectors:")?;
        for sd in &self.sensitive_detectors {
            writeln!(f, "  {sd}")?;
        }
        write!(f, "{}", self.hcal_geometry)
    }
}
