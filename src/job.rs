//! Job assembly.
//!
//! Composes the detector setup and the optional resimulation producer
//! described by a [`JobConfig`] into the record handed to the engine.

use crate::common::Result;
use crate::config::JobConfig;
use crate::detector::DetectorSetup;
use crate::geometry::HcalGeometry;
use crate::resim::ReSimulator;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Fully built job configuration.
#[derive(Clone, Debug, Serialize)]
pub struct Job {
    pub detector: DetectorSetup,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resimulator: Option<ReSimulator>,
}

impl Job {
    /// Builds every configuration object the job describes.
    ///
    /// The detector is resolved first so that an unknown detector is
    /// reported before the resimulation arguments are looked at.
    pub fn from_config(config: &JobConfig) -> Result<Self> {
        let registry = HcalGeometry::new()?;
        let mut detector = DetectorSetup::with_registry(
            &registry,
            &config.detector.name,
            config.detector.include_scoring_planes,
        )?;
        detector.hcal_geometry = detector.hcal_geometry.with_verbose(config.logging.verbose);

        let resimulator = match &config.resim {
            Some(resim) => {
                let selection = resim.selection_args().build()?;
                Some(ReSimulator::new(&resim.instance_name, &detector, selection))
            }
            None => None,
        };

        info!(
            "Built job for '{}'{}",
            detector.detector,
            if resimulator.is_some() { " with resimulation" } else { "" }
        );
        Ok(Self {
            detector,
            resimulator,
        })
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detector)?;
        if let Some(resim) = &self.resimulator {
            write!(f, "\n{resim}")?;
        }
        Ok(())
    }
}
