//! Geometry Registry.
//!
//! Holds every known readout geometry and resolves a detector name to the one
//! geometry that serves it.

use super::hcal::HcalReadoutGeometry;
use crate::common::{ConfigError, Result};
use tracing::{debug, info};

/// Container for the known Hcal readout geometries.
#[derive(Clone, Debug)]
pub struct HcalGeometry {
    variants: Vec<HcalReadoutGeometry>,
}

impl HcalGeometry {
    /// Builds the registry with every geometry this crate knows about.
    pub fn new() -> Result<Self> {
        Ok(Self::from_variants(vec![
            HcalReadoutGeometry::v12()?,
            HcalReadoutGeometry::prototype()?,
        ]))
    }

    /// Builds a registry from an explicit list of variants.
    pub fn from_variants(variants: Vec<HcalReadoutGeometry>) -> Self {
        Self { variants }
    }

    /// Variants in declaration order.
    pub fn variants(&self) -> &[HcalReadoutGeometry] {
        &self.variants
    }

    /// Finds a variant by its own name (e.g. `v12`), not a detector name.
    pub fn get(&self, name: &str) -> Option<&HcalReadoutGeometry> {
        self.variants.iter().find(|v| v.name() == name)
    }

    /// Resolves a detector name to its readout geometry.
    ///
    /// Patterns of different variants are expected to be disjoint. A name
    /// claimed by more than one variant is rejected rather than resolved by
    /// declaration order.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::NoMatchingVariant`] if no pattern matches
    /// * [`ConfigError::AmbiguousVariant`] if several variants match
    pub fn lookup(&self, detector: &str) -> Result<&HcalReadoutGeometry> {
        let matching: Vec<&HcalReadoutGeometry> =
            self.variants.iter().filter(|v| v.matches(detector)).collect();
        debug!("Detector '{detector}' matched {} geometry variant(s)", matching.len());

        match matching.as_slice() {
            [] => Err(ConfigError::NoMatchingVariant {
                detector: detector.to_string(),
            }),
            [variant] => {
                info!("Using Hcal readout geometry '{}' for '{detector}'", variant.name());
                Ok(*variant)
            }
            _ => Err(ConfigError::AmbiguousVariant {
                detector: detector.to_string(),
                variants: matching.iter().map(|v| v.name().to_string()).collect(),
            }),
        }
    }
}

/// Returns the readout geometry for a detector name.
///
/// Convenience wrapper that builds the default registry for a single lookup.
pub fn lookup_geometry(detector: &str) -> Result<HcalReadoutGeometry> {
    HcalGeometry::new()?.lookup(detector).cloned()
}
