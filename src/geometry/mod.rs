//! Readout geometry parameters.
//!
//! Named geometry variants and the lookup from detector name to variant.

/// Readout geometry variants and their derivation rules.
pub mod hcal;

/// Registry of variants and detector-name lookup.
pub mod registry;

pub use hcal::{EcalAxis, HcalReadoutGeometry, HcalSection, StripGranularity, WidthRule};
pub use registry::{lookup_geometry, HcalGeometry};
