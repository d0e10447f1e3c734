//! Detector Simulation Configuration Library.
//!
//! This crate builds the typed parameter records that an external simulation
//! and reconstruction engine consumes. It performs no simulation itself; every
//! builder is a pure function from a few named options to an immutable,
//! internally consistent configuration object.
//!
//! # Components
//!
//! * **Geometry**: Hcal readout geometry variants derived from physical
//!   constants, selected by detector-name pattern.
//! * **Resimulation**: selection of events (and optionally runs) to push
//!   through the simulation again.
//! * **Detector setup**: sensitive detectors and readout geometry for a
//!   detector name.
//!
//! # Modules
//!
//! * `common`: Error types and output rendering.
//! * `config`: Job file loading and parsing.
//! * `detector`: Sensitive detector mapping.
//! * `geometry`: Readout geometry variants and lookup.
//! * `job`: Assembly of a complete job handoff.
//! * `resim`: Resimulation selection and producer record.

/// Shared error types and output rendering.
///
/// Provides the crate-wide error enum, the selection rules it reports, and
/// the JSON/TOML/text rendering used for the engine handoff.
pub mod common;

/// Job configuration file.
///
/// Loads and parses TOML job descriptions naming the detector and the
/// optional resimulation request.
pub mod config;

/// Detector name to sensitive-detector mapping.
pub mod detector;

/// Hcal readout geometry variants.
///
/// Builds each variant from its physical constants, checks the derivation
/// rules that tie its arrays together, and resolves detector names to
/// variants.
pub mod geometry;

/// Complete job assembly.
pub mod job;

/// Event resimulation selection.
///
/// Validates requested event and run lists and wraps the resulting selection
/// in the producer record the engine runs.
pub mod resim;

pub use common::{ConfigError, OutputFormat, Result, SelectionRule};
pub use geometry::{lookup_geometry, HcalGeometry, HcalReadoutGeometry};
pub use resim::{build_selection, ResimulationSelection, RunSelector, SelectionMode};
