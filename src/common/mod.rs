//! Common types shared by the configuration builders.
//!
//! This module provides the error type and the output rendering used by the
//! geometry, resimulation, and detector setup builders.

/// Error types and the selection rules they report.
pub mod error;

/// Rendering of configuration objects for the engine handoff.
pub mod output;

pub use error::{ConfigError, Result, SelectionRule};
pub use output::{render, OutputFormat};
