//! Test module organization.
//!
//! This module organizes all integration tests for the configuration builders.



/// Readout geometry derivation and lookup tests.
mod geometry_tests;

/// ReSimulator producer record tests.
mod resimulator_tests;
