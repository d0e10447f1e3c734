//! Event resimulation.
//!
//! Selection of previously generated events to push through the simulation
//! again, and the producer record that carries the selection to the engine.

/// Untyped arguments from job files.
pub mod args;

/// ReSimulator producer record.
pub mod producer;

/// Typed selection builder.
pub mod selection;

pub use args::SelectionArgs;
pub use producer::{EventToResimEntry, ReSimulator, ANY_RUN, RESIMULATOR_CLASS};
pub use selection::{
    build_selection, EventToResim, ResimulationSelection, RunSelector, SelectionMode, MAX_RUN,
};
