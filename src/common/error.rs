//! Error types.
//!
//! Every builder in this crate either produces a complete, internally
//! consistent configuration object or fails with a [`ConfigError`]. Nothing
//! is retried and nothing is partially built.

use thiserror::Error;

/// The selection rule that a resimulation request violated.
///
/// Each variant maps to one failing row of the event/run selection table, so
/// callers can match on the rule instead of parsing messages.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionRule {
    /// An event list was given but it was empty.
    #[error("at least one event required")]
    NoEvents,

    /// A run list was given but it was empty.
    #[error("run list must be non-empty if given")]
    EmptyRunList,

    /// A run list was given whose length differs from the event list.
    #[error("run list length must match event list length ({runs} runs for {events} events)")]
    RunCountMismatch {
        /// Number of requested events.
        events: usize,
        /// Number of requested runs.
        runs: usize,
    },

    /// A run number is too large for the engine's signed run field.
    #[error("run numbers must not exceed {max}")]
    RunOutOfRange {
        /// Largest run number the engine can represent.
        max: u64,
    },

    /// Runs were neither a single integer nor a list of integers.
    #[error("runs must be an integer or a list of integers")]
    RunsNotIntegers,

    /// Events were given as something other than a list.
    #[error("events must be a list")]
    EventsNotList,

    /// The event list contained an entry that is not a valid event number.
    #[error("event numbers must be non-negative integers")]
    EventNotInteger,
}

/// Errors raised while building configuration objects.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The detector name matched no known readout geometry.
    #[error("no Hcal readout geometry matches detector '{detector}'")]
    NoMatchingVariant {
        /// Detector name that was looked up.
        detector: String,
    },

    /// The detector name matched the patterns of more than one geometry.
    #[error("detector '{detector}' matches more than one Hcal readout geometry: {}", .variants.join(", "))]
    AmbiguousVariant {
        /// Detector name that was looked up.
        detector: String,
        /// Names of every variant that claimed the detector.
        variants: Vec<String>,
    },

    /// The event/run selection request was malformed.
    #[error("invalid resimulation selection: {0}")]
    InvalidSelection(#[from] SelectionRule),

    /// A geometry variant broke one of its derivation rules.
    #[error("malformed geometry '{variant}': {reason}")]
    MalformedGeometry {
        /// Name of the offending variant.
        variant: String,
        /// Which rule was broken.
        reason: String,
    },

    /// A detector-name pattern failed to compile.
    #[error("invalid detector pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Reading a job file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A job file was not valid TOML or did not fit the job schema.
    #[error("failed to parse job config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Rendering a configuration as TOML failed.
    #[error("failed to render TOML: {0}")]
    TomlRender(#[from] toml::ser::Error),

    /// Rendering a configuration as JSON failed.
    #[error("failed to render JSON: {0}")]
    JsonRender(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;
