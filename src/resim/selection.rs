//! Resimulation Event Selection.
//!
//! Turns a list of requested event numbers and an optional run constraint
//! into a selection the resimulation driver applies to its input stream.
//! Events missing from the input are skipped by the driver, not reported.

use crate::common::{Result, SelectionRule};
use serde::Serialize;
use tracing::debug;

/// Largest run number the engine can store; its run field is signed.
pub const MAX_RUN: u64 = i64::MAX as u64;

/// How the driver matches input events against the targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SelectionMode {
    /// Resimulate every input event.
    All,
    /// Match on event number only.
    ByEventOnly,
    /// Match on event number; every target requires the same run.
    ByEventAndSharedRun,
    /// Match on (event, run) pairs.
    ByEventAndPairedRun,
}

/// One event to resimulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EventToResim {
    pub event: u64,
    /// Required run number, `None` if any run is accepted.
    pub run: Option<u64>,
}

impl EventToResim {
    pub fn new(event: u64, run: Option<u64>) -> Self {
        Self { event, run }
    }
}

/// Run constraint accompanying an event list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunSelector {
    /// No run constraint.
    Any,
    /// One run shared by every requested event.
    Shared(u64),
    /// One run per requested event, paired by position.
    Paired(Vec<u64>),
}

/// Immutable event selection handed to the resimulation driver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResimulationSelection {
    mode: SelectionMode,
    targets: Vec<EventToResim>,
}

impl ResimulationSelection {
    /// Selection that resimulates every event.
    pub fn all() -> Self {
        Self {
            mode: SelectionMode::All,
            targets: Vec::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Requested events in request order; empty in [`SelectionMode::All`].
    pub fn targets(&self) -> &[EventToResim] {
        &self.targets
    }

    pub fn resimulate_all_events(&self) -> bool {
        self.mode == SelectionMode::All
    }

    /// Does matching consider the run number?
    pub fn care_about_run(&self) -> bool {
        matches!(
            self.mode,
            SelectionMode::ByEventAndSharedRun | SelectionMode::ByEventAndPairedRun
        )
    }

    /// Would the driver resimulate the input event `(event, run)`?
    pub fn accepts(&self, event: u64, run: u64) -> bool {
        match self.mode {
            SelectionMode::All => true,
            _ => self
                .targets
                .iter()
                .any(|t| t.event == event && t.run.map_or(true, |r| r == run)),
        }
    }
}

/// Builds a resimulation selection.
///
/// # Arguments
///
/// * `which_events` - Events to resimulate, or `None` for all events
/// * `which_runs` - Run constraint; ignored when `which_events` is `None`
///
/// # Errors
///
/// [`crate::ConfigError::InvalidSelection`] naming the violated rule:
/// an empty event list, an empty run list, a run list whose length
/// differs from the event list, or a run above [`MAX_RUN`].
pub fn build_selection(
    which_events: Option<&[u64]>,
    which_runs: RunSelector,
) -> Result<ResimulationSelection> {
    let Some(events) = which_events else {
        return Ok(ResimulationSelection::all());
    };
    if events.is_empty() {
        return Err(SelectionRule::NoEvents.into());
    }

    let (mode, targets) = match which_runs {
        RunSelector::Any => (
            SelectionMode::ByEventOnly,
            events.iter().map(|&e| EventToResim::new(e, None)).collect(),
        ),
        RunSelector::Shared(run) => {
            check_run(run)?;
            (
                SelectionMode::ByEventAndSharedRun,
                events.iter().map(|&e| EventToResim::new(e, Some(run))).collect(),
            )
        }
        RunSelector::Paired(runs) => {
            if runs.is_empty() {
                return Err(SelectionRule::EmptyRunList.into());
            }
            if runs.len() != events.len() {
                return Err(SelectionRule::RunCountMismatch {
                    events: events.len(),
                    runs: runs.len(),
                }
                .into());
            }
            runs.iter().try_for_each(|&r| check_run(r))?;
            (
                SelectionMode::ByEventAndPairedRun,
                events
                    .iter()
                    .zip(runs)
                    .map(|(&e, r)| EventToResim::new(e, Some(r)))
                    .collect(),
            )
        }
    };

    debug!("Selected {} event(s) for resimulation in {mode:?} mode", events.len());
    Ok(ResimulationSelection { mode, targets })
}

fn check_run(run: u64) -> Result<()> {
    if run > MAX_RUN {
        return Err(SelectionRule::RunOutOfRange { max: MAX_RUN }.into());
    }
    Ok(())
}
