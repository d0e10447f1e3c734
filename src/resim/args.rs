//! Untyped selection arguments.
//!
//! Job files carry `which_events` and `which_runs` as arbitrary TOML values.
//! This layer checks their shape before handing them to
//! [`build_selection`](super::build_selection), so type mistakes fail when
//! the job is built, not when events are filtered.

use super::selection::{build_selection, ResimulationSelection, RunSelector};
use crate::common::{Result, SelectionRule};
use serde::Deserialize;
use toml::Value;
use tracing::warn;

/// Event and run arguments as they appear in a job file.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SelectionArgs {
    #[serde(default)]
    pub which_events: Option<Value>,
    #[serde(default)]
    pub which_runs: Option<Value>,
}

impl SelectionArgs {
    pub fn new(which_events: Option<Value>, which_runs: Option<Value>) -> Self {
        Self {
            which_events,
            which_runs,
        }
    }

    /// Validates the arguments and builds the selection.
    pub fn build(&self) -> Result<ResimulationSelection> {
        Self::from_values(self.which_events.as_ref(), self.which_runs.as_ref())
    }

    /// Builds a selection from untyped values.
    ///
    /// `which_events` must be absent or an array of non-negative integers.
    /// `which_runs` must be absent, a non-negative integer, or an array of
    /// them. Runs are not inspected at all when events are absent.
    pub fn from_values(
        which_events: Option<&Value>,
        which_runs: Option<&Value>,
    ) -> Result<ResimulationSelection> {
        let Some(events) = which_events else {
            if which_runs.is_some() {
                warn!("Ignoring which_runs because no events were listed");
            }
            return build_selection(None, RunSelector::Any);
        };

        let events = match events {
            Value::Array(items) => items
                .iter()
                .map(|v| as_number(v).ok_or(SelectionRule::EventNotInteger))
                .collect::<std::result::Result<Vec<u64>, _>>()?,
            _ => return Err(SelectionRule::EventsNotList.into()),
        };
        if events.is_empty() {
            return Err(SelectionRule::NoEvents.into());
        }

        let runs = match which_runs {
            None => RunSelector::Any,
            Some(run @ Value::Integer(_)) => {
                RunSelector::Shared(as_number(run).ok_or(SelectionRule::RunsNotIntegers)?)
            }
            Some(Value::Array(items)) => RunSelector::Paired(
                items
                    .iter()
                    .map(|v| as_number(v).ok_or(SelectionRule::RunsNotIntegers))
                    .collect::<std::result::Result<Vec<u64>, _>>()?,
            ),
            Some(_) => return Err(SelectionRule::RunsNotIntegers.into()),
        };

        build_selection(Some(&events), runs)
    }
}

fn as_number(value: &Value) -> Option<u64> {
    value.as_integer().and_then(|i| u64::try_from(i).ok())
}
