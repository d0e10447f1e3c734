use crate::common::Result;
use crate::resim::SelectionArgs;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_RESIM_INSTANCE: &str = "resim";
const DEFAULT_VERBOSE: i32 = 0;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    pub detector: DetectorConfig,

    #[serde(default)]
    pub resim: Option<ResimConfig>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl JobConfig {
    /// Parses a job description from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a job file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetectorConfig {
    pub name: String,

    #[serde(default)]
    pub include_scoring_planes: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResimConfig {
    #[serde(default = "default_resim_instance")]
    pub instance_name: String,

    #[serde(default)]
    pub which_events: Option<toml::Value>,

    #[serde(default)]
    pub which_runs: Option<toml::Value>,
}

impl ResimConfig {
    pub fn selection_args(&self) -> SelectionArgs {
        SelectionArgs::new(self.which_events.clone(), self.which_runs.clone())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Verbosity forwarded to the engine-side configuration objects.
    #[serde(default = "default_verbose")]
    pub verbose: i32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            verbose: default_verbose(),
        }
    }
}

fn default_resim_instance() -> String {
    DEFAULT_RESIM_INSTANCE.to_string()
}

fn default_verbose() -> i32 {
    DEFAULT_VERBOSE
}
