//! Output Rendering.
//!
//! Configuration objects reach the external engine as structured records.
//! This module turns any serializable configuration into the requested text
//! form.

use super::error::Result;
use serde::Serialize;
use std::fmt;

/// Text format used when handing a configuration to the engine.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// TOML document
    Toml,
    /// Human-readable summary
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Toml => write!(f, "toml"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Renders `value` in the given format.
///
/// # Arguments
///
/// * `value` - Configuration object to render
/// * `format` - Target text format
///
/// # Returns
///
/// The rendered document, or the serializer's error.
pub fn render<T>(value: &T, format: OutputFormat) -> Result<String>
where
    T: Serialize + fmt::Display,
{
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Toml => toml::to_string_pretty(value)?,
        OutputFormat::Text => value.to_string(),
    };
    Ok(rendered)
}
