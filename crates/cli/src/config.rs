//! Analysis settings shared by the subcommands.
//!
//! Loaded from a JSON file given with `--config`. Every field is optional;
//! anything left out keeps its default.

use anyhow::Context;
use evplane_kernel::angles::AngleSettings;
use evplane_kernel::config::{BuilderConfig, CandidateCuts};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub builder: BuilderConfig,
    pub candidate: CandidateCuts,
    pub angles: AngleSettings,
}

impl AnalysisConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Defaults when `path` is `None`.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
