//! Named settings with defaults, in the spirit of a configuration registry:
//! a TOML file supplies values, command-line flags and `NETREACH_*`
//! environment variables override them.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

pub const DEFAULT_THRESHOLD: f64 = 6.0;
pub const DEFAULT_EXPORT_PATH: &str = "coverage.geojson";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Network graph document.
    pub graph: Option<PathBuf>,
    /// Origin list document. Optional; origins can also be raw node ids.
    pub origins: Option<PathBuf>,
    /// Origin id (from the origin list) or graph node id to measure from.
    pub selected_origin_id: Option<String>,
    /// Inclusive cost budget.
    pub threshold: f64,
    /// Where `export` writes the coverage document.
    pub export_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graph: None,
            origins: None,
            selected_origin_id: None,
            threshold: DEFAULT_THRESHOLD,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }
}

/// Values given on the command line (or through the environment).
/// `None` keeps whatever the settings file or defaults provide.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub graph: Option<PathBuf>,
    pub origins: Option<PathBuf>,
    pub selected_origin_id: Option<String>,
    pub threshold: Option<f64>,
}

impl Settings {
    /// Read a settings file, or start from defaults when none is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing settings file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(graph) = overrides.graph {
            self.graph = Some(graph);
        }
        if let Some(origins) = overrides.origins {
            self.origins = Some(origins);
        }
        if let Some(origin) = overrides.selected_origin_id {
            self.selected_origin_id = Some(origin);
        }
        if let Some(threshold) = overrides.threshold {
            self.threshold = threshold;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            bail!("threshold must be a non-negative number, got {}", self.threshold);
        }
        Ok(())
    }

    pub fn graph_path(&self) -> Result<&Path> {
        match self.graph.as_deref() {
            Some(path) => Ok(path),
            None => bail!(
                "no graph document configured: pass --graph or set `graph` in the settings file"
            ),
        }
    }

    pub fn origin(&self) -> Result<&str> {
        match self.selected_origin_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => bail!(
                "no origin selected: pass --origin or set `selected_origin_id` in the settings file"
            ),
        }
    }
}
