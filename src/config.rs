//! JSON configuration for the CLI and for embedding applications.
//!
//! Every field has a default, so a config file only needs the values it changes:
//! ```json
//! { "font": { "family": "DejaVu Sans", "size": 14 }, "policy": { "line_layout": "wrap" } }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::label::DisplayPolicy;
use crate::style::{FontSpec, LabelStyle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub font: FontSpec,
    pub style: LabelStyle,
    pub policy: DisplayPolicy,
    /// View width in coordinate units.
    pub width: f64,
    /// View height; ignored when `policy.auto_height` is set.
    pub height: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            style: LabelStyle::default(),
            policy: DisplayPolicy::default(),
            width: 200.0,
            height: 100.0,
        }
    }
}

impl LabelConfig {
    /// Read a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `<config dir>/labelfit/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("labelfit").join("config.json"))
    }

    /// Load the config at [`LabelConfig::default_path`] if it exists, defaults otherwise.
    pub fn discover() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }
}
