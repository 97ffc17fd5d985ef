use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::analysis::coverability::BuildLimits;
use crate::net::omega::OMEGA;
use crate::report::RenderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CoverConfig {
    /// Abort the build once the tree would grow past this many nodes.
    #[serde(default)]
    pub max_nodes: Option<usize>,
    /// Abort the build after this many milliseconds.
    #[serde(default)]
    pub max_millis: Option<u64>,
    #[serde(default = "default_omega_symbol")]
    pub omega_symbol: String,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            max_nodes: None,
            max_millis: None,
            omega_symbol: default_omega_symbol(),
            format: OutputFormat::default(),
        }
    }
}

impl CoverConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: CoverConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.omega_symbol.is_empty()
                && !self.omega_symbol.chars().any(|c| c.is_ascii_digit()),
            "omega_symbol `{}` must be non-empty and contain no digits",
            self.omega_symbol
        );
        ensure!(
            self.max_nodes != Some(0),
            "max_nodes must be at least 1 (the root is counted)"
        );
        Ok(())
    }

    pub fn limits(&self) -> BuildLimits {
        BuildLimits {
            max_nodes: self.max_nodes,
            max_duration: self.max_millis.map(Duration::from_millis),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            omega_symbol: self.omega_symbol.clone(),
        }
    }
}

fn default_omega_symbol() -> String {
    OMEGA.to_string()
}
