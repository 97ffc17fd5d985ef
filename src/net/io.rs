//! Loading net descriptions from JSON, RON or TOML files.
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::net::description::NetDescription;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported net file extension `{0}` (expected json, ron or toml)")]
    UnsupportedFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(Format::Json),
            "ron" => Ok(Format::Ron),
            "toml" => Ok(Format::Toml),
            _ => Err(IoError::UnsupportedFormat(extension)),
        }
    }
}

pub fn from_str<T: DeserializeOwned>(content: &str, format: Format) -> Result<T, IoError> {
    Ok(match format {
        Format::Json => serde_json::from_str(content)?,
        Format::Ron => ron::from_str(content)?,
        Format::Toml => toml::from_str(content)?,
    })
}

/// Reads a [`NetDescription`], picking the format from the file extension.
pub fn read_description<P: AsRef<Path>>(path: P) -> Result<NetDescription, IoError> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path)?;
    log::debug!("loading {format:?} net description from {}", path.display());
    from_str(&content, format)
}

pub fn to_json_string<T: serde::Serialize>(value: &T) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_net_in_every_format() {
        let json = r#"{
            "places": ["P0", "P1"],
            "initial_marking": [1, 0],
            "transitions": [{ "name": "t1", "consumes": { "P0": 1 }, "produces": { "P1": 1 } }]
        }"#;
        let ron = r#"(
            places: ["P0", "P1"],
            initial_marking: [1, 0],
            transitions: [(name: "t1", consumes: { "P0": 1 }, produces: { "P1": 1 })],
        )"#;
        let toml = r#"
            places = ["P0", "P1"]
            initial_marking = [1, 0]

            [[transitions]]
            name = "t1"
            consumes = { P0 = 1 }
            produces = { P1 = 1 }
        "#;

        let from_json: NetDescription = from_str(json, Format::Json).unwrap();
        let from_ron: NetDescription = from_str(ron, Format::Ron).unwrap();
        let from_toml: NetDescription = from_str(toml, Format::Toml).unwrap();
        assert_eq!(from_json, from_ron);
        assert_eq!(from_json, from_toml);
        assert!(from_json.build().is_ok());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            Format::from_path(Path::new("net.yaml")),
            Err(IoError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
    }
}
