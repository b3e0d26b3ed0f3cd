use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileBondingConfig {
    pub factor: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileParsingConfig {
    pub sort_by_id: Option<bool>,
    pub format: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileStyleConfig {
    pub atom_scale: Option<f64>,
    pub bond_radius: Option<f64>,
    /// Per-element sphere radii in Ångström, e.g. `radius = { O = 0.5 }`.
    pub radius: Option<BTreeMap<String, f64>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FilePlaybackConfig {
    pub fps: Option<f64>,
    pub looping: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub bonding: Option<FileBondingConfig>,
    pub parsing: Option<FileParsingConfig>,
    pub style: Option<FileStyleConfig>,
    pub playback: Option<FilePlaybackConfig>,
    /// Type id (as a string key) to element symbol.
    pub type_map: Option<BTreeMap<String, String>>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
