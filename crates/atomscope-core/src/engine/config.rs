use crate::core::io::format::FileFormat;
use std::collections::BTreeMap;
use thiserror::Error;

pub const DEFAULT_BOND_FACTOR: f64 = 1.15;
pub const DEFAULT_ATOM_SCALE: f64 = 0.35;
pub const DEFAULT_BOND_RADIUS: f64 = 0.12;
pub const DEFAULT_FPS: f64 = 10.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidValue { parameter: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BondingConfig {
    /// Multiplier applied to the sum of covalent radii.
    pub bond_factor: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsingConfig {
    pub sort_by_id: bool,
    /// Skips format detection when set.
    pub format: Option<FileFormat>,
    /// Type id → element assignments supplied up front.
    pub type_overrides: BTreeMap<u32, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    /// Sphere radius as a fraction of the covalent radius.
    pub atom_scale: f64,
    pub bond_radius: f64,
    /// Per-element sphere radius in Ångström, replacing the scaled default.
    pub radius_overrides: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub fps: f64,
    pub looping: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub bonding: BondingConfig,
    pub parsing: ParsingConfig,
    pub style: StyleConfig,
    pub playback: PlaybackConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            bonding: BondingConfig {
                bond_factor: DEFAULT_BOND_FACTOR,
            },
            parsing: ParsingConfig {
                sort_by_id: true,
                format: None,
                type_overrides: BTreeMap::new(),
            },
            style: StyleConfig {
                atom_scale: DEFAULT_ATOM_SCALE,
                bond_radius: DEFAULT_BOND_RADIUS,
                radius_overrides: BTreeMap::new(),
            },
            playback: PlaybackConfig {
                fps: DEFAULT_FPS,
                looping: true,
            },
        }
    }
}

impl ViewerConfig {
    /// A builder pre-filled with the defaults.
    pub fn builder() -> ViewerConfigBuilder {
        let defaults = Self::default();
        ViewerConfigBuilder::new()
            .bond_factor(defaults.bonding.bond_factor)
            .sort_by_id(defaults.parsing.sort_by_id)
            .atom_scale(defaults.style.atom_scale)
            .bond_radius(defaults.style.bond_radius)
            .fps(defaults.playback.fps)
            .looping(defaults.playback.looping)
    }
}

pub(crate) fn ensure_positive(parameter: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            reason: format!("must be a positive finite number (got {})", value),
        })
    }
}

#[derive(Default)]
pub struct ViewerConfigBuilder {
    bond_factor: Option<f64>,
    sort_by_id: Option<bool>,
    format: Option<FileFormat>,
    type_overrides: BTreeMap<u32, String>,
    atom_scale: Option<f64>,
    bond_radius: Option<f64>,
    radius_overrides: BTreeMap<String, f64>,
    fps: Option<f64>,
    looping: Option<bool>,
}

impl ViewerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bond_factor(mut self, factor: f64) -> Self {
        self.bond_factor = Some(factor);
        self
    }
    pub fn sort_by_id(mut self, sort: bool) -> Self {
        self.sort_by_id = Some(sort);
        self
    }
    pub fn format(mut self, format: Option<FileFormat>) -> Self {
        self.format = format;
        self
    }
    pub fn type_override(mut self, type_id: u32, element: &str) -> Self {
        self.type_overrides.insert(type_id, element.trim().to_string());
        self
    }
    pub fn type_overrides(mut self, overrides: BTreeMap<u32, String>) -> Self {
        self.type_overrides.extend(overrides);
        self
    }
    pub fn atom_scale(mut self, scale: f64) -> Self {
        self.atom_scale = Some(scale);
        self
    }
    pub fn bond_radius(mut self, radius: f64) -> Self {
        self.bond_radius = Some(radius);
        self
    }
    pub fn radius_override(mut self, element: &str, radius: f64) -> Self {
        let element = crate::core::chemistry::canonical_symbol(element).unwrap_or(element.trim());
        self.radius_overrides.insert(element.to_string(), radius);
        self
    }
    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = Some(fps);
        self
    }
    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = Some(looping);
        self
    }

    pub fn build(self) -> Result<ViewerConfig, ConfigError> {
        let bond_factor = self
            .bond_factor
            .ok_or(ConfigError::MissingParameter("bond_factor"))?;
        let atom_scale = self
            .atom_scale
            .ok_or(ConfigError::MissingParameter("atom_scale"))?;
        let bond_radius = self
            .bond_radius
            .ok_or(ConfigError::MissingParameter("bond_radius"))?;
        let fps = self.fps.ok_or(ConfigError::MissingParameter("fps"))?;

        for radius in self.radius_overrides.values() {
            ensure_positive("radius_override", *radius)?;
        }

        Ok(ViewerConfig {
            bonding: BondingConfig {
                bond_factor: ensure_positive("bond_factor", bond_factor)?,
            },
            parsing: ParsingConfig {
                sort_by_id: self
                    .sort_by_id
                    .ok_or(ConfigError::MissingParameter("sort_by_id"))?,
                format: self.format,
                type_overrides: self.type_overrides,
            },
            style: StyleConfig {
                atom_scale: ensure_positive("atom_scale", atom_scale)?,
                bond_radius: ensure_positive("bond_radius", bond_radius)?,
                radius_overrides: self.radius_overrides,
            },
            playback: PlaybackConfig {
                fps: ensure_positive("fps", fps)?,
                looping: self
                    .looping
                    .ok_or(ConfigError::MissingParameter("looping"))?,
            },
        })
    }
}
