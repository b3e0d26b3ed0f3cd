use super::config::ConfigError;
use crate::core::bonding::BondingError;
use crate::core::models::color::ColorError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Inconsistent frame size: frame {frame} has {found} atoms, expected {expected}")]
    InconsistentFrameSize {
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error("Cannot render a model without frames")]
    NoFrames,

    #[error("Bond inference failed: {source}")]
    Bonding {
        #[from]
        source: BondingError,
    },

    #[error("Color error: {source}")]
    Color {
        #[from]
        source: ColorError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
