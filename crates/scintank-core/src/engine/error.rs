use thiserror::Error;

use super::config::ConfigError;
use crate::core::models::model::ModelError;
use crate::core::models::properties::PropertyError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Model construction failed: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("Property table construction failed: {source}")]
    Property {
        #[from]
        source: PropertyError,
    },

    #[error("QE table has {efficiencies} efficiencies for {energies} energies")]
    QeTableLengthMismatch { energies: usize, efficiencies: usize },

    #[error("QE efficiency {value} at index {index} is outside [0, 1]")]
    QeOutOfRange { index: usize, value: f64 },

    #[error("No scoring volume designated in the geometry model")]
    NoScoringVolume,

    #[error("Internal logic error: {0}")]
    Internal(String),
}
