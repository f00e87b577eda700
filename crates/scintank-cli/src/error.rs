use scintank::engine::config::ConfigError;
use scintank::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    ScintankCore(#[from] EngineError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to write file '{path}': {source}", path = path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
