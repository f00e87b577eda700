pub mod inspect;
pub mod simulate;

use crate::error::Result;
use scintank::engine::config::DetectorConfig;
use std::path::Path;
use tracing::info;

/// Resolves the detector configuration: a TOML file when given, the
/// baseline defaults otherwise. File-based configurations are validated on
/// load; the defaults are valid by construction.
pub fn load_config(path: Option<&Path>) -> Result<DetectorConfig> {
    match path {
        Some(path) => {
            info!("Loading detector configuration from {:?}", path);
            Ok(DetectorConfig::from_toml_path(path)?)
        }
        None => {
            info!("No configuration file given; using the baseline detector layout.");
            Ok(DetectorConfig::default())
        }
    }
}
