use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

/// Full configuration surface of the detector model.
///
/// Lengths in mm, energies in eV, times in ns, densities in g/cm^3. Every
/// field has a default matching the baseline tank layout; a TOML file may
/// override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub tank_inner_radius_mm: f64,
    pub tank_wall_thickness_mm: f64,
    pub tank_half_height_mm: f64,
    pub vessel_outer_radius_mm: f64,
    pub vessel_wall_thickness_mm: f64,
    pub vessel_half_height_mm: f64,
    pub world_half_extent_mm: f64,
    pub sensors_per_plane: u32,
    pub sensor_ring_radius_mm: f64,
    /// Margin subtracted from the vessel half-height when no explicit axial
    /// offset is given.
    pub sensor_axial_margin_mm: f64,
    /// Explicit axial offset of the sensor planes; `None` means
    /// `vessel_half_height_mm - sensor_axial_margin_mm`.
    pub sensor_axial_offset_mm: Option<f64>,
    pub sensor_radius_mm: f64,
    pub sensor_half_thickness_mm: f64,
    pub reflector_reflectivity: f64,
    pub photocathode_efficiency: f64,
    pub dopant_mass_fraction: f64,
    pub buffer_density_g_cm3: f64,
    pub target_density_g_cm3: f64,
    pub scintillation_yield_per_mev: f64,
    pub fast_time_constant_ns: f64,
    pub resolution_scale: f64,
    pub yield_ratio: f64,
    /// Path to the emission-spectrum dataset; `None` uses the built-in
    /// two-point fallback spectrum without a warning.
    pub spectrum_path: Option<PathBuf>,
    /// Run the sibling overlap check after geometry construction.
    pub check_overlaps: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            tank_inner_radius_mm: 630.0,
            tank_wall_thickness_mm: 2.0,
            tank_half_height_mm: 650.0,
            vessel_outer_radius_mm: 600.0,
            vessel_wall_thickness_mm: 10.0,
            vessel_half_height_mm: 350.0,
            world_half_extent_mm: 1000.0,
            sensors_per_plane: 12,
            sensor_ring_radius_mm: 480.0,
            sensor_axial_margin_mm: 60.0,
            sensor_axial_offset_mm: None,
            sensor_radius_mm: 75.0,
            sensor_half_thickness_mm: 2.0,
            reflector_reflectivity: 0.90,
            photocathode_efficiency: 0.28,
            dopant_mass_fraction: 0.00116,
            buffer_density_g_cm3: 0.853,
            target_density_g_cm3: 0.86086,
            scintillation_yield_per_mev: 4300.0,
            fast_time_constant_ns: 5.0,
            resolution_scale: 1.0,
            yield_ratio: 1.0,
            spectrum_path: None,
            check_overlaps: true,
        }
    }
}

impl DetectorConfig {
    /// Effective axial offset of the two sensor planes.
    pub fn sensor_axial_offset_mm(&self) -> f64 {
        self.sensor_axial_offset_mm
            .unwrap_or(self.vessel_half_height_mm - self.sensor_axial_margin_mm)
    }

    /// Inner radius of the transparent vessel (target radius).
    pub fn vessel_inner_radius_mm(&self) -> f64 {
        self.vessel_outer_radius_mm - self.vessel_wall_thickness_mm
    }

    /// Outer radius of the steel tank wall.
    pub fn tank_outer_radius_mm(&self) -> f64 {
        self.tank_inner_radius_mm + self.tank_wall_thickness_mm
    }

    /// Checks parameter positivity, ordering and ranges.
    ///
    /// Runs before construction so a bad configuration aborts the run
    /// before any geometry is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f64); 10] = [
            ("tank_inner_radius_mm", self.tank_inner_radius_mm),
            ("tank_wall_thickness_mm", self.tank_wall_thickness_mm),
            ("tank_half_height_mm", self.tank_half_height_mm),
            ("vessel_outer_radius_mm", self.vessel_outer_radius_mm),
            ("vessel_wall_thickness_mm", self.vessel_wall_thickness_mm),
            ("vessel_half_height_mm", self.vessel_half_height_mm),
            ("world_half_extent_mm", self.world_half_extent_mm),
            ("sensor_ring_radius_mm", self.sensor_ring_radius_mm),
            ("sensor_radius_mm", self.sensor_radius_mm),
            ("sensor_half_thickness_mm", self.sensor_half_thickness_mm),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        if self.sensors_per_plane == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "sensors_per_plane",
                reason: "must be at least 1".into(),
            });
        }
        if self.vessel_wall_thickness_mm >= self.vessel_outer_radius_mm {
            return Err(ConfigError::InvalidParameter {
                name: "vessel_wall_thickness_mm",
                reason: "wall thickness consumes the whole vessel radius".into(),
            });
        }
        if self.vessel_outer_radius_mm >= self.tank_inner_radius_mm {
            return Err(ConfigError::InvalidParameter {
                name: "vessel_outer_radius_mm",
                reason: "vessel must fit inside the tank".into(),
            });
        }
        for (name, value) in [
            ("reflector_reflectivity", self.reflector_reflectivity),
            ("photocathode_efficiency", self.photocathode_efficiency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be within [0, 1], got {value}"),
                });
            }
        }
        if !(0.0..1.0).contains(&self.dopant_mass_fraction) {
            return Err(ConfigError::InvalidParameter {
                name: "dopant_mass_fraction",
                reason: format!("must be within [0, 1), got {}", self.dopant_mass_fraction),
            });
        }

        Ok(())
    }

    /// Loads a configuration from a TOML file and validates it.
    pub fn from_toml_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let config = DetectorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.sensor_axial_offset_mm(), 290.0);
        assert_eq!(config.vessel_inner_radius_mm(), 590.0);
        assert_eq!(config.tank_outer_radius_mm(), 632.0);
    }

    #[test]
    fn explicit_axial_offset_wins() {
        let config = DetectorConfig {
            sensor_axial_offset_mm: Some(120.0),
            ..Default::default()
        };
        assert_eq!(config.sensor_axial_offset_mm(), 120.0);
    }

    #[test]
    fn negative_radius_is_rejected() {
        let config = DetectorConfig {
            tank_inner_radius_mm: -630.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "tank_inner_radius_mm",
                ..
            }
        ));
    }

    #[test]
    fn vessel_wider_than_tank_is_rejected() {
        let config = DetectorConfig {
            vessel_outer_radius_mm: 700.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn efficiency_outside_unit_interval_is_rejected() {
        let config = DetectorConfig {
            photocathode_efficiency: 1.2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_overrides_merge_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("detector.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "sensors_per_plane = 8").unwrap();
        writeln!(file, "reflector_reflectivity = 0.85").unwrap();
        drop(file);

        let config = DetectorConfig::from_toml_path(&path).unwrap();
        assert_eq!(config.sensors_per_plane, 8);
        assert_eq!(config.reflector_reflectivity, 0.85);
        assert_eq!(config.tank_inner_radius_mm, 630.0);
    }

    #[test]
    fn unknown_toml_key_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("detector.toml");
        std::fs::write(&path, "tank_radius = 630.0\n").unwrap();
        assert!(matches!(
            DetectorConfig::from_toml_path(&path),
            Err(ConfigError::Toml { .. })
        ));
    }
}
