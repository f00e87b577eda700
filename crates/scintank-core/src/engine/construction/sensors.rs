use super::geometry::VolumeSet;
use super::materials::MaterialSet;
use super::surfaces::photocathode_table;
use crate::core::models::ids::SensorId;
use crate::core::models::model::DetectorModel;
use crate::core::models::sensor::{Sensor, SensorPlane};
use crate::core::models::surface::{Surface, SurfaceKind};
use crate::core::models::volume::Shape;
use crate::engine::config::DetectorConfig;
use crate::engine::error::EngineError;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use tracing::info;

/// Places the two sensor rings inside the buffer liquid.
///
/// For `n` sensors per plane, sensor `i` of a ring sits at azimuth
/// `2*pi*i/n` on the ring radius. The top ring carries indices `0..n` at
/// `+z_offset`, the bottom ring indices `n..2n` at `-z_offset`, so each
/// top sensor shares its (x, y) with its bottom partner. Every placement
/// is a thin window disk with its own photocathode skin.
pub fn place_sensor_array(
    model: &mut DetectorModel,
    config: &DetectorConfig,
    materials: &MaterialSet,
    volumes: &VolumeSet,
) -> Result<Vec<SensorId>, EngineError> {
    let n = config.sensors_per_plane;
    let ring_radius = config.sensor_ring_radius_mm;
    let z_offset = config.sensor_axial_offset_mm();

    let mut sensors = Vec::with_capacity(2 * n as usize);
    for (plane, z) in [(SensorPlane::Top, z_offset), (SensorPlane::Bottom, -z_offset)] {
        for ring_index in 0..n {
            let index = match plane {
                SensorPlane::Top => ring_index,
                SensorPlane::Bottom => n + ring_index,
            };
            let angle = 2.0 * PI * f64::from(ring_index) / f64::from(n);
            let position = Point3::new(ring_radius * angle.cos(), ring_radius * angle.sin(), z);

            let volume = model.place_volume(
                format!("Sensor_{index}"),
                Shape::Tube {
                    inner_radius_mm: 0.0,
                    outer_radius_mm: config.sensor_radius_mm,
                    half_height_mm: config.sensor_half_thickness_mm,
                },
                materials.window,
                volumes.buffer,
                Vector3::new(position.x, position.y, position.z),
            )?;
            model.attach_skin(Surface::skin(
                format!("Photocathode_{index}"),
                volume,
                SurfaceKind::DielectricMetal,
                photocathode_table(config)?,
            ))?;

            sensors.push(model.add_sensor(Sensor {
                index,
                plane,
                position_mm: position,
                volume,
            }));
        }
    }

    info!(
        count = sensors.len(),
        ring_radius_mm = ring_radius,
        axial_offset_mm = z_offset,
        "Sensor rings placed"
    );
    Ok(sensors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::properties::EmissionTable;
    use crate::engine::construction::{geometry::build_geometry, materials::register_materials};

    fn build(config: &DetectorConfig) -> (DetectorModel, Vec<SensorId>) {
        let mut model = DetectorModel::new();
        let materials =
            register_materials(&mut model, config, &EmissionTable::fallback()).unwrap();
        let volumes = build_geometry(&mut model, config, &materials).unwrap();
        let sensors = place_sensor_array(&mut model, config, &materials, &volumes).unwrap();
        (model, sensors)
    }

    #[test]
    fn default_layout_places_two_rings_of_twelve() {
        let config = DetectorConfig::default();
        let (model, sensors) = build(&config);

        assert_eq!(sensors.len(), 24);
        assert_eq!(model.sensor_count(), 24);

        let top: Vec<_> = sensors
            .iter()
            .filter(|&&id| model.sensor(id).unwrap().plane == SensorPlane::Top)
            .collect();
        assert_eq!(top.len(), 12);
    }

    #[test]
    fn indices_are_contiguous_and_unique() {
        let config = DetectorConfig::default();
        let (model, _) = build(&config);

        let mut indices: Vec<u32> = model.sensors_iter().map(|(_, s)| s.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..24).collect::<Vec<_>>());

        for (_, sensor) in model.sensors_iter() {
            if sensor.index < 12 {
                assert_eq!(sensor.plane, SensorPlane::Top);
            } else {
                assert_eq!(sensor.plane, SensorPlane::Bottom);
            }
        }
    }

    #[test]
    fn partners_share_their_transverse_position() {
        let config = DetectorConfig::default();
        let (model, _) = build(&config);
        let n = config.sensors_per_plane;

        let by_index = |wanted: u32| {
            model
                .sensors_iter()
                .map(|(_, s)| s)
                .find(|s| s.index == wanted)
                .unwrap()
        };
        for i in 0..n {
            let top = by_index(i);
            let bottom = by_index(n + i);
            assert!((top.position_mm.x - bottom.position_mm.x).abs() < 1e-12);
            assert!((top.position_mm.y - bottom.position_mm.y).abs() < 1e-12);
            assert_eq!(top.position_mm.z, 290.0);
            assert_eq!(bottom.position_mm.z, -290.0);
        }
    }

    #[test]
    fn positions_sit_on_the_ring_radius() {
        let config = DetectorConfig::default();
        let (model, _) = build(&config);
        for (_, sensor) in model.sensors_iter() {
            let r = (sensor.position_mm.x.powi(2) + sensor.position_mm.y.powi(2)).sqrt();
            assert!((r - 480.0).abs() < 1e-9, "sensor {} off ring", sensor.index);
        }
    }

    #[test]
    fn every_placement_carries_a_photocathode_skin() {
        let config = DetectorConfig::default();
        let (model, _) = build(&config);
        for (_, sensor) in model.sensors_iter() {
            let skin = model.skin_of(sensor.volume).unwrap();
            let surface = model.surface(skin).unwrap();
            assert_eq!(surface.kind, SurfaceKind::DielectricMetal);
        }
    }

    #[test]
    fn explicit_axial_offset_moves_both_planes() {
        let config = DetectorConfig {
            sensor_axial_offset_mm: Some(150.0),
            ..Default::default()
        };
        let (model, _) = build(&config);
        for (_, sensor) in model.sensors_iter() {
            assert_eq!(sensor.position_mm.z.abs(), 150.0);
        }
    }

    #[test]
    fn sensor_volumes_do_not_overlap_each_other() {
        let config = DetectorConfig::default();
        let (model, _) = build(&config);
        assert!(model.check_overlaps().is_empty());
    }
}
