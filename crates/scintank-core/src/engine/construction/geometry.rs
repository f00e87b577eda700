use super::materials::MaterialSet;
use crate::core::models::ids::VolumeId;
use crate::core::models::model::{DetectorModel, ModelError};
use crate::core::models::volume::Shape;
use crate::engine::config::DetectorConfig;
use crate::engine::error::EngineError;
use nalgebra::Vector3;
use tracing::info;

/// Handles to the named detector volumes.
#[derive(Debug, Clone, Copy)]
pub struct VolumeSet {
    pub world: VolumeId,
    pub tank_wall: VolumeId,
    pub buffer: VolumeId,
    pub vessel_wall: VolumeId,
    pub target: VolumeId,
}

/// Builds the nested volume hierarchy and designates the scoring volume.
///
/// world (box) ⊃ steel tank wall (annulus) and buffer liquid (disk)
/// ⊃ vessel wall (annulus, child of the buffer) ⊃ target liquid (disk).
/// All cylinders are concentric on the z axis. Any radius-ordering or
/// containment violation aborts construction; when enabled, the sibling
/// overlap check runs as a final sanity pass.
pub fn build_geometry(
    model: &mut DetectorModel,
    config: &DetectorConfig,
    materials: &MaterialSet,
) -> Result<VolumeSet, EngineError> {
    let world = model.add_world(
        "World",
        Shape::Box {
            half_extent_mm: config.world_half_extent_mm,
        },
        materials.air,
    )?;

    let tank_wall = model.place_volume(
        "SteelTank",
        Shape::Tube {
            inner_radius_mm: config.tank_inner_radius_mm,
            outer_radius_mm: config.tank_outer_radius_mm(),
            half_height_mm: config.tank_half_height_mm,
        },
        materials.steel,
        world,
        Vector3::zeros(),
    )?;

    let buffer = model.place_volume(
        "LabBuffer",
        Shape::Tube {
            inner_radius_mm: 0.0,
            outer_radius_mm: config.tank_inner_radius_mm,
            half_height_mm: config.tank_half_height_mm,
        },
        materials.buffer,
        world,
        Vector3::zeros(),
    )?;

    let vessel_wall = model.place_volume(
        "AcrylicVessel",
        Shape::Tube {
            inner_radius_mm: config.vessel_inner_radius_mm(),
            outer_radius_mm: config.vessel_outer_radius_mm,
            half_height_mm: config.vessel_half_height_mm,
        },
        materials.acrylic,
        buffer,
        Vector3::zeros(),
    )?;

    let target = model.place_volume(
        "GdTarget",
        Shape::Tube {
            inner_radius_mm: 0.0,
            outer_radius_mm: config.vessel_inner_radius_mm(),
            half_height_mm: config.vessel_half_height_mm,
        },
        materials.target,
        vessel_wall,
        Vector3::zeros(),
    )?;
    model.mark_scoring(target)?;

    if config.check_overlaps {
        let offending = model.check_overlaps();
        if let Some(&(a, b)) = offending.first() {
            let name = |id: VolumeId| {
                model
                    .volume(id)
                    .map(|v| v.name.clone())
                    .unwrap_or_default()
            };
            return Err(EngineError::from(ModelError::OverlappingVolumes {
                a: name(a),
                b: name(b),
            }));
        }
    }

    info!(
        volumes = model.volumes_iter().count(),
        "Volume hierarchy constructed, scoring volume 'GdTarget' designated"
    );

    Ok(VolumeSet {
        world,
        tank_wall,
        buffer,
        vessel_wall,
        target,
    })
}
