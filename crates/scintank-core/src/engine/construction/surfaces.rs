use super::geometry::VolumeSet;
use super::materials::SHARED_GRID_EV;
use crate::core::models::ids::SurfaceId;
use crate::core::models::model::DetectorModel;
use crate::core::models::properties::{PropertyKind, PropertyTable};
use crate::core::models::surface::{Surface, SurfaceKind};
use crate::engine::config::DetectorConfig;
use crate::engine::error::EngineError;
use tracing::info;

/// Handles to the two tank boundary surfaces. Photocathode skins are
/// attached per sensor placement, see the sensor array builder.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceSet {
    pub vessel_skin: SurfaceId,
    pub reflector_skin: SurfaceId,
}

fn flat(value: f64) -> (Vec<f64>, Vec<f64>) {
    (SHARED_GRID_EV.to_vec(), vec![value; SHARED_GRID_EV.len()])
}

/// Reflectivity/efficiency table of the photocathode skin shared by all
/// sensor placements: constant efficiency, zero reflectivity.
pub fn photocathode_table(config: &DetectorConfig) -> Result<PropertyTable, EngineError> {
    let mut table = PropertyTable::new();
    let (grid, values) = flat(config.photocathode_efficiency);
    table.insert_array(PropertyKind::Efficiency, grid, values)?;
    let (grid, values) = flat(0.0);
    table.insert_array(PropertyKind::Reflectivity, grid, values)?;
    Ok(table)
}

/// Attaches the two tank boundary definitions:
///
/// - the acrylic vessel skin, dielectric-dielectric with a flat zero
///   reflectivity table; it establishes the interface without reflecting;
/// - the tank inner-wall reflector skin, dielectric-metal with constant
///   reflectivity and zero detection efficiency, modeling a reflective
///   liner on the steel.
pub fn attach_boundary_surfaces(
    model: &mut DetectorModel,
    config: &DetectorConfig,
    volumes: &VolumeSet,
) -> Result<SurfaceSet, EngineError> {
    let mut vessel_table = PropertyTable::new();
    let (grid, values) = flat(0.0);
    vessel_table.insert_array(PropertyKind::Reflectivity, grid, values)?;
    let vessel_skin = model.attach_skin(Surface::skin(
        "VesselSkin",
        volumes.vessel_wall,
        SurfaceKind::DielectricDielectric,
        vessel_table,
    ))?;

    let mut reflector_table = PropertyTable::new();
    let (grid, values) = flat(config.reflector_reflectivity);
    reflector_table.insert_array(PropertyKind::Reflectivity, grid, values)?;
    let (grid, values) = flat(0.0);
    reflector_table.insert_array(PropertyKind::Efficiency, grid, values)?;
    let reflector_skin = model.attach_skin(Surface::skin(
        "TankReflector",
        volumes.tank_wall,
        SurfaceKind::DielectricMetal,
        reflector_table,
    ))?;

    info!(
        reflectivity = config.reflector_reflectivity,
        "Boundary surfaces attached"
    );

    Ok(SurfaceSet {
        vessel_skin,
        reflector_skin,
    })
}
