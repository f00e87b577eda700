use super::ids::{MaterialId, SensorId, SurfaceId, VolumeId};
use super::material::{Composition, Material, MixtureComponent};
use super::sensor::Sensor;
use super::surface::Surface;
use super::volume::{Shape, Volume};
use crate::core::utils::elements;
use nalgebra::Vector3;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;
use thiserror::Error;

/// Tolerance for mass-fraction sums and geometric comparisons.
const FRACTION_TOLERANCE: f64 = 1e-6;
const GEOM_TOLERANCE_MM: f64 = 1e-9;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Volume '{name}': {detail}")]
    InvalidShape { name: String, detail: String },

    #[error("Volume '{child}' extends outside its parent '{parent}': {detail}")]
    OutsideParent {
        child: String,
        parent: String,
        detail: String,
    },

    #[error("Parent volume handle is not in the model")]
    ParentNotFound,

    #[error("Volume handle is not in the model")]
    VolumeNotFound,

    #[error("A world volume already exists")]
    WorldAlreadySet,

    #[error("Duplicate volume name '{0}'")]
    DuplicateVolumeName(String),

    #[error("Duplicate material name '{0}'")]
    DuplicateMaterialName(String),

    #[error("Volume '{volume}' already has a skin surface ('{existing}')")]
    DuplicateSkin { volume: String, existing: String },

    #[error("Scoring volume already designated ('{existing}')")]
    ScoringAlreadySet { existing: String },

    #[error("Material '{material}': unknown element symbol '{symbol}'")]
    UnknownElement { material: String, symbol: String },

    #[error("Material '{material}': {detail}")]
    BadComposition { material: String, detail: String },

    #[error("Volumes '{a}' and '{b}' overlap")]
    OverlappingVolumes { a: String, b: String },
}

/// The complete, immutable-after-construction detector model.
///
/// Materials, volumes, surfaces and sensors live in slot-map registries and
/// are referenced by stable handles. The model owns every object for the
/// lifetime of a run; construction code mutates it, tracking code only
/// reads it.
#[derive(Debug, Clone, Default)]
pub struct DetectorModel {
    materials: SlotMap<MaterialId, Material>,
    volumes: SlotMap<VolumeId, Volume>,
    surfaces: SlotMap<SurfaceId, Surface>,
    sensors: SlotMap<SensorId, Sensor>,
    material_name_map: HashMap<String, MaterialId>,
    volume_name_map: HashMap<String, VolumeId>,
    skin_map: SecondaryMap<VolumeId, SurfaceId>,
    world: Option<VolumeId>,
    scoring: Option<VolumeId>,
}

impl DetectorModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a material after validating its composition.
    ///
    /// Element symbols must exist in the element table; mass-fraction and
    /// mixture compositions must sum to 1 within tolerance; mixture
    /// components referring to other materials must already be registered.
    pub fn add_material(&mut self, material: Material) -> Result<MaterialId, ModelError> {
        if self.material_name_map.contains_key(&material.name) {
            return Err(ModelError::DuplicateMaterialName(material.name));
        }
        self.validate_composition(&material)?;

        let name = material.name.clone();
        let id = self.materials.insert(material);
        self.material_name_map.insert(name, id);
        Ok(id)
    }

    fn validate_composition(&self, material: &Material) -> Result<(), ModelError> {
        let unknown = |symbol: &str| ModelError::UnknownElement {
            material: material.name.clone(),
            symbol: symbol.to_string(),
        };
        let bad = |detail: String| ModelError::BadComposition {
            material: material.name.clone(),
            detail,
        };

        match &material.composition {
            Composition::Elements(counts) => {
                if counts.is_empty() {
                    return Err(bad("empty element list".into()));
                }
                for entry in counts {
                    if elements::element(&entry.symbol).is_none() {
                        return Err(unknown(&entry.symbol));
                    }
                    if entry.count == 0 {
                        return Err(bad(format!("element '{}' has zero count", entry.symbol)));
                    }
                }
            }
            Composition::MassFractions(fractions) => {
                let mut sum = 0.0;
                for entry in fractions {
                    if elements::element(&entry.symbol).is_none() {
                        return Err(unknown(&entry.symbol));
                    }
                    if entry.fraction <= 0.0 {
                        return Err(bad(format!(
                            "element '{}' has non-positive fraction",
                            entry.symbol
                        )));
                    }
                    sum += entry.fraction;
                }
                if (sum - 1.0).abs() > FRACTION_TOLERANCE {
                    return Err(bad(format!("mass fractions sum to {sum}, expected 1")));
                }
            }
            Composition::Mixture(parts) => {
                let mut sum = 0.0;
                for part in parts {
                    match &part.component {
                        MixtureComponent::Material(id) => {
                            if !self.materials.contains_key(*id) {
                                return Err(bad("mixture component material not registered".into()));
                            }
                        }
                        MixtureComponent::Element(symbol) => {
                            if elements::element(symbol).is_none() {
                                return Err(unknown(symbol));
                            }
                        }
                    }
                    if part.mass_fraction <= 0.0 {
                        return Err(bad("mixture component has non-positive fraction".into()));
                    }
                    sum += part.mass_fraction;
                }
                if (sum - 1.0).abs() > FRACTION_TOLERANCE {
                    return Err(bad(format!("mixture fractions sum to {sum}, expected 1")));
                }
            }
        }
        Ok(())
    }

    /// Creates the world volume. There can be only one; it has no parent.
    pub fn add_world(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        material: MaterialId,
    ) -> Result<VolumeId, ModelError> {
        if self.world.is_some() {
            return Err(ModelError::WorldAlreadySet);
        }
        let volume = Volume::new(name, shape, material);
        validate_shape(&volume)?;
        let id = self.insert_volume(volume)?;
        self.world = Some(id);
        Ok(id)
    }

    /// Places a volume inside a parent, checking the shape and containment
    /// invariants. Overlapping or escaping geometry is a fatal error, never
    /// silently accepted.
    pub fn place_volume(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        material: MaterialId,
        parent: VolumeId,
        translation_mm: Vector3<f64>,
    ) -> Result<VolumeId, ModelError> {
        let mut volume = Volume::new(name, shape, material);
        volume.parent = Some(parent);
        volume.translation_mm = translation_mm;
        validate_shape(&volume)?;

        let parent_volume = self
            .volumes
            .get(parent)
            .ok_or(ModelError::ParentNotFound)?;
        validate_containment(&volume, parent_volume)?;

        let id = self.insert_volume(volume)?;
        self.volumes[parent].children.push(id);
        Ok(id)
    }

    fn insert_volume(&mut self, volume: Volume) -> Result<VolumeId, ModelError> {
        if self.volume_name_map.contains_key(&volume.name) {
            return Err(ModelError::DuplicateVolumeName(volume.name));
        }
        let name = volume.name.clone();
        let id = self.volumes.insert(volume);
        self.volume_name_map.insert(name, id);
        Ok(id)
    }

    /// Marks a volume as the scoring volume. Exactly one volume may carry
    /// the flag.
    pub fn mark_scoring(&mut self, id: VolumeId) -> Result<(), ModelError> {
        if let Some(existing) = self.scoring {
            return Err(ModelError::ScoringAlreadySet {
                existing: self.volumes[existing].name.clone(),
            });
        }
        let volume = self.volumes.get_mut(id).ok_or(ModelError::VolumeNotFound)?;
        volume.is_scoring = true;
        self.scoring = Some(id);
        Ok(())
    }

    /// Attaches a skin surface. The bound volume must exist and must not
    /// already carry a skin.
    pub fn attach_skin(&mut self, surface: Surface) -> Result<SurfaceId, ModelError> {
        let volume = self
            .volumes
            .get(surface.volume)
            .ok_or(ModelError::VolumeNotFound)?;
        if let Some(&existing) = self.skin_map.get(surface.volume) {
            return Err(ModelError::DuplicateSkin {
                volume: volume.name.clone(),
                existing: self.surfaces[existing].name.clone(),
            });
        }
        let volume_id = surface.volume;
        let id = self.surfaces.insert(surface);
        self.skin_map.insert(volume_id, id);
        Ok(id)
    }

    pub fn add_sensor(&mut self, sensor: Sensor) -> SensorId {
        self.sensors.insert(sensor)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn volume(&self, id: VolumeId) -> Option<&Volume> {
        self.volumes.get(id)
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id)
    }

    pub fn sensor(&self, id: SensorId) -> Option<&Sensor> {
        self.sensors.get(id)
    }

    pub fn find_material(&self, name: &str) -> Option<MaterialId> {
        self.material_name_map.get(name).copied()
    }

    pub fn find_volume(&self, name: &str) -> Option<VolumeId> {
        self.volume_name_map.get(name).copied()
    }

    pub fn skin_of(&self, volume: VolumeId) -> Option<SurfaceId> {
        self.skin_map.get(volume).copied()
    }

    pub fn world(&self) -> Option<VolumeId> {
        self.world
    }

    pub fn scoring_volume(&self) -> Option<VolumeId> {
        self.scoring
    }

    pub fn materials_iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter()
    }

    pub fn volumes_iter(&self) -> impl Iterator<Item = (VolumeId, &Volume)> {
        self.volumes.iter()
    }

    pub fn surfaces_iter(&self) -> impl Iterator<Item = (SurfaceId, &Surface)> {
        self.surfaces.iter()
    }

    pub fn sensors_iter(&self) -> impl Iterator<Item = (SensorId, &Sensor)> {
        self.sensors.iter()
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Pairwise overlap check over sibling volumes.
    ///
    /// Tubes are compared via their bounding cylinders, with placements
    /// inside another tube's inner bore exempted; touching boundaries do
    /// not count as overlap. Returns the offending pairs, empty when the
    /// geometry is clean.
    pub fn check_overlaps(&self) -> Vec<(VolumeId, VolumeId)> {
        let mut offending = Vec::new();
        for (_, parent) in self.volumes.iter() {
            for (i, &a_id) in parent.children.iter().enumerate() {
                for &b_id in &parent.children[i + 1..] {
                    let a = &self.volumes[a_id];
                    let b = &self.volumes[b_id];
                    if siblings_overlap(a, b) {
                        offending.push((a_id, b_id));
                    }
                }
            }
        }
        offending
    }
}

fn validate_shape(volume: &Volume) -> Result<(), ModelError> {
    let invalid = |detail: String| ModelError::InvalidShape {
        name: volume.name.clone(),
        detail,
    };
    match volume.shape {
        Shape::Box { half_extent_mm } => {
            if half_extent_mm <= 0.0 {
                return Err(invalid(format!("non-positive half extent {half_extent_mm}")));
            }
        }
        Shape::Tube {
            inner_radius_mm,
            outer_radius_mm,
            half_height_mm,
        } => {
            if inner_radius_mm < 0.0 {
                return Err(invalid(format!("negative inner radius {inner_radius_mm}")));
            }
            if outer_radius_mm <= 0.0 {
                return Err(invalid(format!("non-positive outer radius {outer_radius_mm}")));
            }
            if inner_radius_mm >= outer_radius_mm {
                return Err(invalid(format!(
                    "inner radius {inner_radius_mm} must be strictly below outer radius {outer_radius_mm}"
                )));
            }
            if half_height_mm <= 0.0 {
                return Err(invalid(format!("non-positive half height {half_height_mm}")));
            }
        }
    }
    Ok(())
}

fn validate_containment(child: &Volume, parent: &Volume) -> Result<(), ModelError> {
    let outside = |detail: String| ModelError::OutsideParent {
        child: child.name.clone(),
        parent: parent.name.clone(),
        detail,
    };

    let radial_reach = child.radial_offset_mm() + child.shape.radial_extent_mm();
    let parent_radial = parent.shape.radial_extent_mm();
    if radial_reach > parent_radial + GEOM_TOLERANCE_MM {
        return Err(outside(format!(
            "radial reach {radial_reach} mm exceeds parent extent {parent_radial} mm"
        )));
    }

    let axial_reach = child.translation_mm.z.abs() + child.shape.axial_extent_mm();
    let parent_axial = parent.shape.axial_extent_mm();
    if axial_reach > parent_axial + GEOM_TOLERANCE_MM {
        return Err(outside(format!(
            "axial reach {axial_reach} mm exceeds parent extent {parent_axial} mm"
        )));
    }

    Ok(())
}

fn siblings_overlap(a: &Volume, b: &Volume) -> bool {
    // z intervals first; touching endpoints are not an overlap.
    let (a_lo, a_hi) = (
        a.translation_mm.z - a.shape.axial_extent_mm(),
        a.translation_mm.z + a.shape.axial_extent_mm(),
    );
    let (b_lo, b_hi) = (
        b.translation_mm.z - b.shape.axial_extent_mm(),
        b.translation_mm.z + b.shape.axial_extent_mm(),
    );
    if a_hi <= b_lo + GEOM_TOLERANCE_MM || b_hi <= a_lo + GEOM_TOLERANCE_MM {
        return false;
    }

    let dx = a.translation_mm.x - b.translation_mm.x;
    let dy = a.translation_mm.y - b.translation_mm.y;
    let axis_distance = (dx * dx + dy * dy).sqrt();

    let a_outer = a.shape.radial_extent_mm();
    let b_outer = b.shape.radial_extent_mm();
    if axis_distance >= a_outer + b_outer - GEOM_TOLERANCE_MM {
        return false;
    }

    // One tube sitting entirely inside the other's inner bore is clean.
    // Covers both concentric annuli and off-axis placements inside an
    // annulus, like a sensor ring inside the vessel wall.
    let a_inner = a.shape.inner_radius_mm();
    let b_inner = b.shape.inner_radius_mm();
    if axis_distance + a_outer <= b_inner + GEOM_TOLERANCE_MM
        || axis_distance + b_outer <= a_inner + GEOM_TOLERANCE_MM
    {
        return false;
    }

    true
}
