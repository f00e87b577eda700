use super::ids::{MaterialId, VolumeId};
use nalgebra::Vector3;

/// The solid shape of a volume, concentric on the detector axis.
///
/// Dimensions are in millimetres. A `Tube` with `inner_radius == 0` is a
/// full disk/cylinder; a non-zero inner radius makes it an annular shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { half_extent_mm: f64 },
    Tube {
        inner_radius_mm: f64,
        outer_radius_mm: f64,
        half_height_mm: f64,
    },
}

impl Shape {
    /// Largest distance from the shape's own axis to its radial boundary.
    pub fn radial_extent_mm(&self) -> f64 {
        match *self {
            Shape::Box { half_extent_mm } => half_extent_mm,
            Shape::Tube {
                outer_radius_mm, ..
            } => outer_radius_mm,
        }
    }

    /// Half-extent along z.
    pub fn axial_extent_mm(&self) -> f64 {
        match *self {
            Shape::Box { half_extent_mm } => half_extent_mm,
            Shape::Tube { half_height_mm, .. } => half_height_mm,
        }
    }

    /// Inner radius for annular shapes, zero otherwise.
    pub fn inner_radius_mm(&self) -> f64 {
        match *self {
            Shape::Box { .. } => 0.0,
            Shape::Tube {
                inner_radius_mm, ..
            } => inner_radius_mm,
        }
    }
}

/// One solid region of the detector model.
///
/// A volume is exclusively owned by its parent for the lifetime of the
/// model; parent/child links are handles into the model's registry, never
/// owning pointers.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub name: String,
    pub shape: Shape,
    pub material: MaterialId,
    pub parent: Option<VolumeId>,
    /// Translation relative to the parent's center.
    pub translation_mm: Vector3<f64>,
    pub children: Vec<VolumeId>,
    pub is_scoring: bool,
}

impl Volume {
    pub fn new(name: impl Into<String>, shape: Shape, material: MaterialId) -> Self {
        Self {
            name: name.into(),
            shape,
            material,
            parent: None,
            translation_mm: Vector3::zeros(),
            children: Vec::new(),
            is_scoring: false,
        }
    }

    /// Radial offset of this volume's axis from its parent's axis.
    pub fn radial_offset_mm(&self) -> f64 {
        (self.translation_mm.x.powi(2) + self.translation_mm.y.powi(2)).sqrt()
    }
}
