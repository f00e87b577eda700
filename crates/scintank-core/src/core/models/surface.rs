use super::ids::VolumeId;
use super::properties::PropertyTable;

/// The optical boundary type of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    DielectricDielectric,
    DielectricMetal,
}

/// Surface finish tag. Only polished surfaces appear in this model; the tag
/// is carried for fidelity with the optical-surface description, not
/// interpreted by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFinish {
    Polished,
}

/// Reflection model tag, same caveat as [`SurfaceFinish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceModel {
    Unified,
}

/// A skin optical surface: boundary behavior applied to the entire exterior
/// of one volume.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub name: String,
    pub volume: VolumeId,
    pub kind: SurfaceKind,
    pub finish: SurfaceFinish,
    pub model: SurfaceModel,
    pub properties: PropertyTable,
}

impl Surface {
    pub fn skin(
        name: impl Into<String>,
        volume: VolumeId,
        kind: SurfaceKind,
        properties: PropertyTable,
    ) -> Self {
        Self {
            name: name.into(),
            volume,
            kind,
            finish: SurfaceFinish::Polished,
            model: SurfaceModel::Unified,
            properties,
        }
    }
}
