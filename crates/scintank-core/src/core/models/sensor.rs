use super::ids::VolumeId;
use nalgebra::Point3;

/// Which of the two sensor rings a sensor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorPlane {
    Top,
    Bottom,
}

/// One discrete photon sensor placement.
///
/// For `n` sensors per plane, indices `0..n` are the top ring and `n..2n`
/// the bottom ring; top/bottom partners share their (x, y) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    pub index: u32,
    pub plane: SensorPlane,
    pub position_mm: Point3<f64>,
    pub volume: VolumeId,
}
