//! Detector construction: the ordered sequence of builders that populate a
//! [`DetectorModel`](crate::core::models::model::DetectorModel).
//!
//! Construction runs in four phases, each consuming the handles produced by
//! the previous one: materials, then the volume hierarchy, then the boundary
//! surfaces, then the sensor rings. The build workflow drives them in that
//! order; each phase is also usable on its own for partial models in tests.

pub mod geometry;
pub mod materials;
pub mod sensors;
pub mod surfaces;
