use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::f64::consts::PI;

/// Samples a point uniformly inside a z-aligned cylinder centered at the
/// origin. The radius is drawn as `R * sqrt(u)` so the areal density is
/// uniform rather than clustered on the axis.
pub fn uniform_point_in_cylinder(
    radius_mm: f64,
    half_height_mm: f64,
    rng: &mut impl Rng,
) -> Point3<f64> {
    let r = radius_mm * rng.r#gen::<f64>().sqrt();
    let phi = 2.0 * PI * rng.r#gen::<f64>();
    let z = half_height_mm * (2.0 * rng.r#gen::<f64>() - 1.0);
    Point3::new(r * phi.cos(), r * phi.sin(), z)
}

/// Samples an isotropic unit direction: cos(theta) uniform in [-1, 1],
/// azimuth uniform in [0, 2*pi).
pub fn isotropic_direction(rng: &mut impl Rng) -> Vector3<f64> {
    let cos_theta = 2.0 * rng.r#gen::<f64>() - 1.0;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * rng.r#gen::<f64>();
    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}
