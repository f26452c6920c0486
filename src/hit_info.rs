use crate::Vec3f;

/// Surface record of a ray hit
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitInfo {
    /// Ray parameter of the hit
    pub t: f32,
    pub point: Vec3f,
    pub normal: Vec3f,
    /// Shape local parametric coordinates
    pub u: f32,
    pub v: f32,
}
