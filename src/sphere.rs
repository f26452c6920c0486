extern crate glam;

use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::{Vec3f, AABB3f};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3f,
    radius: f32,
    aabb: AABB3f,
}

impl Sphere {
    #[inline]
    pub fn new(center: Vec3f, radius: f32) -> Sphere {
        let extent = Vec3f::splat(radius);
        Sphere {
            center,
            radius,
            aabb: AABB3f::new(center - extent, center + extent),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3f {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub(crate) fn bounds(&self) -> AABB3f {
        self.aabb
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Sphere::new(Vec3f::zero(), 1.0)
    }
}

/// Spheres centered in [-5, 5]^3 with radius in [0.05, 0.5)
impl Distribution<Sphere> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Sphere {
        let center = rng.gen::<glam::Vec3A>() * 10.0 - glam::Vec3A::splat(5.0);
        Sphere::new(center.into(), rng.gen_range(0.05..0.5))
    }
}
