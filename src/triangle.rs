extern crate glam;

use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::{Vec3f, AABB3f};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    v1: Vec3f,
    v2: Vec3f,
    v3: Vec3f,
    normal: Vec3f,
    aabb: AABB3f,
}

impl Triangle {
    #[inline]
    pub fn new(v1: Vec3f, v2: Vec3f, v3: Vec3f) -> Triangle {
        // degenerate triangles get a NaN normal and never report a hit
        let normal = (v2 - v1).cross(&(v3 - v1)).normalized();
        let aabb = AABB3f::new(v1, v2).union_point(&v3);
        Triangle {
            v1,
            v2,
            v3,
            normal,
            aabb,
        }
    }

    #[inline]
    pub fn vertices(&self) -> [Vec3f; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// Unit geometric normal, following the winding `v1 -> v2 -> v3`
    #[inline]
    pub fn normal(&self) -> Vec3f {
        self.normal
    }

    #[inline]
    pub fn centroid(&self) -> Vec3f {
        (self.v1 + self.v2 + self.v3) / 3.0
    }

    #[inline]
    pub(crate) fn bounds(&self) -> AABB3f {
        self.aabb
    }
}

impl Default for Triangle {
    fn default() -> Self {
        Triangle::new(Vec3f::zero(), Vec3f::zero(), Vec3f::zero())
    }
}

impl Distribution<Triangle> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Triangle {
        let v1: glam::Vec3A = rng.gen();
        let v2: glam::Vec3A = rng.gen();
        let v3: glam::Vec3A = rng.gen();
        Triangle::new(v1.into(), v2.into(), v3.into())
    }
}
