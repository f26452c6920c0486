use std::sync::Arc;

use crate::{HitInfo, Ray3f, Sphere, Triangle, AABB3f};

/// Geometry the BVH can index and query.
///
/// Queries take `&self` only, so shapes can be shared between threads
/// whenever the implementor is `Sync`.
pub trait Shape {
    /// World space bounds
    fn aabb(&self) -> AABB3f;

    /// Closest hit with a parameter inside `t_min..t_max`.
    ///
    /// Spheres exclude both ends of the range, triangles include them.
    fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo>;

    /// Distance only version of [`Shape::intersect`]. Must agree with it on hit or miss.
    fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32>;
}

impl<S: Shape + ?Sized> Shape for &S {
    #[inline]
    fn aabb(&self) -> AABB3f {
        (**self).aabb()
    }

    #[inline]
    fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo> {
        (**self).intersect(ray, t_min, t_max)
    }

    #[inline]
    fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
        (**self).intersect_fast(ray, t_min, t_max)
    }
}

impl<S: Shape + ?Sized> Shape for Box<S> {
    #[inline]
    fn aabb(&self) -> AABB3f {
        (**self).aabb()
    }

    #[inline]
    fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo> {
        (**self).intersect(ray, t_min, t_max)
    }

    #[inline]
    fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
        (**self).intersect_fast(ray, t_min, t_max)
    }
}

impl<S: Shape + ?Sized> Shape for Arc<S> {
    #[inline]
    fn aabb(&self) -> AABB3f {
        (**self).aabb()
    }

    #[inline]
    fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo> {
        (**self).intersect(ray, t_min, t_max)
    }

    #[inline]
    fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
        (**self).intersect_fast(ray, t_min, t_max)
    }
}

/// Closed set of the built-in shapes, for scenes that want a single concrete type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<Triangle> for Primitive {
    fn from(triangle: Triangle) -> Self {
        Primitive::Triangle(triangle)
    }
}

impl Shape for Primitive {
    #[inline]
    fn aabb(&self) -> AABB3f {
        match self {
            Primitive::Sphere(sphere) => sphere.aabb(),
            Primitive::Triangle(triangle) => triangle.aabb(),
        }
    }

    #[inline]
    fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo> {
        match self {
            Primitive::Sphere(sphere) => sphere.intersect(ray, t_min, t_max),
            Primitive::Triangle(triangle) => triangle.intersect(ray, t_min, t_max),
        }
    }

    #[inline]
    fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
        match self {
            Primitive::Sphere(sphere) => sphere.intersect_fast(ray, t_min, t_max),
            Primitive::Triangle(triangle) => triangle.intersect_fast(ray, t_min, t_max),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::*;

    #[test]
    fn primitive_dispatch() {
        let sphere = Sphere::new(Vec3f::zero(), 1.0);
        let triangle = Triangle::new(
            vec3(-1.0, 1.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(0.0, -1.0, 0.0),
        );
        let ray = Ray3f::new(vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0));

        let primitives: Vec<Primitive> = vec![sphere.into(), triangle.into()];

        assert_eq!(primitives[0].aabb(), sphere.aabb());
        assert_eq!(primitives[1].aabb(), triangle.aabb());
        assert_eq!(
            primitives[0].intersect_fast(&ray, 0.1, 100.0),
            sphere.intersect_fast(&ray, 0.1, 100.0)
        );
        assert_eq!(
            primitives[1].intersect(&ray, 0.1, 100.0),
            triangle.intersect(&ray, 0.1, 100.0)
        );
    }

    #[test]
    fn boxed_and_shared_shapes() {
        let sphere = Sphere::new(vec3(0.0, 0.0, 3.0), 0.5);
        let ray = Ray3f::new(Vec3f::zero(), vec3(0.0, 0.0, 1.0));

        let boxed: Box<dyn Shape> = Box::new(sphere);
        let shared: Arc<dyn Shape + Send + Sync> = Arc::new(sphere);

        assert_eq!(boxed.intersect_fast(&ray, 0.0, 10.0), Some(2.5));
        assert_eq!(shared.intersect(&ray, 0.0, 10.0), sphere.intersect(&ray, 0.0, 10.0));
        assert_eq!(boxed.aabb(), shared.aabb());
    }
}
