use std::f32::consts::PI;

use crate::{HitInfo, Ray3f, Shape, Sphere, Triangle, AABB3f};

/// Epsilon used for ray intersections
pub const RAY_INTERSECT_EPSILON: f32 = 1e-6;

#[inline]
fn in_open_range(t: f32, t_min: f32, t_max: f32) -> bool {
    t > t_min && t < t_max
}

/// Smaller root of the ray sphere quadratic inside `(t_min, t_max)`, falling back to the larger one
pub fn ray_sphere_intersect(sphere: &Sphere, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
    let oc = ray.origin() - sphere.center();
    let a = ray.direction().squared_magnitude();
    let b = oc.dot(&ray.direction());
    let c = oc.squared_magnitude() - sphere.radius() * sphere.radius();

    let discriminant = b * b - a * c;
    // NaN fails this comparison as well
    if !(discriminant > 0.0) {
        return None;
    }

    let root = discriminant.sqrt();
    [(-b - root) / a, (-b + root) / a]
        .into_iter()
        .find(|&t| in_open_range(t, t_min, t_max))
}

/// Moller-Trumbore ray triangle test, accepting hits in `[t_min, t_max]`
pub fn ray_triangle_intersect(tri: &Triangle, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
    let [v1, v2, v3] = tri.vertices();
    let edge1 = v2 - v1;
    let edge2 = v3 - v1;

    let p = ray.direction().cross(&edge2);
    let det = edge1.dot(&p);
    if !(det.abs() >= RAY_INTERSECT_EPSILON) {
        // ray parallel to triangle
        return None;
    }
    let inv_det = 1.0 / det;

    let s = ray.origin() - v1;
    let u = s.dot(&p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = ray.direction().dot(&q) * inv_det;
    if !(v >= 0.0 && u + v <= 1.0) {
        return None;
    }

    let t = edge2.dot(&q) * inv_det;
    (t_min..=t_max).contains(&t).then_some(t)
}

impl Shape for Sphere {
    #[inline]
    fn aabb(&self) -> AABB3f {
        self.bounds()
    }

    fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo> {
        let t = ray_sphere_intersect(self, ray, t_min, t_max)?;
        let point = ray.parametric(t);
        let normal = (point - self.center()).normalized();

        let mut phi = normal.z().atan2(normal.x());
        if phi < 0.0 {
            phi += 2.0 * PI;
        }
        let theta = normal.y().clamp(-1.0, 1.0).acos();

        Some(HitInfo {
            t,
            point,
            normal,
            u: phi / (2.0 * PI),
            v: theta / PI,
        })
    }

    #[inline]
    fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
        ray_sphere_intersect(self, ray, t_min, t_max)
    }
}

impl Shape for Triangle {
    #[inline]
    fn aabb(&self) -> AABB3f {
        self.bounds()
    }

    fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo> {
        let t = ray_triangle_intersect(self, ray, t_min, t_max)?;
        let point = ray.parametric(t);

        // barycentric weights of the hit point; u belongs to v1, v to v2
        let [v1, v2, v3] = self.vertices();
        let e0 = v2 - v1;
        let e1 = v3 - v1;
        let e2 = point - v1;

        let d00 = e0.dot(&e0);
        let d01 = e0.dot(&e1);
        let d11 = e1.dot(&e1);
        let d20 = e2.dot(&e0);
        let d21 = e2.dot(&e1);
        let denom = d00 * d11 - d01 * d01;

        let w2 = (d11 * d20 - d01 * d21) / denom;
        let w3 = (d00 * d21 - d01 * d20) / denom;

        Some(HitInfo {
            t,
            point,
            normal: self.normal(),
            u: 1.0 - w2 - w3,
            v: w2,
        })
    }

    #[inline]
    fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
        ray_triangle_intersect(self, ray, t_min, t_max)
    }
}

#[cfg(test)]
mod tests {

    use rand::{thread_rng, Rng};

    use glam::Vec3A;

    use approx::*;

    use crate::*;

    fn random_triangle<R: Rng>(rng: &mut R) -> Triangle {
        let v0 = rng.gen::<Vec3A>() * 9.0 - Vec3A::splat(5.0);
        let v1: Vec3A = rng.gen();
        let v2: Vec3A = rng.gen();
        Triangle::new(v0.into(), v1.into(), v2.into())
    }

    #[test]
    fn ray_triangle_intersect() {
        let mut rng = thread_rng();
        let tri = random_triangle(&mut rng);

        let ray = Ray3f::new(Vec3f::zero(), tri.centroid());

        let t = tri.intersect_fast(&ray, 0.0, f32::INFINITY);

        assert_abs_diff_eq!(
            t.unwrap_or(f32::INFINITY),
            tri.centroid().magnitude(),
            epsilon = 1e-3
        );
    }

    #[test]
    fn ray_triangle_no_intersect() {
        let mut rng = thread_rng();
        let tri = random_triangle(&mut rng);

        let ray = Ray3f::new(Vec3f::zero(), -tri.centroid());

        assert_eq!(tri.intersect_fast(&ray, 0.0, f32::INFINITY), None);
        assert_eq!(tri.intersect(&ray, 0.0, f32::INFINITY), None);
    }

    #[test]
    fn triangle_barycentrics() {
        let tri = Triangle::new(
            vec3(-1.0, 1.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(0.0, -1.0, 0.0),
        );

        // straight at v1
        let ray = Ray3f::new(vec3(-0.999, 0.999, -1.0), vec3(0.0, 0.0, 1.0));
        let hit = tri.intersect(&ray, 0.1, 100.0).expect("hit");
        assert_abs_diff_eq!(hit.t, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.u, 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(hit.v, 0.0, epsilon = 1e-2);

        let ray = Ray3f::new(vec3(0.0, 1.0 / 3.0, -1.0), vec3(0.0, 0.0, 1.0));
        let hit = tri.intersect(&ray, 0.1, 100.0).expect("hit");
        assert_abs_diff_eq!(hit.u, 1.0 / 3.0, epsilon = 1e-4);
        assert_abs_diff_eq!(hit.v, 1.0 / 3.0, epsilon = 1e-4);
        assert_relative_eq!(hit.point, vec3(0.0, 1.0 / 3.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(hit.normal, tri.normal());
    }

    #[test]
    fn triangle_interval_is_closed() {
        let tri = Triangle::new(
            vec3(-1.0, 1.0, 0.0),
            vec3(1.0, 1.0, 0.0),
            vec3(0.0, -1.0, 0.0),
        );
        let ray = Ray3f::new(vec3(0.0, 0.0, -1.0), vec3(0.0, 0.0, 1.0));

        assert_eq!(tri.intersect_fast(&ray, 0.0, 1.0), Some(1.0));
        assert_eq!(tri.intersect_fast(&ray, 1.0, 2.0), Some(1.0));
        assert_eq!(tri.intersect_fast(&ray, 0.5, 1.5), Some(1.0));
        assert_eq!(tri.intersect_fast(&ray, 0.0, 0.999), None);
        assert_eq!(tri.intersect_fast(&ray, 1.001, 2.0), None);
    }

    #[test]
    fn sphere_closer_root_wins() {
        let sphere = Sphere::new(Vec3f::zero(), 1.0);
        let ray = Ray3f::new(vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0));

        let hit = sphere.intersect(&ray, 0.1, 100.0).expect("hit");
        assert_abs_diff_eq!(hit.t, 4.0, epsilon = 1e-5);
        assert_relative_eq!(hit.point, vec3(0.0, 0.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(hit.normal, vec3(0.0, 0.0, -1.0), epsilon = 1e-5);

        // near root excluded, far root reported
        assert_abs_diff_eq!(
            sphere.intersect_fast(&ray, 4.5, 100.0).unwrap_or(0.0),
            6.0,
            epsilon = 1e-5
        );
        assert_eq!(sphere.intersect_fast(&ray, 6.5, 100.0), None);
    }

    #[test]
    fn sphere_from_inside() {
        let sphere = Sphere::new(Vec3f::zero(), 2.0);
        let ray = Ray3f::new(Vec3f::zero(), vec3(1.0, 0.0, 0.0));

        let hit = sphere.intersect(&ray, 0.0, f32::INFINITY).expect("hit");
        assert_abs_diff_eq!(hit.t, 2.0, epsilon = 1e-5);
        assert_relative_eq!(hit.normal, vec3(1.0, 0.0, 0.0), epsilon = 1e-5);
        assert!((0.0..=1.0).contains(&hit.u));
        assert!((0.0..=1.0).contains(&hit.v));
    }

    #[test]
    fn fast_and_full_agree() {
        let mut rng = thread_rng();
        for _ in 0..500 {
            let shape: Primitive = if rng.gen() {
                rng.gen::<Sphere>().into()
            } else {
                random_triangle(&mut rng).into()
            };
            let origin: Vec3f = (rng.gen::<Vec3A>() * 20.0 - Vec3A::splat(10.0)).into();
            let target: Vec3f = shape.aabb().centroid() + (rng.gen::<Vec3A>() - Vec3A::splat(0.5)).into();
            let ray = Ray3f::new(origin, target - origin);

            let fast = shape.intersect_fast(&ray, 0.0, 100.0);
            let full = shape.intersect(&ray, 0.0, 100.0).map(|hit| hit.t);
            assert_eq!(fast, full);
        }
    }

    #[test]
    fn degenerate_inputs_never_hit() {
        let ray = Ray3f::new(vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 1.0));

        let point_sphere = Sphere::new(Vec3f::zero(), 0.0);
        assert_eq!(point_sphere.intersect(&ray, 0.0, 100.0), None);

        let flat = Triangle::new(Vec3f::zero(), vec3(1.0, 1.0, 0.0), vec3(2.0, 2.0, 0.0));
        assert_eq!(flat.intersect(&ray, 0.0, 100.0), None);

        let zero_ray = Ray3f::new(vec3(0.0, 0.0, -5.0), Vec3f::zero());
        assert_eq!(Sphere::default().intersect(&zero_ray, 0.0, 100.0), None);
        assert_eq!(
            Triangle::new(vec3(-1.0, -1.0, 0.0), vec3(1.0, -1.0, 0.0), vec3(0.0, 1.0, 0.0))
                .intersect_fast(&zero_ray, 0.0, 100.0),
            None
        );
    }
}
