use num::Float;

use crate::{Axis, Ray, Vector};

/// Axis aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB<T, const N: usize> {
    min: Vector<T, N>,
    max: Vector<T, N>,
}

pub type AABB2f = AABB<f32, 2>;
pub type AABB2d = AABB<f64, 2>;
pub type AABB3f = AABB<f32, 3>;
pub type AABB3d = AABB<f64, 3>;

/// The empty box (min = +inf, max = -inf), the identity of `union`
impl<T: Float, const N: usize> Default for AABB<T, N> {
    fn default() -> Self {
        Self {
            min: Vector::splat(T::infinity()),
            max: Vector::splat(T::neg_infinity()),
        }
    }
}

impl<T: Float, const N: usize> AABB<T, N> {
    /// Box spanned by two corners, in any order
    #[inline]
    pub fn new(p1: Vector<T, N>, p2: Vector<T, N>) -> Self {
        Self {
            min: p1.min(&p2),
            max: p1.max(&p2),
        }
    }

    #[inline]
    pub fn from_point(point: Vector<T, N>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    #[inline]
    pub fn min(&self) -> Vector<T, N> {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vector<T, N> {
        self.max
    }

    /// If no point lies inside the box (min > max on some axis)
    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..N).any(|i| self.min[i] > self.max[i])
    }

    #[inline]
    pub fn diagonal(&self) -> Vector<T, N> {
        self.max - self.min
    }

    #[inline]
    pub fn centroid(&self) -> Vector<T, N> {
        let half = T::one() / (T::one() + T::one());
        self.min * half + self.max * half
    }

    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    #[inline]
    pub fn union_point(&self, point: &Vector<T, N>) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// If `other` lies entirely inside this box
    pub fn contains(&self, other: &Self) -> bool {
        (0..N).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }

    /// Axis with the largest extent. Ties go to the lowest axis.
    pub fn maximum_extent(&self) -> usize {
        let diagonal = self.diagonal();
        (0..N.saturating_sub(1))
            .find(|&i| ((i + 1)..N).all(|j| diagonal[j] <= diagonal[i]))
            .unwrap_or(N.saturating_sub(1))
    }

    /// Sum of the areas of every face pair. Zero for an empty box.
    pub fn surface_area(&self) -> T {
        if self.is_empty() {
            return T::zero();
        }

        let diagonal = self.diagonal();
        let mut sum = T::zero();
        for i in 0..N {
            for j in (i + 1)..N {
                sum = sum + diagonal[i] * diagonal[j];
            }
        }

        (T::one() + T::one()) * sum
    }

    /// Slab test against the parametric range `[t_min, t_max]`
    pub fn intersect(&self, ray: &Ray<T, N>, mut t_min: T, mut t_max: T) -> bool {
        let origin = ray.origin();
        let inv_direction = ray.inv_direction();

        for i in 0..N {
            let mut near = (self.min[i] - origin[i]) * inv_direction[i];
            let mut far = (self.max[i] - origin[i]) * inv_direction[i];

            // a parallel ray starting on a face plane gives 0 * inf = NaN; it lies
            // inside that slab for every t, so the axis does not narrow the interval
            if near.is_nan() || far.is_nan() {
                continue;
            }
            if near > far {
                std::mem::swap(&mut near, &mut far);
            }

            if near > t_min {
                t_min = near;
            }
            if far < t_max {
                t_max = far;
            }

            // flat boxes hit head on give t_min == t_max and must pass
            if t_max < t_min {
                return false;
            }
        }

        true
    }
}

impl<T: Float> AABB<T, 3> {
    #[inline]
    pub fn maximum_extent_axis(&self) -> Axis {
        Axis::from_index(self.maximum_extent()).unwrap_or(Axis::Z)
    }
}
