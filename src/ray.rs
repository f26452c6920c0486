use num::Float;

use crate::Vector;

/// Ray with a unit direction. The reciprocal direction is cached for slab tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray<T, const N: usize> {
    origin: Vector<T, N>,
    direction: Vector<T, N>,
    inv_direction: Vector<T, N>,
}

pub type Ray2f = Ray<f32, 2>;
pub type Ray2d = Ray<f64, 2>;
pub type Ray3f = Ray<f32, 3>;
pub type Ray3d = Ray<f64, 3>;

impl<T: Float, const N: usize> Default for Ray<T, N> {
    fn default() -> Self {
        let mut direction = Vector::zero();
        direction[0] = T::one();
        Self::new(Vector::zero(), direction)
    }
}

impl<T: Float, const N: usize> Ray<T, N> {
    /// The direction is normalized. A zero direction produces a ray that hits nothing.
    #[inline]
    pub fn new(origin: Vector<T, N>, direction: Vector<T, N>) -> Self {
        let direction = direction.normalized();
        Self {
            origin,
            direction,
            inv_direction: direction.recip(),
        }
    }

    #[inline]
    pub fn set(&mut self, origin: Vector<T, N>, direction: Vector<T, N>) {
        *self = Self::new(origin, direction);
    }

    #[inline]
    pub fn origin(&self) -> Vector<T, N> {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vector<T, N> {
        self.direction
    }

    #[inline]
    pub fn inv_direction(&self) -> Vector<T, N> {
        self.inv_direction
    }

    /// Point at `origin + t * direction`
    #[inline]
    pub fn parametric(&self, t: T) -> Vector<T, N> {
        self.origin + self.direction * t
    }
}
