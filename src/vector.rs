extern crate glam;

use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};
use num::Float;

/// Fixed dimension vector. Every operation returns a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Vector<T, const N: usize>(pub(crate) [T; N]);

pub type Vec2f = Vector<f32, 2>;
pub type Vec2d = Vector<f64, 2>;
pub type Vec3f = Vector<f32, 3>;
pub type Vec3d = Vector<f64, 3>;

#[inline]
pub fn vec2<T>(x: T, y: T) -> Vector<T, 2> {
    Vector([x, y])
}

#[inline]
pub fn vec3<T>(x: T, y: T, z: T) -> Vector<T, 3> {
    Vector([x, y, z])
}

impl<T, const N: usize> Vector<T, N> {
    #[inline]
    pub const fn new(components: [T; N]) -> Self {
        Self(components)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: Float, const N: usize> Vector<T, N> {
    #[inline]
    pub fn splat(value: T) -> Self {
        Self([value; N])
    }

    #[inline]
    pub fn zero() -> Self {
        Self::splat(T::zero())
    }

    #[inline]
    pub fn components(&self) -> [T; N] {
        self.0
    }

    #[inline]
    fn map(self, f: impl Fn(T) -> T) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i])))
    }

    #[inline]
    fn zip_with(self, other: Self, f: impl Fn(T, T) -> T) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], other.0[i])))
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> T {
        self.0
            .iter()
            .zip(other.0.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
    }

    #[inline]
    pub fn squared_magnitude(&self) -> T {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(&self) -> T {
        self.squared_magnitude().sqrt()
    }

    /// Unit vector with the same direction. A zero vector yields NaN components.
    #[inline]
    pub fn normalized(&self) -> Self {
        *self / self.magnitude()
    }

    #[inline]
    pub fn min(&self, other: &Self) -> Self {
        self.zip_with(*other, T::min)
    }

    #[inline]
    pub fn max(&self, other: &Self) -> Self {
        self.zip_with(*other, T::max)
    }

    #[inline]
    pub fn abs(&self) -> Self {
        self.map(T::abs)
    }

    #[inline]
    pub fn recip(&self) -> Self {
        self.map(T::recip)
    }

    #[inline]
    pub fn squared_distance(&self, point: &Self) -> T {
        (*self - *point).squared_magnitude()
    }

    #[inline]
    pub fn distance(&self, point: &Self) -> T {
        self.squared_distance(point).sqrt()
    }

    pub fn is_zero(&self, epsilon: T) -> bool {
        self.0.iter().all(|c| c.abs() <= epsilon)
    }

    pub fn is_normalized(&self) -> bool {
        let epsilon = T::from(1e-4).unwrap_or_else(T::epsilon);
        (self.squared_magnitude() - T::one()).abs() <= epsilon
    }
}

impl<T: Float> Vector<T, 3> {
    #[inline]
    pub fn x(&self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0[1]
    }

    #[inline]
    pub fn z(&self) -> T {
        self.0[2]
    }

    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.0;
        let [bx, by, bz] = other.0;
        vec3(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }
}

impl<T: Float> Vector<T, 2> {
    #[inline]
    pub fn x(&self) -> T {
        self.0[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0[1]
    }
}

impl<T: Float, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<T: Float, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Float, const N: usize> AddAssign for Vector<T, N> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Float, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Float, const N: usize> SubAssign for Vector<T, N> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Float, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        self.map(|c| -c)
    }
}

/// Componentwise product
impl<T: Float, const N: usize> Mul for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, |a, b| a * b)
    }
}

impl<T: Float, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        self.map(|c| c * rhs)
    }
}

impl<T: Float, const N: usize> MulAssign<T> for Vector<T, N> {
    #[inline]
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: Float, const N: usize> Div<T> for Vector<T, N> {
    type Output = Self;

    #[inline]
    fn div(self, rhs: T) -> Self::Output {
        self.map(|c| c / rhs)
    }
}

macro_rules! impl_scalar_lhs_mul {
    ($($scalar:ty),*) => {
        $(
            impl<const N: usize> Mul<Vector<$scalar, N>> for $scalar {
                type Output = Vector<$scalar, N>;

                #[inline]
                fn mul(self, rhs: Vector<$scalar, N>) -> Self::Output {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_lhs_mul!(f32, f64);

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(components: [T; N]) -> Self {
        Self(components)
    }
}

impl<T, const N: usize> From<Vector<T, N>> for [T; N] {
    #[inline]
    fn from(vector: Vector<T, N>) -> Self {
        vector.0
    }
}

impl From<glam::Vec3A> for Vec3f {
    #[inline]
    fn from(v: glam::Vec3A) -> Self {
        Self(v.to_array())
    }
}

impl From<Vec3f> for glam::Vec3A {
    #[inline]
    fn from(v: Vec3f) -> Self {
        glam::Vec3A::from_array(v.0)
    }
}

impl From<glam::Vec3> for Vec3f {
    #[inline]
    fn from(v: glam::Vec3) -> Self {
        Self(v.to_array())
    }
}

impl From<Vec3f> for glam::Vec3 {
    #[inline]
    fn from(v: Vec3f) -> Self {
        glam::Vec3::from_array(v.0)
    }
}

impl From<glam::DVec3> for Vec3d {
    #[inline]
    fn from(v: glam::DVec3) -> Self {
        Self(v.to_array())
    }
}

impl From<Vec3d> for glam::DVec3 {
    #[inline]
    fn from(v: Vec3d) -> Self {
        glam::DVec3::from_array(v.0)
    }
}

impl<T, const N: usize> AbsDiffEq for Vector<T, N>
where
    T: AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<T, const N: usize> RelativeEq for Vector<T, N>
where
    T: RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

impl<T, const N: usize> UlpsEq for Vector<T, N>
where
    T: UlpsEq,
    T::Epsilon: Copy,
{
    fn default_max_ulps() -> u32 {
        T::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Self, epsilon: Self::Epsilon, max_ulps: u32) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| a.ulps_eq(b, epsilon, max_ulps))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3A;

    use rand::{thread_rng, Rng};

    use approx::*;

    use crate::*;

    #[test]
    fn cross_matches_glam() {
        let mut rng = thread_rng();
        let a: Vec3A = rng.gen();
        let b: Vec3A = rng.gen();

        let cross = Vec3f::from(a).cross(&Vec3f::from(b));

        assert_relative_eq!(cross, Vec3f::from(a.cross(b)));
    }

    #[test]
    fn dot_and_magnitude() {
        let v = vec3(3.0_f32, 4.0, 12.0);

        assert_relative_eq!(v.dot(&v), 169.0);
        assert_relative_eq!(v.magnitude(), 13.0);
        assert!(v.normalized().is_normalized());
        assert!(!v.is_normalized());
    }

    #[test]
    fn normalize_zero_is_nan() {
        let v = Vec3f::zero().normalized();
        assert!(v.as_slice().iter().all(|c| c.is_nan()));
    }

    #[test]
    fn componentwise_ops() {
        let a = vec3(1.0_f64, -2.0, 3.0);
        let b = vec3(-4.0_f64, 5.0, 0.5);

        assert_eq!(a.min(&b), vec3(-4.0, -2.0, 0.5));
        assert_eq!(a.max(&b), vec3(1.0, 5.0, 3.0));
        assert_eq!(a.abs(), vec3(1.0, 2.0, 3.0));
        assert_eq!(a + b, vec3(-3.0, 3.0, 3.5));
        assert_eq!(a - b, vec3(5.0, -7.0, 2.5));
        assert_eq!(a * b, vec3(-4.0, -10.0, 1.5));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(-a, vec3(-1.0, 2.0, -3.0));
        assert_eq!(a / 2.0, vec3(0.5, -1.0, 1.5));
    }

    #[test]
    fn distance() {
        let a = vec2(0.0_f32, 0.0);
        let b = vec2(3.0_f32, 4.0);

        assert_relative_eq!(a.distance(&b), 5.0);
        assert_relative_eq!(a.squared_distance(&b), 25.0);
        assert!(a.is_zero(1e-5));
        assert!(!b.is_zero(1e-5));
    }

    #[test]
    fn glam_round_trip() {
        let v = vec3(1.0_f32, 2.0, 3.0);
        let g: Vec3A = v.into();

        assert_eq!(g, Vec3A::new(1.0, 2.0, 3.0));
        assert_eq!(Vec3f::from(glam::Vec3::from(v)), v);
    }
}
