use std::ops::{Index, IndexMut};

use strum::{Display, EnumIter, IntoEnumIterator};

use crate::Vector;

/// 3D Axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Axis> {
        Axis::iter().nth(index)
    }
}

impl<T> Index<Axis> for Vector<T, 3> {
    type Output = T;

    #[inline]
    fn index(&self, axis: Axis) -> &Self::Output {
        &self.0[axis.index()]
    }
}

impl<T> IndexMut<Axis> for Vector<T, 3> {
    #[inline]
    fn index_mut(&mut self, axis: Axis) -> &mut Self::Output {
        &mut self.0[axis.index()]
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use crate::*;

    #[test]
    fn index_by_axis() {
        let mut v = vec3(1.0_f32, 2.0, 3.0);
        for axis in Axis::iter() {
            assert_eq!(v[axis], v[axis.index()]);
        }

        v[Axis::Y] = 7.0;
        assert_eq!(v.y(), 7.0);
    }

    #[test]
    fn from_index() {
        assert_eq!(Axis::from_index(0), Some(Axis::X));
        assert_eq!(Axis::from_index(2), Some(Axis::Z));
        assert_eq!(Axis::from_index(3), None);
        assert_eq!(Axis::Z.to_string(), "Z");
    }
}
