use crate::{BuildMethod, ConfigError};

/// Largest leaf size; the linear node keeps the shape count in a byte.
pub const MAX_SHAPES_PER_NODE: usize = u8::MAX as usize;

/// Build settings for [`crate::BVH`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BvhConfig {
    max_shapes_per_node: usize,
    method: BuildMethod,
}

impl Default for BvhConfig {
    fn default() -> Self {
        Self {
            max_shapes_per_node: 4,
            method: BuildMethod::SAH,
        }
    }
}

impl BvhConfig {
    pub fn new(max_shapes_per_node: usize, method: BuildMethod) -> Result<Self, ConfigError> {
        if max_shapes_per_node == 0 {
            return Err(ConfigError::ZeroMaxShapesPerNode);
        }
        if max_shapes_per_node > MAX_SHAPES_PER_NODE {
            return Err(ConfigError::MaxShapesPerNodeTooLarge {
                requested: max_shapes_per_node,
                limit: MAX_SHAPES_PER_NODE,
            });
        }

        Ok(Self {
            max_shapes_per_node,
            method,
        })
    }

    /// Same as [`BvhConfig::new`] with the method given by name (`middle`, `equal_count`, `sah`)
    pub fn from_names(max_shapes_per_node: usize, method: &str) -> Result<Self, ConfigError> {
        Self::new(max_shapes_per_node, BuildMethod::parse(method)?)
    }

    #[inline]
    pub fn max_shapes_per_node(&self) -> usize {
        self.max_shapes_per_node
    }

    #[inline]
    pub fn method(&self) -> BuildMethod {
        self.method
    }
}
