//! Error types for BVH configuration and integrity checks.

use thiserror::Error;

/// Invalid build settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Leaves must hold at least one shape.
    #[error("max shapes per node must be at least 1")]
    ZeroMaxShapesPerNode,

    /// Leaf shape count does not fit the linear node record.
    #[error("max shapes per node is {requested}, the limit is {limit}")]
    MaxShapesPerNodeTooLarge {
        /// Requested value.
        requested: usize,
        /// Largest supported value.
        limit: usize,
    },

    /// Build method name not recognized.
    #[error("unknown build method `{0}` (expected middle, equal_count or sah)")]
    UnknownBuildMethod(String),
}

/// Structural problems found by [`crate::BVH::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BvhError {
    /// A shape slot is referenced by more than one leaf.
    #[error("shape slot {shape} is covered by more than one leaf (second time at node {node})")]
    ShapeCoveredTwice {
        /// Slot in the ordered shape list.
        shape: usize,
        /// Node that covered it again.
        node: usize,
    },

    /// A shape slot is not referenced by any leaf.
    #[error("shape slot {0} is not covered by any leaf")]
    ShapeMissing(usize),

    /// A leaf range runs past the ordered shape list.
    #[error("leaf {node} covers shapes {first}..{end} but only {len} exist")]
    LeafOutOfRange {
        /// Offending node.
        node: usize,
        /// First shape slot.
        first: usize,
        /// One past the last shape slot.
        end: usize,
        /// Number of shapes.
        len: usize,
    },

    /// An interior node points outside the node array or backwards.
    #[error("interior node {node} has invalid child offset {child}")]
    ChildOffsetOutOfRange {
        /// Offending node.
        node: usize,
        /// Child offset.
        child: usize,
    },

    /// A child box pokes out of its parent box.
    #[error("bounds of node {child} are not contained in parent {node}")]
    ChildBoundsNotContained {
        /// Parent node.
        node: usize,
        /// Child node.
        child: usize,
    },
}
