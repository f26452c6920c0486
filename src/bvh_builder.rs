use log::trace;
use smallvec::{smallvec, SmallVec};

use crate::{
    bvh_strategy::{Split, SplitContext},
    Axis, BvhConfig, Vec3f, AABB3f,
};

/// Build time record of one input shape
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShapeInfo {
    /// Index into the caller's shape list
    pub shape_index: usize,
    pub centroid: Vec3f,
    pub aabb: AABB3f,
}

impl ShapeInfo {
    #[inline]
    pub fn new(shape_index: usize, aabb: AABB3f) -> Self {
        Self {
            shape_index,
            centroid: aabb.centroid(),
            aabb,
        }
    }
}

/// Node of the transient build tree. Children are indices into [`BuildTree::nodes`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum BuildNode {
    Leaf {
        first_shape_offset: usize,
        shape_count: usize,
        aabb: AABB3f,
    },
    Interior {
        split_axis: Axis,
        children: [usize; 2],
        aabb: AABB3f,
    },
}

impl BuildNode {
    #[inline]
    pub fn aabb(&self) -> AABB3f {
        match self {
            BuildNode::Leaf { aabb, .. } | BuildNode::Interior { aabb, .. } => *aabb,
        }
    }
}

/// Arena holding the build tree, root at index 0
#[derive(Debug, Clone, Default)]
pub(crate) struct BuildTree {
    pub nodes: Vec<BuildNode>,
    /// Caller shape indices in leaf order. Every leaf covers a contiguous run.
    pub ordered_shapes: Vec<usize>,
    /// Depth of the deepest node, the root being 0
    pub depth: usize,
}

/// Pending range of `ShapeInfo`s waiting to become a node
#[derive(Debug, Clone, Copy)]
struct BuildTask {
    start: usize,
    end: usize,
    depth: usize,
    /// Interior node and child slot to link once the node exists
    parent: Option<(usize, usize)>,
}

/// Max stack size kept inline for build tasks before spilling to the heap
const BUILD_STACK_SIZE: usize = 64;

impl BuildTree {
    /// Builds the tree over `infos`, which is reordered in the process. `infos` must not be empty.
    pub fn build(infos: &mut [ShapeInfo], config: &BvhConfig) -> Self {
        let mut tree = BuildTree {
            nodes: Vec::with_capacity(2 * infos.len()),
            ordered_shapes: Vec::with_capacity(infos.len()),
            depth: 0,
        };

        let mut stack: SmallVec<[BuildTask; BUILD_STACK_SIZE]> = smallvec![BuildTask {
            start: 0,
            end: infos.len(),
            depth: 0,
            parent: None,
        }];

        while let Some(task) = stack.pop() {
            let node_id = tree.nodes.len();
            if let Some((parent, slot)) = task.parent {
                if let BuildNode::Interior { children, .. } = &mut tree.nodes[parent] {
                    children[slot] = node_id;
                }
            }
            tree.depth = tree.depth.max(task.depth);

            let range = &mut infos[task.start..task.end];
            match Self::split_range(range, config) {
                (Split::Leaf, aabb, _) => {
                    tree.nodes.push(BuildNode::Leaf {
                        first_shape_offset: tree.ordered_shapes.len(),
                        shape_count: range.len(),
                        aabb,
                    });
                    tree.ordered_shapes
                        .extend(range.iter().map(|info| info.shape_index));
                }
                (Split::At(mid), aabb, split_axis) => {
                    tree.nodes.push(BuildNode::Interior {
                        split_axis,
                        children: [node_id, node_id],
                        aabb,
                    });

                    // left is popped first so leaves are appended in depth first order
                    stack.push(BuildTask {
                        start: task.start + mid,
                        end: task.end,
                        depth: task.depth + 1,
                        parent: Some((node_id, 1)),
                    });
                    stack.push(BuildTask {
                        start: task.start,
                        end: task.start + mid,
                        depth: task.depth + 1,
                        parent: Some((node_id, 0)),
                    });
                }
            }
        }

        tree
    }

    /// Decide what a range becomes, returning the decision, the range bounds and the split axis
    fn split_range(range: &mut [ShapeInfo], config: &BvhConfig) -> (Split, AABB3f, Axis) {
        let bounds = range
            .iter()
            .fold(AABB3f::default(), |bounds, info| bounds.union(&info.aabb));

        let count = range.len();
        if count == 1 {
            return (Split::Leaf, bounds, Axis::X);
        }

        let centroid_bounds = range
            .iter()
            .fold(AABB3f::default(), |bounds, info| bounds.union_point(&info.centroid));
        let axis = centroid_bounds.maximum_extent_axis();

        if centroid_bounds.max()[axis] == centroid_bounds.min()[axis] {
            // every centroid coincides, no heuristic can separate them
            return if count <= config.max_shapes_per_node() {
                trace!("{} shapes with coincident centroids kept in one leaf", count);
                (Split::Leaf, bounds, axis)
            } else {
                trace!("{} shapes with coincident centroids split by index", count);
                (Split::At(count / 2), bounds, axis)
            };
        }

        let ctx = SplitContext {
            bounds,
            centroid_bounds,
            axis,
            max_shapes_per_node: config.max_shapes_per_node(),
        };

        (config.method().split(range, &ctx), bounds, axis)
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, BuildNode::Leaf { .. }))
            .count()
    }
}
