use std::ops::Range;

use smallvec::{smallvec, SmallVec};

use crate::{
    bvh_builder::{BuildNode, BuildTree},
    Axis, AABB3f,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearNodeKind {
    Leaf {
        first_shape_offset: u32,
        shape_count: u8,
    },
    /// The first child always sits right after its parent
    Interior {
        second_child_offset: u32,
        axis: Axis,
    },
}

/// Node of the flattened BVH. Two nodes share a 64 byte cache line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(align(32))]
pub struct LinearNode {
    aabb: AABB3f,
    kind: LinearNodeKind,
}

impl LinearNode {
    #[inline]
    pub fn aabb(&self) -> &AABB3f {
        &self.aabb
    }

    #[inline]
    pub fn kind(&self) -> LinearNodeKind {
        self.kind
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, LinearNodeKind::Leaf { .. })
    }

    /// Shapes in a leaf, zero for interior nodes
    #[inline]
    pub fn shape_count(&self) -> usize {
        match self.kind {
            LinearNodeKind::Leaf { shape_count, .. } => shape_count as usize,
            LinearNodeKind::Interior { .. } => 0,
        }
    }

    /// Range of the leaf in the ordered shape list
    #[inline]
    pub fn shape_range(&self) -> Option<Range<usize>> {
        match self.kind {
            LinearNodeKind::Leaf {
                first_shape_offset,
                shape_count,
            } => {
                let first = first_shape_offset as usize;
                Some(first..first + shape_count as usize)
            }
            LinearNodeKind::Interior { .. } => None,
        }
    }

    #[inline]
    pub fn second_child_offset(&self) -> Option<usize> {
        match self.kind {
            LinearNodeKind::Interior {
                second_child_offset,
                ..
            } => Some(second_child_offset as usize),
            LinearNodeKind::Leaf { .. } => None,
        }
    }

    #[inline]
    pub fn axis(&self) -> Option<Axis> {
        match self.kind {
            LinearNodeKind::Interior { axis, .. } => Some(axis),
            LinearNodeKind::Leaf { .. } => None,
        }
    }
}

/// Max stack size kept inline for flattening before spilling to the heap
const FLATTEN_STACK_SIZE: usize = 64;

/// Lay the build tree out in depth first pre-order.
///
/// Each node is written at the next free slot, its first child right behind it, and
/// its second child after the whole first subtree, at `second_child_offset`.
pub(crate) fn flatten(tree: &BuildTree) -> Vec<LinearNode> {
    let mut nodes = Vec::with_capacity(tree.nodes.len());
    if tree.nodes.is_empty() {
        return nodes;
    }

    // (build node, linear node waiting for its second child offset)
    let mut stack: SmallVec<[(usize, Option<usize>); FLATTEN_STACK_SIZE]> = smallvec![(0, None)];

    while let Some((build_id, parent)) = stack.pop() {
        let offset = nodes.len();
        if let Some(parent) = parent {
            let parent_node: &mut LinearNode = &mut nodes[parent];
            if let LinearNodeKind::Interior {
                second_child_offset,
                ..
            } = &mut parent_node.kind
            {
                *second_child_offset = offset as u32;
            }
        }

        match tree.nodes[build_id] {
            BuildNode::Leaf {
                first_shape_offset,
                shape_count,
                aabb,
            } => nodes.push(LinearNode {
                aabb,
                kind: LinearNodeKind::Leaf {
                    first_shape_offset: first_shape_offset as u32,
                    shape_count: shape_count as u8,
                },
            }),
            BuildNode::Interior {
                split_axis,
                children: [first, second],
                aabb,
            } => {
                nodes.push(LinearNode {
                    aabb,
                    kind: LinearNodeKind::Interior {
                        second_child_offset: 0,
                        axis: split_axis,
                    },
                });
                stack.push((second, Some(offset)));
                stack.push((first, None));
            }
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use std::mem::{align_of, size_of};

    use rand::{thread_rng, Rng};

    use super::*;
    use crate::{bvh_builder::ShapeInfo, *};

    fn unit_box(x: f32) -> AABB3f {
        AABB::new(vec3(x, 0.0, 0.0), vec3(x + 1.0, 1.0, 1.0))
    }

    #[test]
    fn node_fits_half_a_cache_line() {
        assert_eq!(size_of::<LinearNode>(), 32);
        assert_eq!(align_of::<LinearNode>(), 32);
    }

    #[test]
    fn flatten_hand_built_tree() {
        let left = unit_box(0.0);
        let right = unit_box(5.0);
        let tree = BuildTree {
            nodes: vec![
                BuildNode::Interior {
                    split_axis: Axis::X,
                    children: [2, 1],
                    aabb: left.union(&right),
                },
                BuildNode::Leaf {
                    first_shape_offset: 1,
                    shape_count: 1,
                    aabb: right,
                },
                BuildNode::Leaf {
                    first_shape_offset: 0,
                    shape_count: 1,
                    aabb: left,
                },
            ],
            ordered_shapes: vec![0, 1],
            depth: 1,
        };

        let nodes = flatten(&tree);

        assert_eq!(nodes.len(), 3);
        assert_eq!(*nodes[0].aabb(), left.union(&right));
        assert_eq!(nodes[0].axis(), Some(Axis::X));
        assert_eq!(nodes[0].shape_count(), 0);
        assert_eq!(nodes[0].second_child_offset(), Some(2));

        // first child of the build tree lands right after the root
        assert_eq!(*nodes[1].aabb(), left);
        assert_eq!(nodes[1].shape_range(), Some(0..1));
        assert_eq!(*nodes[2].aabb(), right);
        assert_eq!(nodes[2].shape_range(), Some(1..2));
    }

    /// Compare a linear subtree with the build subtree it came from
    fn assert_same_subtree(tree: &BuildTree, build_id: usize, nodes: &[LinearNode], linear_id: usize) -> usize {
        let node = &nodes[linear_id];
        assert_eq!(*node.aabb(), tree.nodes[build_id].aabb());

        match tree.nodes[build_id] {
            BuildNode::Leaf {
                first_shape_offset,
                shape_count,
                ..
            } => {
                assert_eq!(
                    node.shape_range(),
                    Some(first_shape_offset..first_shape_offset + shape_count)
                );
                linear_id + 1
            }
            BuildNode::Interior {
                split_axis,
                children: [first, second],
                ..
            } => {
                assert_eq!(node.axis(), Some(split_axis));
                let second_offset = assert_same_subtree(tree, first, nodes, linear_id + 1);
                assert_eq!(node.second_child_offset(), Some(second_offset));
                assert_same_subtree(tree, second, nodes, second_offset)
            }
        }
    }

    #[test]
    fn flatten_preserves_built_tree() {
        let mut rng = thread_rng();
        let spheres: Vec<Sphere> = (0..300).map(|_| rng.gen()).collect();
        let mut infos: Vec<ShapeInfo> = spheres
            .iter()
            .enumerate()
            .map(|(i, sphere)| ShapeInfo::new(i, sphere.aabb()))
            .collect();

        let tree = BuildTree::build(&mut infos, &BvhConfig::default());
        let nodes = flatten(&tree);

        assert_eq!(nodes.len(), tree.nodes.len());
        assert_eq!(assert_same_subtree(&tree, 0, &nodes, 0), nodes.len());
    }

    #[test]
    fn flatten_empty_tree() {
        assert!(flatten(&BuildTree::default()).is_empty());
    }
}
