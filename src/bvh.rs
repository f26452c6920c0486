use bitvec::prelude::*;
use log::debug;
use smallvec::{smallvec, SmallVec};

use crate::{
    bvh_builder::{BuildTree, ShapeInfo},
    bvh_flatten::{flatten, LinearNode, LinearNodeKind},
    BuildMethod, BvhConfig, BvhError, ConfigError, HitInfo, Ray3f, Shape, Vec3f, AABB3f,
};

/// Bounding volume hierarchy over borrowed shapes.
///
/// Built once, immutable afterwards. Queries only take `&self`, so a `BVH` over
/// `Sync` shapes can be shared by any number of threads.
#[derive(Debug, Clone)]
pub struct BVH<'s, S: ?Sized> {
    /// Shapes reordered so that every leaf covers a contiguous run
    shapes: Vec<&'s S>,
    /// Depth first layout, root at 0
    nodes: Vec<LinearNode>,
    config: BvhConfig,
    depth: usize,
}

/// BVH over heterogeneous shapes
pub type DynBVH<'s> = BVH<'s, dyn Shape + Send + Sync + 's>;

/// Max stack size kept inline for traversal before spilling to the heap
const TRAVERSAL_STACK_SIZE: usize = 64;

impl<'s, S> BVH<'s, S>
where
    S: Shape + ?Sized,
{
    /// Build over `shapes`. An empty list gives an empty BVH that never reports a hit.
    pub fn build<I>(shapes: I, config: BvhConfig) -> Self
    where
        I: IntoIterator<Item = &'s S>,
    {
        let shapes: Vec<&'s S> = shapes.into_iter().collect();

        if shapes.is_empty() {
            debug!("built empty bvh ({})", config.method());
            return Self {
                shapes,
                nodes: Vec::new(),
                config,
                depth: 0,
            };
        }

        let mut infos: Vec<ShapeInfo> = shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| ShapeInfo::new(i, shape.aabb()))
            .collect();

        let tree = BuildTree::build(&mut infos, &config);
        let nodes = flatten(&tree);
        let ordered: Vec<&'s S> = tree.ordered_shapes.iter().map(|&i| shapes[i]).collect();

        let bvh = Self {
            shapes: ordered,
            nodes,
            config,
            depth: tree.depth,
        };

        debug!(
            "built bvh ({}, max {} per leaf): {} shapes, {} nodes, {} leaves, depth {}",
            config.method(),
            config.max_shapes_per_node(),
            bvh.shapes.len(),
            bvh.nodes.len(),
            bvh.leaf_count(),
            bvh.depth
        );

        bvh
    }

    /// Validates the settings, then builds
    pub fn build_with<I>(
        shapes: I,
        max_shapes_per_node: usize,
        method: BuildMethod,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'s S>,
    {
        let config = BvhConfig::new(max_shapes_per_node, method)?;
        Ok(Self::build(shapes, config))
    }

    /// Closest hit inside `t_min..t_max`, ends included as the shapes decide
    pub fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo> {
        self.traverse(ray, t_min, t_max, false, |shape, closest| {
            shape
                .intersect(ray, t_min, closest)
                .map(|hit| (hit.t, hit))
        })
    }

    /// Distance to the closest hit inside `t_min..t_max`
    pub fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
        self.traverse(ray, t_min, t_max, false, |shape, closest| {
            shape.intersect_fast(ray, t_min, closest).map(|t| (t, t))
        })
    }

    /// If anything is hit inside `t_min..t_max`. Stops at the first hit found.
    pub fn occluded(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> bool {
        self.traverse(ray, t_min, t_max, true, |shape, closest| {
            shape.intersect_fast(ray, t_min, closest).map(|t| (t, ()))
        })
        .is_some()
    }

    /// Stack based walk over the linear nodes.
    ///
    /// `test` returns the distance and payload of a hit closer than its second argument.
    /// Every accepted hit narrows the search range, so boxes behind it fail the slab test.
    fn traverse<H, F>(&self, ray: &Ray3f, t_min: f32, t_max: f32, any_hit: bool, mut test: F) -> Option<H>
    where
        F: FnMut(&S, f32) -> Option<(f32, H)>,
    {
        if self.nodes.is_empty() {
            return None;
        }

        let direction = ray.direction();

        let mut closest = t_max;
        let mut best = None;

        let mut stack: SmallVec<[usize; TRAVERSAL_STACK_SIZE]> = smallvec![0];

        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            if !node.aabb().intersect(ray, t_min, closest) {
                continue;
            }

            match node.kind() {
                LinearNodeKind::Leaf {
                    first_shape_offset,
                    shape_count,
                } => {
                    let first = first_shape_offset as usize;
                    for &shape in &self.shapes[first..first + shape_count as usize] {
                        // NaN distances fail the comparison and are dropped
                        if let Some((t, hit)) = test(shape, closest).filter(|(t, _)| *t <= closest) {
                            closest = t;
                            best = Some(hit);
                            if any_hit {
                                return best;
                            }
                        }
                    }
                }
                LinearNodeKind::Interior {
                    second_child_offset,
                    axis,
                } => {
                    let first = node_id + 1;
                    let second = second_child_offset as usize;

                    // visit the child on the near side of the split first
                    if direction[axis] < 0.0 {
                        stack.push(first);
                        stack.push(second);
                    } else {
                        stack.push(second);
                        stack.push(first);
                    }
                }
            }
        }

        best
    }

    /// Checks that leaves cover every shape exactly once, offsets stay in range and
    /// child boxes sit inside their parents.
    pub fn validate(&self) -> Result<(), BvhError> {
        let mut covered = bitvec![0; self.shapes.len()];

        for (node_id, node) in self.nodes.iter().enumerate() {
            match node.kind() {
                LinearNodeKind::Leaf { .. } => {
                    let range = node.shape_range().unwrap_or_default();
                    if range.end > self.shapes.len() {
                        return Err(BvhError::LeafOutOfRange {
                            node: node_id,
                            first: range.start,
                            end: range.end,
                            len: self.shapes.len(),
                        });
                    }

                    for shape in range {
                        if covered.replace(shape, true) {
                            return Err(BvhError::ShapeCoveredTwice {
                                shape,
                                node: node_id,
                            });
                        }
                    }
                }
                LinearNodeKind::Interior {
                    second_child_offset,
                    ..
                } => {
                    for child in [node_id + 1, second_child_offset as usize] {
                        if child >= self.nodes.len() || child <= node_id {
                            return Err(BvhError::ChildOffsetOutOfRange {
                                node: node_id,
                                child,
                            });
                        }
                        if !node.aabb().contains(self.nodes[child].aabb()) {
                            return Err(BvhError::ChildBoundsNotContained {
                                node: node_id,
                                child,
                            });
                        }
                    }
                }
            }
        }

        match covered.first_zero() {
            Some(shape) => Err(BvhError::ShapeMissing(shape)),
            None => Ok(()),
        }
    }
}

impl<'s, S: ?Sized> BVH<'s, S> {
    /// Bounds of everything in the BVH. An empty BVH reports a zero box at the origin.
    #[inline]
    pub fn bounds(&self) -> AABB3f {
        self.nodes
            .first()
            .map(|root| *root.aabb())
            .unwrap_or_else(|| AABB3f::new(Vec3f::zero(), Vec3f::zero()))
    }

    #[inline]
    pub fn nodes(&self) -> &[LinearNode] {
        &self.nodes
    }

    /// Shapes in leaf order
    #[inline]
    pub fn shapes(&self) -> &[&'s S] {
        &self.shapes
    }

    #[inline]
    pub fn config(&self) -> &BvhConfig {
        &self.config
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    #[inline]
    pub fn interior_count(&self) -> usize {
        self.node_count() - self.leaf_count()
    }

    /// Depth of the deepest node, the root being 0
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// A BVH is itself a shape, so hierarchies can be nested
impl<'s, S> Shape for BVH<'s, S>
where
    S: Shape + ?Sized,
{
    #[inline]
    fn aabb(&self) -> AABB3f {
        self.bounds()
    }

    #[inline]
    fn intersect(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<HitInfo> {
        BVH::intersect(self, ray, t_min, t_max)
    }

    #[inline]
    fn intersect_fast(&self, ray: &Ray3f, t_min: f32, t_max: f32) -> Option<f32> {
        BVH::intersect_fast(self, ray, t_min, t_max)
    }
}
