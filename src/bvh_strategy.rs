use log::trace;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{bvh_builder::ShapeInfo, Axis, ConfigError, AABB3f};

/// Partitioning heuristic used while building a BVH
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumString, Display, IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum BuildMethod {
    /// Split at the midpoint of the centroid bounds
    #[strum(serialize = "middle")]
    Middle,
    /// Split into two halves with the same shape count
    #[strum(serialize = "equal_count")]
    EqualCount,
    /// Binned surface area heuristic
    #[default]
    #[strum(serialize = "sah")]
    SAH,
}

impl BuildMethod {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        name.parse::<Self>()
            .map_err(|_| ConfigError::UnknownBuildMethod(name.to_owned()))
    }

    #[inline]
    pub(crate) fn split(self, infos: &mut [ShapeInfo], ctx: &SplitContext) -> Split {
        match self {
            BuildMethod::Middle => MiddleStrategy::split(infos, ctx),
            BuildMethod::EqualCount => EqualCountStrategy::split(infos, ctx),
            BuildMethod::SAH => SAHStrategy::split(infos, ctx),
        }
    }
}

/// What a strategy sees of the range it is splitting
#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitContext {
    /// Union of the shape bounds
    pub bounds: AABB3f,
    /// Bounds of the shape centroids, never flat along `axis`
    pub centroid_bounds: AABB3f,
    pub axis: Axis,
    pub max_shapes_per_node: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Split {
    /// Keep the whole range in one leaf
    Leaf,
    /// `infos[..n]` goes left, `infos[n..]` goes right. Both sides are non empty.
    At(usize),
}

pub(crate) trait SplitStrategy {
    /// Reorder `infos` and report where to split it. `infos` holds at least two shapes.
    fn split(infos: &mut [ShapeInfo], ctx: &SplitContext) -> Split;
}

/// Move every shape matching `goes_left` to the front, returning how many there are
pub(crate) fn partition<F>(infos: &mut [ShapeInfo], mut goes_left: F) -> usize
where
    F: FnMut(&ShapeInfo) -> bool,
{
    let mut i = 0;
    let mut j = infos.len();
    while i < j {
        if goes_left(&infos[i]) {
            i += 1;
        } else {
            j -= 1;
            infos.swap(i, j);
        }
    }
    i
}

pub(crate) struct MiddleStrategy {}
impl SplitStrategy for MiddleStrategy {
    fn split(infos: &mut [ShapeInfo], ctx: &SplitContext) -> Split {
        let axis = ctx.axis;
        let mid = (ctx.centroid_bounds.min()[axis] + ctx.centroid_bounds.max()[axis]) * 0.5;

        let split = partition(infos, |info| info.centroid[axis] < mid);
        if split == 0 || split == infos.len() {
            return EqualCountStrategy::split(infos, ctx);
        }

        Split::At(split)
    }
}

pub(crate) struct EqualCountStrategy {}
impl SplitStrategy for EqualCountStrategy {
    fn split(infos: &mut [ShapeInfo], ctx: &SplitContext) -> Split {
        let axis = ctx.axis;
        let mid = infos.len() / 2;

        infos.select_nth_unstable_by(mid, |a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));

        Split::At(mid)
    }
}

pub(crate) const SAH_BUCKET_COUNT: usize = 12;
pub(crate) const SAH_TRAVERSAL_COST: f32 = 0.125;
/// Ranges up to this size skip the heuristic and use equal counts
pub(crate) const SAH_MIN_SHAPES: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    pub count: usize,
    pub bounds: AABB3f,
}

pub(crate) struct SAHStrategy {}
impl SplitStrategy for SAHStrategy {
    fn split(infos: &mut [ShapeInfo], ctx: &SplitContext) -> Split {
        let count = infos.len();
        if count <= SAH_MIN_SHAPES {
            return EqualCountStrategy::split(infos, ctx);
        }

        let axis = ctx.axis;
        let bounds_min = ctx.centroid_bounds.min()[axis];
        let extent = ctx.centroid_bounds.max()[axis] - bounds_min;

        let bucket_of = |info: &ShapeInfo| {
            let bucket = (SAH_BUCKET_COUNT as f32 * ((info.centroid[axis] - bounds_min) / extent)) as usize;
            bucket.min(SAH_BUCKET_COUNT - 1)
        };

        let mut buckets = [Bucket::default(); SAH_BUCKET_COUNT];
        for info in infos.iter() {
            let bucket = &mut buckets[bucket_of(info)];
            bucket.count += 1;
            bucket.bounds = bucket.bounds.union(&info.aabb);
        }

        let buckets = buckets;

        let mut left_area = [0.0_f32; SAH_BUCKET_COUNT - 1];
        let mut right_area = [0.0_f32; SAH_BUCKET_COUNT - 1];
        let mut left_count = [0_usize; SAH_BUCKET_COUNT - 1];
        let mut right_count = [0_usize; SAH_BUCKET_COUNT - 1];

        let mut left_box = AABB3f::default();
        let mut right_box = AABB3f::default();

        let mut left_sum = 0;
        let mut right_sum = 0;

        for i in 0..(SAH_BUCKET_COUNT - 1) {
            left_sum += buckets[i].count;
            left_count[i] = left_sum;
            left_box = left_box.union(&buckets[i].bounds);
            left_area[i] = left_box.surface_area();

            right_sum += buckets[SAH_BUCKET_COUNT - 1 - i].count;
            right_count[SAH_BUCKET_COUNT - 2 - i] = right_sum;
            right_box = right_box.union(&buckets[SAH_BUCKET_COUNT - 1 - i].bounds);
            right_area[SAH_BUCKET_COUNT - 2 - i] = right_box.surface_area();
        }

        let parent_area = ctx.bounds.surface_area();
        if !(parent_area > 0.0) {
            // collinear point-like shapes: every cost would be 0 / 0
            trace!("sah falls back to equal count for {} shapes with zero area bounds", count);
            return EqualCountStrategy::split(infos, ctx);
        }

        let mut best_bucket = 0;
        let mut best_cost = f32::INFINITY;
        for i in 0..(SAH_BUCKET_COUNT - 1) {
            let cost = SAH_TRAVERSAL_COST
                + (left_count[i] as f32 * left_area[i] + right_count[i] as f32 * right_area[i])
                    / parent_area;
            if cost < best_cost {
                best_bucket = i;
                best_cost = cost;
            }
        }

        if count <= ctx.max_shapes_per_node && best_cost >= count as f32 {
            trace!(
                "sah keeps {} shapes in one leaf (best cost {} at bucket {})",
                count,
                best_cost,
                best_bucket
            );
            return Split::Leaf;
        }

        let split = partition(infos, |info| bucket_of(info) <= best_bucket);
        if split == 0 || split == count {
            return EqualCountStrategy::split(infos, ctx);
        }

        Split::At(split)
    }
}
