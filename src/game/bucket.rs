//! Spatial Bucket Index
//!
//! Uniform grid hash from bucket coordinates to the entities whose
//! bounding rectangles overlap that bucket. Rebuilt from empty every
//! frame, so there is no removal path.
//!
//! Overlap ranges are enumerated densely: a rectangle covering `w x h`
//! buckets touches all `w * h` of them. That is cheap for entities about
//! the size of a bucket and gets expensive for very large rectangles.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Serialize, Deserialize};

use crate::core::vec2::{Rect, Vec2};

/// Index of an entity in the world's entity list. Valid for one frame.
pub type EntityId = usize;

/// Integer grid coordinate of one bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct BucketId {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl BucketId {
    /// Create from grid coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Grid hash of entity ids keyed by bucket.
///
/// Uses BTreeMap so iteration (and therefore anything derived from it)
/// is ordered the same way on every run.
#[derive(Clone, Debug)]
pub struct BucketIndex {
    bucket_size: f32,
    buckets: BTreeMap<BucketId, Vec<EntityId>>,
}

impl BucketIndex {
    /// Create an empty index. `bucket_size` must be positive.
    pub fn new(bucket_size: f32) -> Self {
        debug_assert!(bucket_size > 0.0, "bucket size must be positive");
        Self {
            bucket_size,
            buckets: BTreeMap::new(),
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Bucket containing a world position (component-wise floor division).
    #[inline]
    pub fn bucket_id(&self, position: Vec2) -> BucketId {
        let cell = (position / self.bucket_size).floor();
        BucketId::new(cell.x as i32, cell.y as i32)
    }

    /// All buckets a rectangle overlaps, from the bucket of its top-left
    /// corner to the bucket of its bottom-right corner, both inclusive.
    pub fn buckets_overlapping(&self, rect: &Rect) -> BTreeSet<BucketId> {
        let top_left = self.bucket_id(rect.top_left());
        let bottom_right = self.bucket_id(rect.bottom_right());

        let mut ids = BTreeSet::new();
        for y in top_left.y..=bottom_right.y {
            for x in top_left.x..=bottom_right.x {
                ids.insert(BucketId::new(x, y));
            }
        }
        ids
    }

    /// Append `entity` to every bucket `rect` overlaps.
    pub fn insert(&mut self, entity: EntityId, rect: &Rect) {
        for bucket in self.buckets_overlapping(rect) {
            self.buckets.entry(bucket).or_default().push(entity);
        }
    }

    /// Entities recorded in one bucket, in insertion order.
    pub fn entities_in(&self, bucket: BucketId) -> &[EntityId] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids of every entity sharing at least one bucket with `rect`.
    ///
    /// Broad phase only: the result is sorted and free of duplicates, and
    /// may include entities whose rectangles do not actually touch `rect`.
    pub fn query(&self, rect: &Rect) -> Vec<EntityId> {
        let mut out = Vec::new();
        for bucket in self.buckets_overlapping(rect) {
            out.extend_from_slice(self.entities_in(bucket));
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Number of non-empty buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when nothing has been inserted since the last clear.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
