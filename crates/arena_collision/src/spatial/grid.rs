//! Uniform grid spatial index over the XZ plane
//!
//! The world is mostly static and wide (tens of thousands of units) but flat,
//! so a sparse hash of square cells on the ground plane beats a tree: a
//! collider is appended to every cell its footprint covers and a query
//! unions the buckets of the cells it touches. Height is ignored here and
//! left to the narrow phase.
//!
//! Each collider remembers the cell range it was inserted into, so removal
//! touches only those cells instead of rebuilding the whole index.

use std::collections::{HashMap, HashSet};

use crate::config::GridConfig;
use crate::foundation::collections::ColliderHandle;
use crate::foundation::math::AABB;
use crate::spatial::spatial_query::SpatialQuery;

/// Integer cell coordinate `(floor(x / cell_size), floor(z / cell_size))`
pub type CellKey = (i32, i32);

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    /// First cell column
    pub min_x: i32,
    /// Last cell column
    pub max_x: i32,
    /// First cell row
    pub min_z: i32,
    /// Last cell row
    pub max_z: i32,
}

impl CellRange {
    /// Number of cells covered (0 when inverted)
    pub fn cell_count(&self) -> u64 {
        if self.min_x > self.max_x || self.min_z > self.max_z {
            return 0;
        }
        let width = u64::from(self.max_x.abs_diff(self.min_x)) + 1;
        let depth = u64::from(self.max_z.abs_diff(self.min_z)) + 1;
        width.saturating_mul(depth)
    }

    /// Check if a cell lies inside the range
    pub fn contains(&self, key: CellKey) -> bool {
        key.0 >= self.min_x && key.0 <= self.max_x && key.1 >= self.min_z && key.1 <= self.max_z
    }

    /// Iterate every covered cell key
    pub fn keys(&self) -> impl Iterator<Item = CellKey> {
        let (min_z, max_z) = (self.min_z, self.max_z);
        (self.min_x..=self.max_x).flat_map(move |x| (min_z..=max_z).map(move |z| (x, z)))
    }
}

/// Uniform spatial grid holding collider handles
#[derive(Debug, Clone)]
pub struct WorldIndex {
    cell_size: f32,

    /// Sparse buckets; empty buckets are dropped
    cells: HashMap<CellKey, Vec<ColliderHandle>>,

    /// Reverse map used for O(covered cells) removal
    covered: HashMap<ColliderHandle, CellRange>,
}

impl Default for WorldIndex {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl WorldIndex {
    /// Create an empty index
    ///
    /// A non-positive or non-finite cell size falls back to the default.
    pub fn new(config: GridConfig) -> Self {
        let cell_size = if config.cell_size.is_finite() && config.cell_size > 0.0 {
            config.cell_size
        } else {
            log::warn!(
                "WorldIndex: invalid cell size {}, using default",
                config.cell_size
            );
            GridConfig::default().cell_size
        };

        Self {
            cell_size,
            cells: HashMap::new(),
            covered: HashMap::new(),
        }
    }

    /// Edge length of one cell
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of non-empty cells
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Cell range recorded for a collider
    pub fn cells_of(&self, handle: ColliderHandle) -> Option<CellRange> {
        self.covered.get(&handle).copied()
    }

    /// Cell range covered by an XZ rectangle, `None` for non-finite bounds
    pub fn cell_range(&self, min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Option<CellRange> {
        if !(min_x.is_finite() && max_x.is_finite() && min_z.is_finite() && max_z.is_finite()) {
            return None;
        }
        // `as` saturates, so far-out coordinates clamp to the edge of i32
        let to_cell = |coord: f32| (coord / self.cell_size).floor() as i32;
        Some(CellRange {
            min_x: to_cell(min_x),
            max_x: to_cell(max_x),
            min_z: to_cell(min_z),
            max_z: to_cell(max_z),
        })
    }

    /// Clear and reinsert every given collider
    pub fn rebuild<'a, I>(&mut self, colliders: I)
    where
        I: IntoIterator<Item = (ColliderHandle, &'a AABB)>,
    {
        self.clear();
        for (handle, bounds) in colliders {
            self.insert(handle, bounds);
        }
        log::debug!(
            "WorldIndex: rebuilt with {} colliders in {} cells",
            self.covered.len(),
            self.cells.len()
        );
    }

    fn evict(&mut self, handle: ColliderHandle, range: CellRange) {
        for key in range.keys() {
            if let Some(bucket) = self.cells.get_mut(&key) {
                bucket.retain(|&h| h != handle);
                if bucket.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }
}

impl SpatialQuery for WorldIndex {
    fn insert(&mut self, handle: ColliderHandle, bounds: &AABB) -> bool {
        if let Some(previous) = self.covered.remove(&handle) {
            self.evict(handle, previous);
        }

        if bounds.is_empty() {
            log::warn!("WorldIndex: skipping collider {handle:?} with empty bounds {bounds:?}");
            return false;
        }

        let Some(range) = self.cell_range(bounds.min.x, bounds.max.x, bounds.min.z, bounds.max.z)
        else {
            return false;
        };

        for key in range.keys() {
            self.cells.entry(key).or_default().push(handle);
        }
        self.covered.insert(handle, range);

        log::trace!(
            "WorldIndex: inserted {handle:?} into {} cells",
            range.cell_count()
        );
        true
    }

    fn remove(&mut self, handle: ColliderHandle) -> bool {
        match self.covered.remove(&handle) {
            Some(range) => {
                self.evict(handle, range);
                true
            }
            None => false,
        }
    }

    fn query_range(&self, min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Vec<ColliderHandle> {
        let Some(range) = self.cell_range(min_x, max_x, min_z, max_z) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut results = Vec::new();
        let mut collect = |bucket: &Vec<ColliderHandle>| {
            for &handle in bucket {
                if seen.insert(handle) {
                    results.push(handle);
                }
            }
        };

        // Huge query rectangles walk the occupied buckets instead of every cell
        if range.cell_count() > self.cells.len() as u64 {
            for (key, bucket) in &self.cells {
                if range.contains(*key) {
                    collect(bucket);
                }
            }
        } else {
            for key in range.keys() {
                if let Some(bucket) = self.cells.get(&key) {
                    collect(bucket);
                }
            }
        }

        results
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.covered.clear();
    }

    fn len(&self) -> usize {
        self.covered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::ColliderMap;
    use crate::foundation::math::Vec3;

    fn boxed(min: (f32, f32), max: (f32, f32)) -> AABB {
        AABB::new(Vec3::new(min.0, 0.0, min.1), Vec3::new(max.0, 10.0, max.1))
    }

    fn handles(n: usize) -> Vec<ColliderHandle> {
        let mut map = ColliderMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_insert_spans_every_covered_cell() {
        let mut index = WorldIndex::new(GridConfig { cell_size: 100.0 });
        let h = handles(1)[0];

        // Spans cells x in [-1, 1], z in [0, 0]
        assert!(index.insert(h, &boxed((-50.0, 10.0), (150.0, 20.0))));
        assert_eq!(index.occupied_cells(), 3);
        assert_eq!(index.cells_of(h).unwrap().cell_count(), 3);
    }

    #[test]
    fn test_query_deduplicates_multi_cell_colliders() {
        let mut index = WorldIndex::new(GridConfig { cell_size: 100.0 });
        let h = handles(1)[0];
        index.insert(h, &boxed((0.0, 0.0), (450.0, 450.0)));

        let found = index.query_range(-1000.0, 1000.0, -1000.0, 1000.0);
        assert_eq!(found, vec![h]);
    }

    #[test]
    fn test_query_only_returns_nearby_cells() {
        let mut index = WorldIndex::default();
        let hs = handles(2);
        index.insert(hs[0], &boxed((0.0, 0.0), (10.0, 10.0)));
        index.insert(hs[1], &boxed((5000.0, 5000.0), (5010.0, 5010.0)));

        assert_eq!(index.query_range(-5.0, 5.0, -5.0, 5.0), vec![hs[0]]);
        assert_eq!(index.query_range(4990.0, 5020.0, 4990.0, 5020.0), vec![hs[1]]);
    }

    #[test]
    fn test_remove_evicts_from_all_cells() {
        let mut index = WorldIndex::new(GridConfig { cell_size: 10.0 });
        let hs = handles(2);
        index.insert(hs[0], &boxed((0.0, 0.0), (35.0, 35.0)));
        index.insert(hs[1], &boxed((0.0, 0.0), (5.0, 5.0)));

        assert!(index.remove(hs[0]));
        assert!(!index.remove(hs[0]));
        assert_eq!(index.len(), 1);
        // Only the small collider's cell remains
        assert_eq!(index.occupied_cells(), 1);
        assert_eq!(index.query_range(0.0, 40.0, 0.0, 40.0), vec![hs[1]]);
    }

    #[test]
    fn test_reinsert_moves_collider() {
        let mut index = WorldIndex::new(GridConfig { cell_size: 10.0 });
        let h = handles(1)[0];
        index.insert(h, &boxed((0.0, 0.0), (5.0, 5.0)));
        index.insert(h, &boxed((100.0, 100.0), (105.0, 105.0)));

        assert!(index.query_range(0.0, 5.0, 0.0, 5.0).is_empty());
        assert_eq!(index.query_range(100.0, 105.0, 100.0, 105.0), vec![h]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_inverted_and_non_finite_bounds_are_empty() {
        let mut index = WorldIndex::default();
        let h = handles(1)[0];
        index.insert(h, &boxed((0.0, 0.0), (10.0, 10.0)));

        assert!(index.query_range(10.0, 0.0, 0.0, 10.0).is_empty());
        assert!(index.query_range(f32::NAN, 10.0, 0.0, 10.0).is_empty());
        assert!(index.query_range(0.0, f32::INFINITY, 0.0, 10.0).is_empty());
    }

    #[test]
    fn test_empty_bounds_not_inserted() {
        let mut index = WorldIndex::default();
        let h = handles(1)[0];
        let inverted = AABB::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        assert!(!index.insert(h, &inverted));
        assert!(index.is_empty());
    }

    #[test]
    fn test_huge_query_walks_occupied_buckets() {
        let mut index = WorldIndex::new(GridConfig { cell_size: 1.0 });
        let hs = handles(2);
        index.insert(hs[0], &boxed((0.0, 0.0), (1.0, 1.0)));
        index.insert(hs[1], &boxed((-3.0e9, -3.0e9), (-3.0e9, -3.0e9)));

        let mut found = index.query_range(-1.0e30, 1.0e30, -1.0e30, 1.0e30);
        found.sort();
        let mut expected = hs.clone();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_rebuild_and_clear() {
        let mut index = WorldIndex::default();
        let hs = handles(3);
        let bounds = [
            boxed((0.0, 0.0), (1.0, 1.0)),
            boxed((500.0, 0.0), (501.0, 1.0)),
            boxed((0.0, 900.0), (1.0, 901.0)),
        ];
        index.rebuild(hs.iter().copied().zip(bounds.iter()));
        assert_eq!(index.len(), 3);

        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.occupied_cells(), 0);
    }

    #[test]
    fn test_invalid_cell_size_falls_back() {
        let index = WorldIndex::new(GridConfig { cell_size: -5.0 });
        assert_eq!(index.cell_size(), 200.0);
    }
}
