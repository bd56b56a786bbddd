//! Sparse hash grid for broad-phase pairing

use ahash::{AHashMap, AHashSet};
use glam::Vec2;

use crate::core::geometry::Rect;

/// Widest span, in cells per axis, a body may cover before it is kept aside
const MAX_SPAN_CELLS: i64 = 64;

/// Sparse hash grid keyed by cell coordinate
///
/// Bodies are stored by their index into the caller's slice and inserted
/// into every cell their bounds cover. Bodies wider than `MAX_SPAN_CELLS`
/// skip the cells and are paired with everything instead.
pub struct SparseHashGrid {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<usize>>,
    oversized: Vec<usize>,
    indices: Vec<usize>,
}

impl SparseHashGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
            oversized: Vec::new(),
            indices: Vec::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i64, i64) {
        (
            (pos.x / self.cell_size).floor() as i64,
            (pos.y / self.cell_size).floor() as i64,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
        self.indices.clear();
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Bodies too wide for the cells
    pub fn oversized_count(&self) -> usize {
        self.oversized.len()
    }

    /// Insert a body into every cell its bounds touch
    ///
    /// Bounds that are not finite are skipped.
    pub fn insert_rect(&mut self, index: usize, rect: &Rect) {
        if !rect.origin.is_finite() || !rect.size.is_finite() {
            tracing::warn!("body {} has non-finite bounds {:?}, skipped", index, rect);
            return;
        }
        let (min_x, min_y) = self.cell_coord(rect.origin);
        let (max_x, max_y) = self.cell_coord(rect.origin + rect.size);
        self.indices.push(index);
        if max_x.saturating_sub(min_x) >= MAX_SPAN_CELLS || max_y.saturating_sub(min_y) >= MAX_SPAN_CELLS {
            tracing::debug!("body {} spans too many cells, paired with all", index);
            self.oversized.push(index);
            return;
        }
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                let key = (clamp_i32(cx), clamp_i32(cy));
                self.cells.entry(key).or_default().push(index);
            }
        }
    }

    /// Every pair sharing at least one cell, as `(low, high)`, each once
    ///
    /// Sorted so the narrow phase visits pairs in a stable order.
    pub fn candidate_pairs(&self) -> Vec<(usize, usize)> {
        let mut seen: AHashSet<(usize, usize)> = AHashSet::new();
        for &wide in &self.oversized {
            for &other in &self.indices {
                if wide != other {
                    seen.insert((wide.min(other), wide.max(other)));
                }
            }
        }
        for bucket in self.cells.values() {
            for (n, &a) in bucket.iter().enumerate() {
                for &b in &bucket[n + 1..] {
                    if a != b {
                        seen.insert((a.min(b), a.max(b)));
                    }
                }
            }
        }
        let mut pairs: Vec<_> = seen.into_iter().collect();
        pairs.sort_unstable();
        pairs
    }

    /// Rebuild grid from body bounds
    pub fn rebuild<'a>(&mut self, bodies: impl Iterator<Item = (usize, &'a Rect)>) {
        self.clear();
        for (index, rect) in bodies {
            self.insert_rect(index, rect);
        }
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
