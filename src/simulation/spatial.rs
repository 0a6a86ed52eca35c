//! Spatial indexing for efficient neighbor queries.
//!
//! A [`SpatialGrid`] partitions the world into uniform square cells. Radius
//! queries visit only the cells overlapping the query circle's bounding box
//! plus one ring of neighbors, so per-tick neighbor lookups stay near O(n)
//! instead of all-pairs. Grids are rebuilt from scratch every tick.

use super::geometric_utils::{Vec2, distance_squared};
use super::locatable::Locatable;

/// Result of a spatial radius query: `(distance_squared, index)` pairs.
pub type SpatialQueryResult = Vec<(f32, usize)>;

#[derive(Debug, Clone, Copy)]
struct GridEntry {
    index: usize,
    pos: Vec2,
}

/// Uniform grid over `[0, width] × [0, height]`.
///
/// Entries are indices into the owning entity collection. Positions outside
/// the bounds are stored in the nearest edge cell.
#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<GridEntry>>,
    len: usize,
}

impl SpatialGrid {
    /// Creates an empty grid covering the given extent.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let cell_size = cell_size.max(f32::EPSILON);
        let cols = ((width / cell_size).ceil() as usize).max(1);
        let rows = ((height / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            len: 0,
        }
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.len = 0;
    }

    /// Insert an entity index at the given position
    #[inline]
    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let (cx, cy) = self.cell_of(pos);
        self.cells[cy * self.cols + cx].push(GridEntry { index, pos });
        self.len += 1;
    }

    /// Clears the grid and inserts every active item by its slice index.
    pub fn rebuild<T: Locatable>(&mut self, items: &[T]) {
        self.clear();
        for (index, item) in items.iter().enumerate() {
            if item.is_active() {
                self.insert(index, item.pos());
            }
        }
    }

    /// Number of indexed entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the grid holds no entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Grid dimensions `(cols, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    #[inline]
    fn cell_of(&self, pos: Vec2) -> (usize, usize) {
        (
            Self::axis_cell(pos.x, self.cell_size, self.cols),
            Self::axis_cell(pos.y, self.cell_size, self.rows),
        )
    }

    #[inline]
    fn axis_cell(coord: f32, cell_size: f32, count: usize) -> usize {
        if coord.is_nan() || coord <= 0.0 {
            return 0;
        }
        ((coord / cell_size) as usize).min(count - 1)
    }

    /// Calls `visit(distance_squared, index)` for every entity within `radius`.
    ///
    /// Scans the cells covering the circle's bounding box plus one ring.
    pub fn for_each_within(&self, center: Vec2, radius: f32, mut visit: impl FnMut(f32, usize)) {
        if self.len == 0 || radius < 0.0 {
            return;
        }
        let radius_sq = radius * radius;
        let (x0, y0) = self.cell_of(Vec2 {
            x: center.x - radius,
            y: center.y - radius,
        });
        let (x1, y1) = self.cell_of(Vec2 {
            x: center.x + radius,
            y: center.y + radius,
        });
        let x0 = x0.saturating_sub(1);
        let y0 = y0.saturating_sub(1);
        let x1 = (x1 + 1).min(self.cols - 1);
        let y1 = (y1 + 1).min(self.rows - 1);

        for cy in y0..=y1 {
            for cx in x0..=x1 {
                for entry in &self.cells[cy * self.cols + cx] {
                    let d2 = distance_squared(center, entry.pos);
                    if d2 <= radius_sq {
                        visit(d2, entry.index);
                    }
                }
            }
        }
    }

    /// Query entities within a radius.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position for the query
    /// * `radius` - Search radius (inclusive)
    ///
    /// # Returns
    ///
    /// Vector of (`distance_squared`, index) pairs for entities within radius.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> SpatialQueryResult {
        let mut found = Vec::new();
        self.for_each_within(center, radius, |d2, index| found.push((d2, index)));
        found
    }

    /// Nearest entity within `radius` accepted by `predicate`.
    ///
    /// Ties on distance resolve to the lowest index.
    pub fn query_nearest_within(
        &self,
        center: Vec2,
        radius: f32,
        mut predicate: impl FnMut(usize) -> bool,
    ) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        self.for_each_within(center, radius, |d2, index| {
            if is_better(best, d2, index) && predicate(index) {
                best = Some((d2, index));
            }
        });
        best
    }

    /// Nearest entity anywhere in the grid accepted by `predicate`.
    ///
    /// Searches rings of cells outwards from the center cell and stops once
    /// no unvisited ring can hold a closer entity.
    pub fn query_nearest(
        &self,
        center: Vec2,
        mut predicate: impl FnMut(usize) -> bool,
    ) -> Option<(f32, usize)> {
        if self.len == 0 {
            return None;
        }
        let (cx, cy) = self.cell_of(center);
        let max_ring = self.cols.max(self.rows);
        let mut best: Option<(f32, usize)> = None;

        for ring in 0..=max_ring {
            let x0 = cx as isize - ring as isize;
            let x1 = cx as isize + ring as isize;
            let y0 = cy as isize - ring as isize;
            let y1 = cy as isize + ring as isize;
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let on_ring = y == y0 || y == y1 || x == x0 || x == x1;
                    if !on_ring
                        || x < 0
                        || y < 0
                        || x as usize >= self.cols
                        || y as usize >= self.rows
                    {
                        continue;
                    }
                    for entry in &self.cells[y as usize * self.cols + x as usize] {
                        let d2 = distance_squared(center, entry.pos);
                        if is_better(best, d2, entry.index) && predicate(entry.index) {
                            best = Some((d2, entry.index));
                        }
                    }
                }
            }
            // Entities beyond this ring are at least `ring * cell_size` away.
            if let Some((d2, _)) = best {
                let reach = ring as f32 * self.cell_size;
                if d2 <= reach * reach {
                    break;
                }
            }
        }
        best
    }
}

#[inline]
fn is_better(best: Option<(f32, usize)>, d2: f32, index: usize) -> bool {
    match best {
        None => true,
        Some((best_d2, best_index)) => d2 < best_d2 || (d2 == best_d2 && index < best_index),
    }
}

/// One grid per entity category, rebuilt together at the start of each tick.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    /// Agent positions.
    pub agents: SpatialGrid,
    /// Food positions.
    pub food: SpatialGrid,
    /// Water source centres.
    pub water: SpatialGrid,
    /// Obstacle centres.
    pub obstacles: SpatialGrid,
}

impl SpatialIndex {
    /// Creates four empty grids with a shared cell size.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let grid = SpatialGrid::new(width, height, cell_size);
        Self {
            agents: grid.clone(),
            food: grid.clone(),
            water: grid.clone(),
            obstacles: grid,
        }
    }
}
