//! Boolean navigability grid and the polygon rasterizer that fills it.

use core::f32::consts::SQRT_2;

use crate::{geometry::bounding_box, point_in_polygon, Aabb, Corridor, Vec2};

/// Integer grid coordinate. May lie outside a grid; lookups bounds-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Fixed move order for determinism: N, E, S, W, then the diagonals NE, SE, SW, NW.
const MOVES: [(i32, i32, f32); 8] = [
    (0, -1, 1.0),
    (1, 0, 1.0),
    (0, 1, 1.0),
    (-1, 0, 1.0),
    (1, -1, SQRT_2),
    (1, 1, SQRT_2),
    (-1, 1, SQRT_2),
    (-1, -1, SQRT_2),
];

/// Row-major walkable/blocked grid at a fixed cell size.
#[derive(Debug, Clone, PartialEq)]
pub struct NavGrid {
    width: i32,
    height: i32,
    cell_size: f32,
    walkable: Vec<bool>,
}

impl NavGrid {
    /// A fully blocked grid.
    pub fn new(width: u32, height: u32, cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be > 0");
        Self {
            width: width as i32,
            height: height as i32,
            cell_size,
            walkable: vec![false; width as usize * height as usize],
        }
    }

    /// Placeholder grid for an environment without image dimensions.
    pub fn empty(cell_size: f32) -> Self {
        Self {
            width: 0,
            height: 0,
            cell_size,
            walkable: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.walkable.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn len(&self) -> usize {
        self.walkable.len()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cells(&self) -> &[bool] {
        &self.walkable
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }

    pub fn set_walkable(&mut self, cell: Cell, walkable: bool) {
        if let Some(idx) = self.idx(cell) {
            self.walkable[idx] = walkable;
        }
    }

    /// Out-of-bounds cells are blocked.
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.idx(cell).map(|idx| self.walkable[idx]).unwrap_or(false)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    pub fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(cell.y as usize * self.width as usize + cell.x as usize)
    }

    pub fn cell_from_idx(&self, idx: usize) -> Cell {
        let width = self.width.max(1) as usize;
        Cell {
            x: (idx % width) as i32,
            y: (idx / width) as i32,
        }
    }

    /// Cell containing `p`, without a bounds check.
    pub fn raw_cell(&self, p: Vec2) -> Cell {
        Cell {
            x: (p.x / self.cell_size).floor() as i32,
            y: (p.y / self.cell_size).floor() as i32,
        }
    }

    pub fn world_to_cell(&self, p: Vec2) -> Option<Cell> {
        let cell = self.raw_cell(p);
        self.in_bounds(cell).then_some(cell)
    }

    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Walkable neighbours of `cell` with their unit move cost (1 or √2).
    ///
    /// A diagonal move is only offered when both orthogonal cells it passes are walkable,
    /// so routes never cut a wall corner.
    pub fn moves(&self, cell: Cell) -> impl Iterator<Item = (Cell, f32)> + '_ {
        MOVES.iter().filter_map(move |&(dx, dy, cost)| {
            let n = Cell::new(cell.x + dx, cell.y + dy);
            if !self.is_walkable(n) {
                return None;
            }
            if dx != 0
                && dy != 0
                && !(self.is_walkable(Cell::new(cell.x + dx, cell.y))
                    && self.is_walkable(Cell::new(cell.x, cell.y + dy)))
            {
                return None;
            }
            Some((n, cost))
        })
    }

    /// Nearest walkable cell to `origin` (which may be off-grid) by expanding ring search.
    ///
    /// Rings grow in Chebyshev radius up to `max_radius`; within the first ring holding a
    /// walkable cell the Euclidean-closest one wins, ties broken by scan order.
    pub fn nearest_walkable(&self, origin: Cell, max_radius: usize) -> Option<Cell> {
        if self.is_walkable(origin) {
            return Some(origin);
        }
        if self.is_empty() {
            return None;
        }

        let max_radius = max_radius.min((self.width.max(self.height) as usize) * 2) as i32;
        // Anything farther out than this has no grid cell within reach.
        let origin = Cell::new(
            origin.x.clamp(-max_radius - 1, self.width.saturating_add(max_radius)),
            origin.y.clamp(-max_radius - 1, self.height.saturating_add(max_radius)),
        );
        for r in 1..=max_radius {
            let mut best: Option<(i32, Cell)> = None;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx.abs() != r && dy.abs() != r {
                        continue;
                    }
                    let c = Cell::new(origin.x + dx, origin.y + dy);
                    if !self.is_walkable(c) {
                        continue;
                    }
                    let d2 = dx * dx + dy * dy;
                    match best {
                        Some((best_d2, _)) if best_d2 <= d2 => {}
                        _ => best = Some((d2, c)),
                    }
                }
            }
            if let Some((_, c)) = best {
                return Some(c);
            }
        }
        None
    }
}

/// Rasterize corridors into a navigability grid.
///
/// Grid size is `ceil(width / resolution) × ceil(height / resolution)`. `floor = None`
/// rasterizes every corridor regardless of floor (the combined grid). Non-positive
/// dimensions or resolution produce an empty grid.
pub fn rasterize(
    corridors: &[Corridor],
    width: f32,
    height: f32,
    resolution: f32,
    floor: Option<i32>,
) -> NavGrid {
    if !(width > 0.0 && height > 0.0 && resolution > 0.0) {
        return NavGrid::empty(resolution.max(f32::MIN_POSITIVE));
    }

    let cols = (width / resolution).ceil() as u32;
    let rows = (height / resolution).ceil() as u32;
    let mut grid = NavGrid::new(cols, rows, resolution);

    let polys: Vec<(&[Vec2], Option<Aabb>)> = corridors
        .iter()
        .filter(|c| floor.is_none_or(|f| c.floor == f))
        .map(|c| (c.polygon.as_slice(), bounding_box(&c.polygon)))
        .collect();
    if polys.is_empty() {
        return grid;
    }

    let mut touched: Vec<usize> = Vec::with_capacity(4);
    for y in 0..rows as i32 {
        for x in 0..cols as i32 {
            let cell = Cell::new(x, y);
            let center = grid.cell_center(cell);
            if polys.iter().any(|(poly, _)| point_in_polygon(center, poly)) {
                grid.set_walkable(cell, true);
                continue;
            }

            let x0 = x as f32 * resolution;
            let y0 = y as f32 * resolution;
            let corners = [
                Vec2::new(x0, y0),
                Vec2::new(x0 + resolution, y0),
                Vec2::new(x0, y0 + resolution),
                Vec2::new(x0 + resolution, y0 + resolution),
            ];

            touched.clear();
            for corner in corners {
                for (i, (poly, _)) in polys.iter().enumerate() {
                    if !touched.contains(&i) && point_in_polygon(corner, poly) {
                        touched.push(i);
                    }
                }
            }

            let walkable = match touched.len() {
                0 => false,
                1 => true,
                _ => pairwise_overlapping(&touched, &polys),
            };
            if walkable {
                grid.set_walkable(cell, true);
            }
        }
    }

    grid
}

fn pairwise_overlapping(touched: &[usize], polys: &[(&[Vec2], Option<Aabb>)]) -> bool {
    for (i, &a) in touched.iter().enumerate() {
        for &b in &touched[i + 1..] {
            let overlap = match (polys[a].1, polys[b].1) {
                (Some(ba), Some(bb)) => ba.intersects(&bb),
                _ => false,
            };
            if !overlap {
                return false;
            }
        }
    }
    true
}
