use crate::{Cell, NavGrid};

/// Per-cell Manhattan distance (in cells) to the nearest blocked cell.
///
/// Blocked cells hold 0. Walkable cells with no blocked cell anywhere in the grid keep the
/// initial bound `width + height`; the grid boundary itself is not an obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearanceField {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl ClearanceField {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, cell: Cell) -> Option<f32> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width as i32 || cell.y >= self.height as i32
        {
            return None;
        }
        Some(self.values[cell.y as usize * self.width as usize + cell.x as usize])
    }
}

/// Two-pass Manhattan distance transform.
///
/// The forward sweep pulls from the left and upper neighbours, the backward sweep from the
/// right and lower ones, which yields the exact L1 distance in O(cells).
pub fn build_clearance(grid: &NavGrid) -> ClearanceField {
    let w = grid.width() as usize;
    let h = grid.height() as usize;
    let bound = (w + h) as f32;

    let mut d: Vec<f32> = grid
        .cells()
        .iter()
        .map(|&walkable| if walkable { bound } else { 0.0 })
        .collect();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if d[i] == 0.0 {
                continue;
            }
            let mut v = d[i];
            if x > 0 {
                v = v.min(d[i - 1] + 1.0);
            }
            if y > 0 {
                v = v.min(d[i - w] + 1.0);
            }
            d[i] = v;
        }
    }

    for y in (0..h).rev() {
        for x in (0..w).rev() {
            let i = y * w + x;
            if d[i] == 0.0 {
                continue;
            }
            let mut v = d[i];
            if x + 1 < w {
                v = v.min(d[i + 1] + 1.0);
            }
            if y + 1 < h {
                v = v.min(d[i + w] + 1.0);
            }
            d[i] = v;
        }
    }

    ClearanceField {
        width: w as u32,
        height: h as u32,
        values: d,
    }
}
