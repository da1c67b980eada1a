//! Path extraction by greedy ascent over a solved value field.

use serde::Serialize;

use crate::{Cell, NavError, NavGrid, Result, SolverConfig, ValueField, Vec2, UNREACHED};

/// How an extraction ended. Only `Reached` counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathOutcome {
    /// The walk arrived at the goal cell.
    Reached,
    /// The start cell has no finite value: it is cut off from the goal.
    NoPath,
    /// Neither value nor cost-to-go improved before the goal was reached. Not expected on
    /// fields built by [`crate::solve`].
    Stuck,
    /// The move cap ran out first.
    StepLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    pub success: bool,
    pub path: Vec<Vec2>,
    /// Number of moves, `path.len() - 1`.
    pub steps: usize,
    pub outcome: PathOutcome,
}

impl PathResult {
    fn finish(path: Vec<Vec2>, outcome: PathOutcome) -> Self {
        Self {
            success: outcome == PathOutcome::Reached,
            steps: path.len().saturating_sub(1),
            path,
            outcome,
        }
    }
}

/// Walk from `start` up the value field until the goal cell is reached.
///
/// Each move goes to the neighbour with strictly the highest value. Where the discounted
/// value has flattened out and no neighbour is higher, the walk switches to descending the
/// field's cost-to-go for the rest of the way, which strictly decreases on every move.
///
/// The start is snapped to the nearest walkable cell when it is blocked or off-grid. Path
/// points are cell centers, except that an unsnapped start and a `destination` lying in the
/// goal cell are kept exactly.
pub fn extract_path(
    field: &ValueField,
    grid: &NavGrid,
    start: Vec2,
    destination: Option<Vec2>,
    config: &SolverConfig,
) -> Result<PathResult> {
    if grid.is_empty() {
        return Err(NavError::NotConfigured);
    }

    let origin = grid.raw_cell(start);
    let mut cell = grid
        .nearest_walkable(origin, config.snap_radius)
        .ok_or(NavError::StartUnreachable {
            x: start.x,
            y: start.y,
        })?;

    let mut path = Vec::new();
    path.push(if cell == origin {
        start
    } else {
        grid.cell_center(cell)
    });

    let mut current = field.value(cell).unwrap_or(UNREACHED);
    if current <= UNREACHED {
        return Ok(PathResult::finish(path, PathOutcome::NoPath));
    }

    let goal = field.goal();
    let mut steps = 0;
    let mut descending = false;
    loop {
        if cell == goal {
            if let Some(dest) = destination {
                if path.len() > 1 && grid.raw_cell(dest) == goal {
                    if let Some(last) = path.last_mut() {
                        *last = dest;
                    }
                }
            }
            return Ok(PathResult::finish(path, PathOutcome::Reached));
        }

        if steps >= config.max_path_steps {
            tracing::warn!(
                destination = field.destination(),
                steps,
                "path extraction hit the step cap"
            );
            return Ok(PathResult::finish(path, PathOutcome::StepLimit));
        }

        let mut next = if descending {
            None
        } else {
            ascend(field, grid, cell, current)
        };
        if next.is_none() {
            if !descending {
                tracing::debug!(
                    destination = field.destination(),
                    x = cell.x,
                    y = cell.y,
                    "value plateau, following cost-to-go"
                );
                descending = true;
            }
            next = descend(field, grid, cell);
        }

        let Some((next, value)) = next else {
            tracing::warn!(
                destination = field.destination(),
                x = cell.x,
                y = cell.y,
                "path extraction stuck on a local maximum"
            );
            return Ok(PathResult::finish(path, PathOutcome::Stuck));
        };

        cell = next;
        current = value;
        steps += 1;
        path.push(grid.cell_center(cell));
    }
}

/// Neighbour with strictly the highest value above `current`.
fn ascend(field: &ValueField, grid: &NavGrid, cell: Cell, current: f32) -> Option<(Cell, f32)> {
    let mut best: Option<(Cell, f32)> = None;
    for (n, _) in grid.moves(cell) {
        let Some(v) = field.value(n) else { continue };
        if v <= current {
            continue;
        }
        match best {
            Some((_, best_v)) if best_v >= v => {}
            _ => best = Some((n, v)),
        }
    }
    best
}

/// Neighbour with the lowest cost-to-go, if it is strictly below the current cell's.
fn descend(field: &ValueField, grid: &NavGrid, cell: Cell) -> Option<(Cell, f32)> {
    let here = field.cost_to_go(cell)?;
    let mut best: Option<(Cell, f32)> = None;
    for (n, _) in grid.moves(cell) {
        let Some(d) = field.cost_to_go(n) else { continue };
        if d >= here {
            continue;
        }
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((n, d)),
        }
    }
    best.and_then(|(n, _)| field.value(n).map(|v| (n, v)))
}
