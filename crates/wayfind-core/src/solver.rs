//! Value iteration over the navigability grid.
//!
//! States are walkable cells, actions are the (up to) eight moves offered by
//! [`NavGrid::moves`], and the goal cell is absorbing with value `0`. Every other cell
//! converges to the discounted negative cost of the cheapest route to the goal:
//!
//! `V(s) = max_n [ -cost(s→n) · (1 + wall_penalty(s)) + γ · V(n) ]`
//!
//! Sweeps update values in place (Gauss–Seidel) and alternate direction, so a single sweep
//! can carry information across the whole grid. Intermediate fields depend on sweep order;
//! the converged field does not.
//!
//! The same sweeps also relax the undiscounted cost-to-go `D(s)`. Far from the goal the
//! discounted value saturates near `-cost / (1 - γ)`, where circling in place scores as well
//! as walking; `D` has no such plateau and always has a strictly lower neighbour on a
//! reachable cell.

use serde::Serialize;

use crate::{Cell, ClearanceField, Destination, NavError, NavGrid, Result, SolverConfig, Vec2};

/// Value of cells that cannot reach the goal (and of blocked cells).
pub const UNREACHED: f32 = -1.0e9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolveReport {
    pub iterations: usize,
    pub converged: bool,
    /// Largest change seen in the final sweep.
    pub final_delta: f32,
    pub reachable_cells: usize,
}

/// Solved value field for one destination. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueField {
    destination: String,
    floor: i32,
    width: u32,
    height: u32,
    cell_size: f32,
    goal: Cell,
    values: Vec<f32>,
    cost_to_go: Vec<f32>,
    report: SolveReport,
}

impl ValueField {
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The seeded goal cell; differs from the destination's own cell when it was snapped.
    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn report(&self) -> SolveReport {
        self.report
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 || cell.x >= self.width as i32 || cell.y >= self.height as i32
        {
            return None;
        }
        Some(cell.y as usize * self.width as usize + cell.x as usize)
    }

    pub fn value(&self, cell: Cell) -> Option<f32> {
        self.index(cell).map(|i| self.values[i])
    }

    /// Undiscounted, penalized cost of the cheapest route to the goal; infinite when unreached.
    pub fn cost_to_go(&self, cell: Cell) -> Option<f32> {
        self.index(cell).map(|i| self.cost_to_go[i])
    }

    pub fn value_at(&self, p: Vec2) -> Option<f32> {
        self.value(Cell::new(
            (p.x / self.cell_size).floor() as i32,
            (p.y / self.cell_size).floor() as i32,
        ))
    }

    pub fn is_reachable(&self, cell: Cell) -> bool {
        self.value(cell).is_some_and(|v| v > UNREACHED)
    }

    /// Row-major dump with `None` for unreached cells.
    pub fn to_rows(&self) -> Vec<Vec<Option<f32>>> {
        self.values
            .chunks(self.width.max(1) as usize)
            .map(|row| {
                row.iter()
                    .map(|&v| (v > UNREACHED).then_some(v))
                    .collect()
            })
            .collect()
    }
}

/// Extra move-cost fraction for cells closer to a wall than `safe_distance`.
pub fn wall_penalty(clearance: f32, config: &SolverConfig) -> f32 {
    if clearance < config.safe_distance {
        (config.safe_distance - clearance) * config.penalty_factor
    } else {
        0.0
    }
}

/// Solve the value field for `destination` on `grid`.
///
/// A destination whose own cell is blocked is snapped to the nearest walkable cell within
/// `config.snap_radius`; if there is none the destination is unreachable.
pub fn solve(
    destination: &Destination,
    grid: &NavGrid,
    clearance: &ClearanceField,
    config: &SolverConfig,
) -> Result<ValueField> {
    if grid.is_empty() {
        return Err(NavError::NotConfigured);
    }

    let origin = grid.raw_cell(destination.position());
    let goal = grid
        .nearest_walkable(origin, config.snap_radius)
        .ok_or_else(|| NavError::UnreachableDestination(destination.id.clone()))?;
    if goal != origin {
        tracing::debug!(
            destination = %destination.id,
            from_x = origin.x,
            from_y = origin.y,
            to_x = goal.x,
            to_y = goal.y,
            "snapped destination to nearest walkable cell"
        );
    }

    let Some(goal_idx) = grid.idx(goal) else {
        return Err(NavError::UnreachableDestination(destination.id.clone()));
    };

    let mut values = vec![UNREACHED; grid.len()];
    values[goal_idx] = 0.0;
    let mut cost_to_go = vec![f32::INFINITY; grid.len()];
    cost_to_go[goal_idx] = 0.0;

    // Per-cell move cost scale, precomputed once: step_cost · (1 + wall_penalty).
    let states: Vec<(usize, Cell, f32)> = grid
        .cells()
        .iter()
        .enumerate()
        .filter(|&(i, &walkable)| walkable && i != goal_idx)
        .map(|(i, _)| {
            let clear = clearance.values().get(i).copied().unwrap_or(0.0);
            let scale = config.step_cost * (1.0 + wall_penalty(clear, config));
            (i, grid.cell_from_idx(i), scale)
        })
        .collect();

    let gamma = config.discount;
    let mut iterations = 0;
    let mut converged = false;
    let mut final_delta = f32::INFINITY;

    while iterations < config.max_iterations {
        iterations += 1;
        let mut delta = 0.0f32;

        let mut sweep = |&(i, cell, scale): &(usize, Cell, f32)| {
            let mut best = UNREACHED;
            let mut cheapest = f32::INFINITY;
            for (n, unit_cost) in grid.moves(cell) {
                let Some(ni) = grid.idx(n) else { continue };
                let vn = values[ni];
                if vn <= UNREACHED {
                    continue;
                }
                let cost = unit_cost * scale;
                best = best.max(-cost + gamma * vn);
                cheapest = cheapest.min(cost + cost_to_go[ni]);
            }
            delta = delta.max((best - values[i]).abs());
            if cheapest.is_finite() {
                delta = delta.max((cheapest - cost_to_go[i]).abs());
            }
            values[i] = best;
            cost_to_go[i] = cheapest;
        };

        if iterations % 2 == 1 {
            states.iter().for_each(&mut sweep);
        } else {
            states.iter().rev().for_each(&mut sweep);
        }

        final_delta = delta;
        if delta <= config.epsilon {
            converged = true;
            break;
        }
    }

    let reachable_cells = values.iter().filter(|&&v| v > UNREACHED).count();
    let report = SolveReport {
        iterations,
        converged,
        final_delta,
        reachable_cells,
    };

    if converged {
        tracing::debug!(
            destination = %destination.id,
            iterations,
            reachable_cells,
            "value field converged"
        );
    } else {
        tracing::warn!(
            destination = %destination.id,
            iterations,
            final_delta,
            "value iteration hit the sweep cap before converging"
        );
    }

    Ok(ValueField {
        destination: destination.id.clone(),
        floor: destination.floor,
        width: grid.width(),
        height: grid.height(),
        cell_size: grid.cell_size(),
        goal,
        values,
        cost_to_go,
        report,
    })
}
