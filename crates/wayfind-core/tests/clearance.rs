use proptest::prelude::*;
use wayfind_core::{build_clearance, Cell, NavGrid};

fn open_grid(width: u32, height: u32) -> NavGrid {
    let mut grid = NavGrid::new(width, height, 1.0);
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            grid.set_walkable(Cell::new(x, y), true);
        }
    }
    grid
}

#[test]
fn single_obstacle_yields_manhattan_rings() {
    let mut grid = open_grid(5, 5);
    grid.set_walkable(Cell::new(2, 2), false);
    let clearance = build_clearance(&grid);

    assert_eq!(clearance.get(Cell::new(2, 2)), Some(0.0));
    for n in [(2, 1), (3, 2), (2, 3), (1, 2)] {
        assert_eq!(clearance.get(Cell::new(n.0, n.1)), Some(1.0), "cell {n:?}");
    }
    assert_eq!(clearance.get(Cell::new(1, 1)), Some(2.0));
    assert_eq!(clearance.get(Cell::new(0, 0)), Some(4.0));
    assert_eq!(clearance.get(Cell::new(4, 0)), Some(4.0));
    assert_eq!(clearance.get(Cell::new(5, 0)), None);
}

#[test]
fn grid_without_obstacles_keeps_upper_bound() {
    let grid = open_grid(4, 3);
    let clearance = build_clearance(&grid);
    assert!(clearance.values().iter().all(|&v| v == 7.0));
}

#[test]
fn blocked_grid_is_all_zero() {
    let grid = NavGrid::new(3, 3, 1.0);
    let clearance = build_clearance(&grid);
    assert!(clearance.values().iter().all(|&v| v == 0.0));
}

fn grid_from_mask(width: u32, height: u32, mask: &[bool]) -> NavGrid {
    let mut grid = NavGrid::new(width, height, 1.0);
    for (i, &walkable) in mask.iter().enumerate() {
        let cell = Cell::new(i as i32 % width as i32, i as i32 / width as i32);
        grid.set_walkable(cell, walkable);
    }
    grid
}

fn arb_mask() -> impl Strategy<Value = (u32, u32, Vec<bool>)> {
    (1u32..9, 1u32..9).prop_flat_map(|(w, h)| {
        (
            Just(w),
            Just(h),
            prop::collection::vec(prop::bool::weighted(0.75), (w * h) as usize),
        )
    })
}

proptest! {
    #[test]
    fn two_pass_transform_matches_brute_force((w, h, mask) in arb_mask()) {
        let grid = grid_from_mask(w, h, &mask);
        let clearance = build_clearance(&grid);

        let blocked: Vec<(i32, i32)> = (0..(w * h) as i32)
            .filter(|&i| !mask[i as usize])
            .map(|i| (i % w as i32, i / w as i32))
            .collect();

        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let expected = blocked
                    .iter()
                    .map(|&(bx, by)| ((bx - x).abs() + (by - y).abs()) as f32)
                    .fold((w + h) as f32, f32::min);
                prop_assert_eq!(clearance.get(Cell::new(x, y)), Some(expected));
            }
        }
    }

    #[test]
    fn cells_next_to_obstacles_have_unit_clearance((w, h, mask) in arb_mask()) {
        let grid = grid_from_mask(w, h, &mask);
        let clearance = build_clearance(&grid);

        for y in 0..h as i32 {
            for x in 0..w as i32 {
                let cell = Cell::new(x, y);
                if !grid.is_walkable(cell) {
                    continue;
                }
                let touches_obstacle = [(0, -1), (1, 0), (0, 1), (-1, 0)].iter().any(|(dx, dy)| {
                    let n = Cell::new(x + dx, y + dy);
                    grid.in_bounds(n) && !grid.is_walkable(n)
                });
                if touches_obstacle {
                    prop_assert_eq!(clearance.get(cell), Some(1.0));
                }
            }
        }
    }
}
