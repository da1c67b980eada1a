use proptest::prelude::*;
use wayfind_core::{rasterize, Cell, Corridor, NavGrid, Vec2};

fn hallway() -> Corridor {
    Corridor::new(
        "hall",
        0,
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(100.0, 20.0),
            Vec2::new(0.0, 20.0),
        ],
    )
}

#[test]
fn single_hallway_rasterizes_to_full_grid() {
    let grid = rasterize(&[hallway()], 100.0, 20.0, 10.0, Some(0));

    assert_eq!(grid.width(), 10);
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.walkable_count(), 20);
}

#[test]
fn grid_dimensions_round_up() {
    let grid = rasterize(&[hallway()], 95.0, 21.0, 10.0, None);
    assert_eq!(grid.width(), 10);
    assert_eq!(grid.height(), 3);
    assert_eq!(grid.len(), 30);
}

#[test]
fn missing_dimensions_produce_empty_grid() {
    let grid = rasterize(&[hallway()], 0.0, 20.0, 10.0, None);
    assert!(grid.is_empty());
    assert_eq!(grid.walkable_count(), 0);
}

#[test]
fn floors_are_rasterized_separately() {
    let lower = Corridor::rect("lower", 0, Vec2::new(0.0, 0.0), Vec2::new(38.0, 40.0));
    let upper = Corridor::rect("upper", 1, Vec2::new(62.0, 0.0), Vec2::new(100.0, 40.0));
    let corridors = [lower, upper];

    let floor0 = rasterize(&corridors, 100.0, 40.0, 10.0, Some(0));
    let floor1 = rasterize(&corridors, 100.0, 40.0, 10.0, Some(1));
    let combined = rasterize(&corridors, 100.0, 40.0, 10.0, None);

    assert!(floor0.is_walkable(Cell::new(0, 0)));
    assert!(!floor0.is_walkable(Cell::new(9, 0)));
    assert!(floor1.is_walkable(Cell::new(9, 0)));
    assert!(!floor1.is_walkable(Cell::new(0, 0)));
    assert_eq!(
        combined.walkable_count(),
        floor0.walkable_count() + floor1.walkable_count()
    );

    let floor7 = rasterize(&corridors, 100.0, 40.0, 10.0, Some(7));
    assert_eq!(floor7.walkable_count(), 0);
}

#[test]
fn thin_sliver_is_kept_by_corner_samples() {
    // 4 units wide: no cell center falls inside, but corners on x = 20 do.
    let sliver = Corridor::rect("sliver", 0, Vec2::new(18.0, 0.0), Vec2::new(22.0, 40.0));
    let grid = rasterize(&[sliver], 40.0, 40.0, 10.0, Some(0));

    for y in 0..4 {
        assert!(!grid.is_walkable(Cell::new(0, y)));
        assert!(grid.is_walkable(Cell::new(1, y)));
        assert!(grid.is_walkable(Cell::new(2, y)));
        assert!(!grid.is_walkable(Cell::new(3, y)));
    }
}

#[test]
fn corners_touching_disjoint_corridors_do_not_bridge() {
    // Cell (4, 1) spans x 40..50: its left corners lie in `west`, its right corners in
    // `east`, and its center in neither.
    let west = Corridor::rect("west", 0, Vec2::new(0.0, 0.0), Vec2::new(41.0, 22.0));
    let east = Corridor::rect("east", 0, Vec2::new(49.0, 0.0), Vec2::new(100.0, 22.0));
    let grid = rasterize(&[west, east], 100.0, 40.0, 10.0, Some(0));

    assert!(grid.is_walkable(Cell::new(3, 1)));
    assert!(grid.is_walkable(Cell::new(5, 1)));
    assert!(!grid.is_walkable(Cell::new(4, 0)));
    assert!(!grid.is_walkable(Cell::new(4, 1)));
}

#[test]
fn corners_touching_overlapping_corridors_bridge() {
    // Same cell as above, but `east` now wraps over the top of `west` so the bounding
    // boxes intersect.
    let west = Corridor::rect("west", 0, Vec2::new(0.0, 0.0), Vec2::new(41.0, 22.0));
    let east = Corridor::new(
        "east",
        0,
        vec![
            Vec2::new(30.0, 30.0),
            Vec2::new(100.0, 30.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(49.0, 0.0),
            Vec2::new(49.0, 25.0),
            Vec2::new(30.0, 25.0),
        ],
    );
    let grid = rasterize(&[west, east], 100.0, 40.0, 10.0, Some(0));

    assert!(grid.is_walkable(Cell::new(4, 1)));
}

#[test]
fn nearest_walkable_searches_outward() {
    let grid = rasterize(&[hallway()], 100.0, 60.0, 10.0, Some(0));

    assert_eq!(grid.nearest_walkable(Cell::new(3, 1), 5), Some(Cell::new(3, 1)));
    assert_eq!(grid.nearest_walkable(Cell::new(3, 4), 5), Some(Cell::new(3, 1)));
    // Off-grid origins are snapped back onto the grid.
    assert_eq!(grid.nearest_walkable(Cell::new(-2, 0), 5), Some(Cell::new(0, 0)));
    assert_eq!(grid.nearest_walkable(Cell::new(3, 5), 2), None);
}

#[test]
fn far_off_grid_origins_are_not_snapped() {
    let grid = rasterize(&[hallway()], 100.0, 60.0, 10.0, Some(0));

    assert_eq!(grid.nearest_walkable(Cell::new(-15, 1), 20), Some(Cell::new(0, 1)));
    assert_eq!(grid.nearest_walkable(Cell::new(i32::MIN, 0), 20), None);
    assert_eq!(grid.nearest_walkable(Cell::new(i32::MAX, i32::MAX), 20), None);
    assert_eq!(
        grid.nearest_walkable(grid.raw_cell(Vec2::new(-1.0e12, 5.0)), 20),
        None
    );
}

#[test]
fn wide_grids_index_without_overflow() {
    let mut grid = NavGrid::new(100_000, 30, 1.0);
    assert_eq!(grid.len(), 3_000_000);

    let far = Cell::new(99_999, 29);
    grid.set_walkable(far, true);
    let idx = grid.idx(far).expect("in bounds");
    assert_eq!(idx, 2_999_999);
    assert_eq!(grid.cell_from_idx(idx), far);
    assert!(grid.is_walkable(far));
    assert_eq!(grid.walkable_count(), 1);
}

#[test]
fn diagonal_moves_do_not_cut_corners() {
    let mut grid = rasterize(&[hallway()], 100.0, 20.0, 10.0, Some(0));
    grid.set_walkable(Cell::new(1, 0), false);

    let from_origin: Vec<Cell> = grid.moves(Cell::new(0, 0)).map(|(c, _)| c).collect();
    assert_eq!(from_origin, vec![Cell::new(0, 1)]);

    let from_below: Vec<Cell> = grid.moves(Cell::new(1, 1)).map(|(c, _)| c).collect();
    assert_eq!(
        from_below,
        vec![Cell::new(2, 1), Cell::new(0, 1)],
        "diagonals past the blocked cell are not offered"
    );

    let open: Vec<(Cell, f32)> = grid.moves(Cell::new(2, 1)).collect();
    assert!(open.contains(&(Cell::new(3, 0), core::f32::consts::SQRT_2)));
    assert!(open.contains(&(Cell::new(2, 0), 1.0)));
}

proptest! {
    #[test]
    fn covering_convex_polygon_marks_every_cell(
        width in 10.0f32..300.0,
        height in 10.0f32..300.0,
        resolution in 1.0f32..25.0,
    ) {
        let cover = Corridor::rect(
            "cover",
            0,
            Vec2::new(-1.0, -1.0),
            Vec2::new(width + resolution + 1.0, height + resolution + 1.0),
        );
        let grid = rasterize(&[cover], width, height, resolution, Some(0));

        prop_assert_eq!(grid.width(), (width / resolution).ceil() as u32);
        prop_assert_eq!(grid.height(), (height / resolution).ceil() as u32);
        prop_assert_eq!(grid.walkable_count(), grid.len());
    }

    #[test]
    fn rasterization_is_deterministic(
        x0 in 0.0f32..50.0,
        y0 in 0.0f32..50.0,
        w in 5.0f32..60.0,
        h in 5.0f32..60.0,
    ) {
        let c = Corridor::rect("c", 0, Vec2::new(x0, y0), Vec2::new(x0 + w, y0 + h));
        let a = rasterize(std::slice::from_ref(&c), 120.0, 120.0, 7.0, None);
        let b = rasterize(std::slice::from_ref(&c), 120.0, 120.0, 7.0, None);
        prop_assert_eq!(a, b);
    }
}
