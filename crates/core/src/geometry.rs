//! Stateless conversions between pixel positions and board cells, plus cell neighborhoods.
//! This module exists so every higher layer shares one definition of footprints and step costs.
//! It does not read board contents.

use std::f64::consts::SQRT_2;

use crate::config::GridSettings;
use crate::types::{Cell, Point, UnitSize};

/// Orthogonal directions first, then diagonals.
pub const DIRECTIONS: [(i32, i32); 8] =
    [(0, 1), (1, 0), (0, -1), (-1, 0), (1, 1), (1, -1), (-1, -1), (-1, 1)];

pub const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub fn cell_for_position(settings: &GridSettings, position: Option<Point>) -> Option<Cell> {
    let position = position?;
    let x = ((position.x - settings.min_x) / settings.step()).floor();
    let y = ((position.y - settings.min_y) / settings.step()).floor();
    Some(Cell::new(x as i32, y as i32))
}

/// Cells sharing the grid intersection nearest to `point`, anchor (top-right) first.
/// Used to recover a large unit's footprint from its centroid.
pub fn cells_around_point(settings: &GridSettings, point: Point) -> Vec<Cell> {
    let line_x = ((point.x - settings.min_x) / settings.step()).round() as i32;
    let line_y = ((point.y - settings.min_y) / settings.step()).round() as i32;
    let right = Cell::new(line_x, line_y);

    let mut cells = Vec::with_capacity(4);
    let columns = [(0, can_go_right(settings, right)), (-1, can_go_left(right))];
    let rows = [(0, can_go_up(settings, right)), (-1, can_go_down(right))];
    for (dy, row_ok) in rows {
        for (dx, column_ok) in columns {
            if row_ok && column_ok {
                cells.push(right.offset(dx, dy));
            }
        }
    }
    cells
}

fn can_go_left(cell: Cell) -> bool {
    cell.x > 0
}

fn can_go_down(cell: Cell) -> bool {
    cell.y > 0
}

fn can_go_right(settings: &GridSettings, cell: Cell) -> bool {
    cell.x >= 0 && cell.x < settings.grid_size
}

fn can_go_up(settings: &GridSettings, cell: Cell) -> bool {
    cell.y >= 0 && cell.y < settings.grid_size
}

/// Pixel center of `cell` on a board whose axes both start at `min_x`.
pub fn point_for_cell(cell: Cell, min_x: f64, step: f64, half_step: f64) -> Point {
    Point::new(
        min_x + f64::from(cell.x) * step + half_step,
        min_x + f64::from(cell.y) * step + half_step,
    )
}

pub fn center_of_cell(settings: &GridSettings, cell: Cell) -> Point {
    Point::new(
        settings.min_x + f64::from(cell.x) * settings.step() + settings.half_step(),
        settings.min_y + f64::from(cell.y) * settings.step() + settings.half_step(),
    )
}

/// Pixel position a unit is drawn at: its cell center, or the shared corner of a 2x2 footprint.
pub fn unit_position(settings: &GridSettings, anchor: Cell, size: UnitSize) -> Point {
    let center = center_of_cell(settings, anchor);
    match size {
        UnitSize::Small => center,
        UnitSize::Large => {
            Point::new(center.x - settings.half_step(), center.y - settings.half_step())
        }
    }
}

pub fn is_point_in_cell(settings: &GridSettings, point: Point, cell: Cell) -> bool {
    cell_for_position(settings, Some(point)) == Some(cell)
}

pub fn neighbors8(cell: Cell) -> [Cell; 8] {
    DIRECTIONS.map(|(dx, dy)| cell.offset(dx, dy))
}

pub fn chebyshev(a: Cell, b: Cell) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

/// Raw length of one step; flying units cross diagonals at orthogonal cost.
pub fn step_cost(dx: i32, dy: i32, can_fly: bool) -> f64 {
    if dx != 0 && dy != 0 && !can_fly { SQRT_2 } else { 1.0 }
}

pub fn large_footprint(anchor: Cell) -> [Cell; 4] {
    [anchor, anchor.offset(-1, 0), anchor.offset(0, -1), anchor.offset(-1, -1)]
}

pub fn footprint(anchor: Cell, size: UnitSize) -> Vec<Cell> {
    match size {
        UnitSize::Small => vec![anchor],
        UnitSize::Large => large_footprint(anchor).to_vec(),
    }
}

/// Top-right cell of a footprint.
pub fn anchor_of(cells: &[Cell]) -> Option<Cell> {
    let x = cells.iter().map(|cell| cell.x).max()?;
    let y = cells.iter().map(|cell| cell.y).max()?;
    Some(Cell::new(x, y))
}

/// Where inside its cell the mouse sits. The center zone spans ±1/6 of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseZone {
    Center,
    Edge { dx: i32, dy: i32 },
    Corner { dx: i32, dy: i32 },
}

pub fn mouse_zone(settings: &GridSettings, point: Point) -> Option<(Cell, MouseZone)> {
    let cell = cell_for_position(settings, Some(point))?;
    if !settings.contains(cell) {
        return None;
    }
    let center = center_of_cell(settings, cell);
    let band = settings.step() / 6.0;
    let axis = |delta: f64| {
        if delta > band {
            1
        } else if delta < -band {
            -1
        } else {
            0
        }
    };
    let (dx, dy) = (axis(point.x - center.x), axis(point.y - center.y));
    let zone = match (dx, dy) {
        (0, 0) => MouseZone::Center,
        (0, _) | (_, 0) => MouseZone::Edge { dx, dy },
        _ => MouseZone::Corner { dx, dy },
    };
    Some((cell, zone))
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed-segment intersection test, collinear overlaps included.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

/// Whether the segment `from -> to` touches the square of `cell`.
pub fn segment_crosses_cell(settings: &GridSettings, from: Point, to: Point, cell: Cell) -> bool {
    if is_point_in_cell(settings, from, cell) || is_point_in_cell(settings, to, cell) {
        return true;
    }
    let left = settings.min_x + f64::from(cell.x) * settings.step();
    let bottom = settings.min_y + f64::from(cell.y) * settings.step();
    let (right, top) = (left + settings.step(), bottom + settings.step());
    let corners = [
        Point::new(left, bottom),
        Point::new(right, bottom),
        Point::new(right, top),
        Point::new(left, top),
    ];
    (0..4).any(|i| segments_intersect(from, to, corners[i], corners[(i + 1) % 4]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> GridSettings {
        GridSettings::new(8, 10.0)
    }

    #[test]
    fn cell_for_position_floors_pixels() {
        let settings = settings();
        assert_eq!(cell_for_position(&settings, Some(Point::new(0.0, 0.0))), Some(Cell::new(0, 0)));
        assert_eq!(cell_for_position(&settings, Some(Point::new(19.9, 30.0))), Some(Cell::new(1, 3)));
        assert_eq!(cell_for_position(&settings, Some(Point::new(-0.1, 5.0))), Some(Cell::new(-1, 0)));
        assert_eq!(cell_for_position(&settings, None), None);
    }

    #[test]
    fn point_for_cell_is_inverse_of_cell_for_position() {
        let settings = settings().with_origin(100.0, 100.0);
        for cell in [Cell::new(0, 0), Cell::new(3, 5), Cell::new(7, 7)] {
            let center = point_for_cell(cell, 100.0, 10.0, 5.0);
            assert_eq!(center, center_of_cell(&settings, cell));
            assert_eq!(cell_for_position(&settings, Some(center)), Some(cell));
        }
    }

    #[test]
    fn cells_around_centroid_recover_large_footprint() {
        let settings = settings();
        let anchor = Cell::new(4, 6);
        let centroid = unit_position(&settings, anchor, UnitSize::Large);
        let cells = cells_around_point(&settings, centroid);
        assert_eq!(cells, large_footprint(anchor).to_vec());
        assert_eq!(anchor_of(&cells), Some(anchor));
    }

    #[test]
    fn cells_around_board_corner_are_gated_by_edges() {
        let settings = settings();
        assert_eq!(cells_around_point(&settings, Point::new(0.0, 0.0)), vec![Cell::new(0, 0)]);
        assert_eq!(cells_around_point(&settings, Point::new(80.0, 80.0)), vec![Cell::new(7, 7)]);
        assert_eq!(cells_around_point(&settings, Point::new(40.0, 0.0)).len(), 2);
    }

    #[test]
    fn diagonal_steps_cost_sqrt_two_unless_flying() {
        assert_eq!(step_cost(1, 0, false), 1.0);
        assert_eq!(step_cost(1, 1, false), SQRT_2);
        assert_eq!(step_cost(-1, 1, true), 1.0);
    }

    #[test]
    fn mouse_zone_splits_cell_into_center_edges_and_corners() {
        let settings = GridSettings::new(8, 60.0);
        let center = center_of_cell(&settings, Cell::new(2, 2));
        let at = |dx: f64, dy: f64| mouse_zone(&settings, Point::new(center.x + dx, center.y + dy));
        assert_eq!(at(0.0, 0.0), Some((Cell::new(2, 2), MouseZone::Center)));
        assert_eq!(at(9.0, -9.0), Some((Cell::new(2, 2), MouseZone::Center)));
        assert_eq!(at(20.0, 0.0), Some((Cell::new(2, 2), MouseZone::Edge { dx: 1, dy: 0 })));
        assert_eq!(at(0.0, -20.0), Some((Cell::new(2, 2), MouseZone::Edge { dx: 0, dy: -1 })));
        assert_eq!(at(-20.0, 20.0), Some((Cell::new(2, 2), MouseZone::Corner { dx: -1, dy: 1 })));
        assert_eq!(mouse_zone(&settings, Point::new(-5.0, 5.0)), None);
    }

    #[test]
    fn segment_helpers_detect_crossings() {
        let settings = settings();
        let a = Point::new(5.0, 5.0);
        let b = Point::new(35.0, 5.0);
        assert!(segment_crosses_cell(&settings, a, b, Cell::new(2, 0)));
        assert!(!segment_crosses_cell(&settings, a, b, Cell::new(2, 1)));
        assert!(segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0)
        ));
        assert!(!segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.5),
            Point::new(3.0, 4.0)
        ));
    }

    #[test]
    fn footprints_extend_left_and_down_from_anchor() {
        assert_eq!(footprint(Cell::new(3, 3), UnitSize::Small), vec![Cell::new(3, 3)]);
        assert_eq!(
            footprint(Cell::new(3, 3), UnitSize::Large),
            vec![Cell::new(3, 3), Cell::new(2, 3), Cell::new(3, 2), Cell::new(2, 2)]
        );
        assert_eq!(chebyshev(Cell::new(0, 0), Cell::new(2, -1)), 2);
        assert_eq!(neighbors8(Cell::new(0, 0)).len(), 8);
    }
}
