//! Cells an attacker has to stand on to strike a target in melee.

use crate::geometry::DIRECTIONS;
use crate::types::{Cell, UnitSize};

/// Ring around a 2x2 target anchored at the origin.
const SMALL_ON_LARGE: [(i32, i32); 12] = [
    (-2, 1),
    (-1, 1),
    (0, 1),
    (1, 1),
    (-2, 0),
    (1, 0),
    (-2, -1),
    (1, -1),
    (-2, -2),
    (-1, -2),
    (0, -2),
    (1, -2),
];

/// Anchors of 2x2 attackers sharing an edge with a single-cell target.
/// South first, then west, north and east.
const LARGE_ON_SMALL: [(i32, i32); 8] =
    [(0, -1), (1, -1), (-1, 0), (-1, 1), (0, 2), (1, 2), (2, 0), (2, 1)];

/// Anchors of 2x2 attackers sharing an edge with a 2x2 target.
const LARGE_ON_LARGE: [(i32, i32); 12] = [
    (-1, -2),
    (0, -2),
    (1, -2),
    (-2, -1),
    (-2, 0),
    (-2, 1),
    (-1, 2),
    (0, 2),
    (1, 2),
    (2, -1),
    (2, 0),
    (2, 1),
];

/// Where an attacker of `attacker` size may anchor to hit the target anchored at `target`.
pub fn cells_for_attacker(target: Cell, attacker: UnitSize, defender: UnitSize) -> Vec<Cell> {
    let offsets: &[(i32, i32)] = match (attacker, defender) {
        (UnitSize::Small, UnitSize::Small) => &DIRECTIONS,
        (UnitSize::Small, UnitSize::Large) => &SMALL_ON_LARGE,
        (UnitSize::Large, UnitSize::Small) => &LARGE_ON_SMALL,
        (UnitSize::Large, UnitSize::Large) => &LARGE_ON_LARGE,
    };
    offsets.iter().map(|&(dx, dy)| target.offset(dx, dy)).collect()
}
