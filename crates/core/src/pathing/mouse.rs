//! Resolves a hovered pixel position into the cell an attack would be launched from.

use tracing::trace;

use super::PathHelper;
use super::attack_cells::AttackTargets;
use super::routes::WEIGHT_EPSILON;
use crate::geometry::{MouseZone, center_of_cell, chebyshev, mouse_zone};
use crate::rng::RandomSource;
use crate::types::{Cell, Point, Team, UnitSize};

/// Which part of a defender cell the mouse is over.
///
/// `A` and `B` are the two diagonal corner kinds, `C` a left or right edge and `D` a
/// top or bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackPoint {
    A,
    B,
    C,
    D,
}

impl AttackPoint {
    pub fn for_zone(zone: MouseZone) -> Option<(AttackPoint, i32, i32)> {
        match zone {
            MouseZone::Center => None,
            MouseZone::Corner { dx, dy } if dx * dy > 0 => Some((AttackPoint::A, dx, dy)),
            MouseZone::Corner { dx, dy } => Some((AttackPoint::B, dx, dy)),
            MouseZone::Edge { dx, dy } if dy == 0 => Some((AttackPoint::C, dx, dy)),
            MouseZone::Edge { dx, dy } => Some((AttackPoint::D, dx, dy)),
        }
    }

    /// Offsets from the hovered defender cell, tried in order. The fallback order
    /// mirrors between teams so each side leans toward its own half of the board.
    pub const fn offsets(self, dx: i32, dy: i32, defender: Team) -> [(i32, i32); 3] {
        match (self, defender) {
            (AttackPoint::A, Team::Upper) | (AttackPoint::B, Team::Lower) => {
                [(dx, dy), (0, dy), (dx, 0)]
            }
            (AttackPoint::A, Team::Lower) | (AttackPoint::B, Team::Upper) => {
                [(dx, dy), (dx, 0), (0, dy)]
            }
            (AttackPoint::C, Team::Upper) => [(dx, 0), (dx, -1), (dx, 1)],
            (AttackPoint::C, Team::Lower) => [(dx, 0), (dx, 1), (dx, -1)],
            (AttackPoint::D, Team::Upper) => [(0, dy), (-1, dy), (1, dy)],
            (AttackPoint::D, Team::Lower) => [(0, dy), (1, dy), (-1, dy)],
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct MouseAttackQuery<'a> {
    pub mouse: Point,
    pub attacker_size: UnitSize,
    pub defender_cells: &'a [Cell],
    pub defender_team: Team,
}

impl PathHelper {
    /// Cell to attack from for the current mouse position, if any.
    ///
    /// For large attackers the answer is a cell of the footprint placed at the chosen
    /// attack cell, picked by its distance to the mouse.
    pub fn closest_attack_cell(
        &self,
        query: &MouseAttackQuery<'_>,
        targets: &AttackTargets,
        rng: &mut impl RandomSource,
    ) -> Option<Cell> {
        let (hovered, zone) = mouse_zone(&self.settings, query.mouse)?;
        if zone == MouseZone::Center && targets.is_attack_cell(hovered) {
            return Some(self.resolve_footprint(query, targets, hovered, false));
        }
        if !query.defender_cells.contains(&hovered) {
            return None;
        }
        let chosen = match AttackPoint::for_zone(zone) {
            None => {
                let around: Vec<Cell> = targets
                    .attack_cells
                    .iter()
                    .copied()
                    .filter(|cell| !query.defender_cells.contains(cell))
                    .filter(|cell| query.defender_cells.iter().any(|d| chebyshev(*cell, *d) == 1))
                    .collect();
                self.nearest_to_mouse(query.mouse, &around, rng)?
            }
            Some((point, dx, dy)) => point
                .offsets(dx, dy, query.defender_team)
                .into_iter()
                .map(|(ox, oy)| hovered.offset(ox, oy))
                .find(|cell| !query.defender_cells.contains(cell) && targets.is_attack_cell(*cell))?,
        };
        trace!(?zone, %hovered, %chosen, "mouse attack cell resolved");
        let is_corner = matches!(zone, MouseZone::Corner { .. });
        Some(self.resolve_footprint(query, targets, chosen, is_corner))
    }

    /// Corner hovers prefer the footprint cell furthest from the mouse so the unit's
    /// body lands behind the strike; everything else prefers the nearest.
    pub fn get_closest_attack_cell(&self, mouse: Point, cells: &[Cell], is_corner: bool) -> Option<Cell> {
        let mut ranked: Vec<(f64, Cell)> = cells
            .iter()
            .map(|cell| (center_of_cell(&self.settings, *cell).distance(mouse), *cell))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        if is_corner {
            ranked.reverse();
        }
        ranked.first().map(|(_, cell)| *cell)
    }

    fn resolve_footprint(
        &self,
        query: &MouseAttackQuery<'_>,
        targets: &AttackTargets,
        cell: Cell,
        is_corner: bool,
    ) -> Cell {
        if query.attacker_size != UnitSize::Large {
            return cell;
        }
        targets
            .large_cells
            .get(&cell)
            .and_then(|placed| self.get_closest_attack_cell(query.mouse, placed, is_corner))
            .unwrap_or(cell)
    }

    fn nearest_to_mouse(&self, mouse: Point, cells: &[Cell], rng: &mut impl RandomSource) -> Option<Cell> {
        let distances: Vec<f64> = cells
            .iter()
            .map(|cell| center_of_cell(&self.settings, *cell).distance(mouse))
            .collect();
        let best = distances.iter().copied().fold(f64::INFINITY, f64::min);
        let tied: Vec<Cell> = cells
            .iter()
            .zip(&distances)
            .filter(|(_, distance)| **distance <= best + WEIGHT_EPSILON)
            .map(|(cell, _)| *cell)
            .collect();
        if tied.is_empty() {
            return None;
        }
        let pick = rng.next_int(0, tied.len() as i32 - 1) as usize;
        tied.get(pick).copied()
    }
}
