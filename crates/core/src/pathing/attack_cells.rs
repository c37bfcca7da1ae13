//! Cells an attacker may strike enemies from, given where it can move this turn.

use std::collections::{BTreeMap, BTreeSet};
use std::iter;

use tracing::debug;

use super::octant::Octant;
use super::search::MovePath;
use super::PathHelper;
use crate::geometry::{chebyshev, large_footprint};
use crate::types::{Cell, UnitId, UnitSize};
use crate::units::Unit;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackTargets {
    /// Attackable enemies in discovery order.
    pub units: Vec<UnitId>,
    pub unit_ids: BTreeSet<UnitId>,
    /// Cells the attacker may strike from, in discovery order.
    pub attack_cells: Vec<Cell>,
    pub attack_cell_set: BTreeSet<Cell>,
    /// Large attackers only: attack cell -> footprint placed there, anchor first.
    pub large_cells: BTreeMap<Cell, Vec<Cell>>,
}

impl AttackTargets {
    pub fn can_attack(&self, unit: UnitId) -> bool {
        self.unit_ids.contains(&unit)
    }

    pub fn is_attack_cell(&self, cell: Cell) -> bool {
        self.attack_cell_set.contains(&cell)
    }

    fn record(&mut self, unit: UnitId, cell: Cell) {
        if self.unit_ids.insert(unit) {
            self.units.push(unit);
        }
        if self.attack_cell_set.insert(cell) {
            self.attack_cells.push(cell);
        }
    }
}

impl PathHelper {
    /// Enemies within `attacker.attack_range` of some cell the attacker can occupy this
    /// turn, and the cells it would strike them from.
    pub fn attack_targets(
        &self,
        attacker: &Unit,
        move_path: &MovePath,
        enemies: &[Unit],
    ) -> AttackTargets {
        let mut targets = AttackTargets::default();
        let enemies: Vec<&Unit> =
            enemies.iter().filter(|enemy| enemy.team != attacker.team).collect();
        match attacker.size {
            UnitSize::Small => small_attack_cells(attacker, move_path, &enemies, &mut targets),
            UnitSize::Large => large_attack_cells(attacker, move_path, &enemies, &mut targets),
        }
        debug!(
            attacker = %attacker.name,
            enemies = targets.units.len(),
            cells = targets.attack_cells.len(),
            "attack targets derived"
        );
        targets
    }
}

fn small_attack_cells(
    attacker: &Unit,
    move_path: &MovePath,
    enemies: &[&Unit],
    targets: &mut AttackTargets,
) {
    let range = attacker.attack_range;
    let candidates: Vec<Cell> =
        iter::once(attacker.cell).chain(move_path.cells.iter().copied()).collect();
    for enemy in enemies {
        let enemy_cells = enemy.cells();
        for candidate in &candidates {
            if enemy_cells.iter().any(|cell| chebyshev(*candidate, *cell) <= range) {
                targets.record(enemy.id, *candidate);
            }
        }
    }
}

fn large_attack_cells(
    attacker: &Unit,
    move_path: &MovePath,
    enemies: &[&Unit],
    targets: &mut AttackTargets,
) {
    let own = attacker.cells();
    let occupied: BTreeSet<Cell> = enemies.iter().flat_map(|enemy| enemy.cells()).collect();
    let reachable = |cell: &Cell| move_path.contains(*cell) || own.contains(cell);
    let anchor_known =
        |anchor: Cell| anchor == attacker.cell || move_path.known_paths.contains_key(&anchor);
    let range = attacker.attack_range as i32;

    for enemy in enemies {
        for target in enemy.cells() {
            for dy in -range..=range {
                for dx in -range..=range {
                    let Some(octant) = Octant::from_offset(dx, dy) else {
                        continue;
                    };
                    let candidate = target.offset(dx, dy);
                    if occupied.contains(&candidate) {
                        continue;
                    }
                    let placement = octant.anchor_offsets().iter().find_map(|&(ox, oy)| {
                        let anchor = candidate.offset(ox, oy);
                        let cells = large_footprint(anchor);
                        let fits = anchor_known(anchor)
                            && cells.iter().all(|cell| reachable(cell) && !occupied.contains(cell));
                        fits.then(|| cells.to_vec())
                    });
                    if let Some(cells) = placement {
                        targets.record(enemy.id, candidate);
                        targets.large_cells.entry(candidate).or_insert(cells);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FirstPick, board_from_art, helper, with_ids};
    use crate::types::Team;

    #[test]
    fn small_attacker_strikes_from_reachable_neighbors() {
        let board = board_from_art(&[".....", "..U..", ".....", ".....", "L...."]);
        let units = with_ids(vec![
            Unit::new("scout", Team::Lower, Cell::new(0, 0)).with_steps(3.0),
            Unit::new("guard", Team::Upper, Cell::new(2, 3)),
        ]);
        let path_helper = helper(5);
        let path = path_helper.get_move_path(&units[0].move_query(3.0), &board, None, &mut FirstPick);
        let targets = path_helper.attack_targets(&units[0], &path, &units[1..]);

        assert!(targets.can_attack(units[1].id));
        assert!(targets.is_attack_cell(Cell::new(1, 2)));
        assert!(!targets.is_attack_cell(Cell::new(0, 0)), "origin is out of reach");
        for cell in &targets.attack_cells {
            assert!(path.contains(*cell));
            assert_eq!(chebyshev(*cell, Cell::new(2, 3)), 1);
        }
        assert!(targets.large_cells.is_empty());
    }

    #[test]
    fn adjacent_attacker_can_strike_without_moving() {
        let board = board_from_art(&["...", ".U.", "L.."]);
        let units = with_ids(vec![
            Unit::new("scout", Team::Lower, Cell::new(0, 0)),
            Unit::new("guard", Team::Upper, Cell::new(1, 1)),
        ]);
        let path = helper(3).get_move_path(&units[0].move_query(0.0), &board, None, &mut FirstPick);
        let targets = helper(3).attack_targets(&units[0], &path, &units);
        assert_eq!(targets.attack_cells, vec![Cell::new(0, 0)]);
        assert_eq!(targets.units, vec![units[1].id]);
    }

    #[test]
    fn large_attacker_places_footprint_away_from_target() {
        let board = board_from_art(&["......", "......", "..U...", "......", ".....L", "......"]);
        let units = with_ids(vec![
            Unit::new("ogre", Team::Lower, Cell::new(5, 1)).large().with_steps(6.0),
            Unit::new("guard", Team::Upper, Cell::new(2, 3)),
        ]);
        let path_helper = helper(6);
        let path = path_helper.get_move_path(&units[0].move_query(6.0), &board, None, &mut FirstPick);
        let targets = path_helper.attack_targets(&units[0], &path, &units[1..]);

        assert!(targets.can_attack(units[1].id));
        let east = targets.large_cells.get(&Cell::new(3, 3)).unwrap();
        assert_eq!(east[0], Cell::new(4, 3), "east placement anchors one column right");
        for (cell, placed) in &targets.large_cells {
            assert!(placed.contains(cell));
            assert!(!placed.contains(&Cell::new(2, 3)));
            assert!(path.known_paths.contains_key(&placed[0]) || placed[0] == units[0].cell);
        }
    }
}
