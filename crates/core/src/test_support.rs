//! Shared fixtures for the unit test suites.
//! This module exists to avoid repeating board and unit setup across many tests.
//! It does not own production logic.

use slotmap::SlotMap;

use crate::board::Board;
use crate::config::GridSettings;
use crate::pathing::PathHelper;
use crate::rng::RandomSource;
use crate::types::{BLOCK, EMPTY, HOLE, LAVA, Team, UnitId, WATER};
use crate::units::Unit;

/// Always picks the lowest index, so tie handling is predictable in assertions.
pub(crate) struct FirstPick;

impl RandomSource for FirstPick {
    fn next_int(&mut self, min: i32, _max: i32) -> i32 {
        min
    }
}

pub(crate) fn helper(size: i32) -> PathHelper {
    PathHelper::new(GridSettings::new(size, 60.0))
}

/// Board drawn top row first: `.` empty, `L`/`U` team markers, `#` block, `o` hole,
/// `~` water, `^` lava.
pub(crate) fn board_from_art(rows: &[&str]) -> Board {
    let rows: Vec<Vec<u8>> = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|glyph| match glyph {
                    'L' => Team::Lower.marker(),
                    'U' => Team::Upper.marker(),
                    '#' => BLOCK,
                    'o' => HOLE,
                    '~' => WATER,
                    '^' => LAVA,
                    _ => EMPTY,
                })
                .collect()
        })
        .collect();
    match Board::from_rows(&rows) {
        Ok(board) => board,
        Err(err) => panic!("fixture board is malformed: {err}"),
    }
}

/// Gives each unit a distinct id.
pub(crate) fn with_ids(units: Vec<Unit>) -> Vec<Unit> {
    let mut keys: SlotMap<UnitId, ()> = SlotMap::with_key();
    units.into_iter().map(|unit| unit.with_id(keys.insert(()))).collect()
}
