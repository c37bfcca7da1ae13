//! Stable snapshot hashing for deterministic verification.
//! This module exists so seeded searches and AI decisions can be compared across runs.
//! It does not hash tie order inside a known-paths group, only the best weights.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use crate::ai::{AiAction, AiActionType};
use crate::pathing::{KnownPaths, MovePath};
use crate::types::Cell;

fn quantize(value: f64) -> i64 {
    (value * 1e6).round() as i64
}

fn write_cell(hasher: &mut Xxh3, cell: Cell) {
    hasher.write_i32(cell.x);
    hasher.write_i32(cell.y);
}

fn write_optional_cell(hasher: &mut Xxh3, cell: Option<Cell>) {
    match cell {
        Some(cell) => {
            hasher.write_u8(1);
            write_cell(hasher, cell);
        }
        None => hasher.write_u8(0),
    }
}

fn write_known_paths(hasher: &mut Xxh3, known_paths: &KnownPaths) {
    hasher.write_u64(known_paths.len() as u64);
    for (destination, routes) in known_paths {
        write_cell(hasher, *destination);
        if let Some(best) = routes.first() {
            hasher.write_i64(quantize(best.weight));
            hasher.write_i64(quantize(best.distance));
        }
    }
}

pub fn snapshot_hash(move_path: &MovePath) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.write_u64(move_path.cell_set.len() as u64);
    for cell in &move_path.cell_set {
        write_cell(&mut hasher, *cell);
    }
    write_known_paths(&mut hasher, &move_path.known_paths);
    hasher.finish()
}

impl AiAction {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u8(match self.action_type {
            AiActionType::MAttack => 0,
            AiActionType::RAttack => 1,
            AiActionType::Move => 2,
            AiActionType::MoveAndMAttack => 3,
            AiActionType::Wait => 4,
        });
        write_optional_cell(&mut hasher, self.cell_to_move);
        write_optional_cell(&mut hasher, self.cell_to_attack);
        write_known_paths(&mut hasher, &self.known_paths);
        hasher.finish()
    }
}
