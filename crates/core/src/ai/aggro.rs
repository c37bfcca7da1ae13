//! Threat overlay the AI routes against.

use std::collections::BTreeSet;

use crate::board::{AggroBoard, Board};
use crate::config::AiConfig;
use crate::types::AttackType;
use crate::units::Unit;

/// Cells each enemy can strike next turn get `aggro_per_threat` added once per enemy.
/// Melee threat reaches adjacent cells; ranged and magic threat reaches `attack_range`.
pub fn aggro_board(board: &Board, enemies: &[&Unit], config: &AiConfig) -> AggroBoard {
    let mut aggro = AggroBoard::new(board.size());
    for enemy in enemies {
        let reach = match enemy.attack_type {
            AttackType::Melee => 1,
            AttackType::Range | AttackType::Magic => enemy.attack_range.max(1) as i32,
        };
        let own = enemy.cells();
        let mut threatened = BTreeSet::new();
        for cell in &own {
            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    let candidate = cell.offset(dx, dy);
                    if board.contains(candidate) && !own.contains(&candidate) {
                        threatened.insert(candidate);
                    }
                }
            }
        }
        for cell in threatened {
            aggro.add(cell, config.aggro_per_threat);
        }
    }
    aggro
}
