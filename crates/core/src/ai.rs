//! Computer-controlled unit decisions.
//! This module exists to turn a board snapshot into one action for one unit.
//! It does not apply the action; the battlefield commits moves.

mod adjacency;
mod aggro;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

pub use adjacency::cells_for_attacker;
pub use aggro::aggro_board;

use crate::board::Board;
use crate::config::AiConfig;
use crate::geometry::{chebyshev, footprint, step_cost};
use crate::pathing::{KnownPaths, PathHelper, WEIGHT_EPSILON, WeightedRoute, can_stand};
use crate::rng::RandomSource;
use crate::types::{AttackType, Cell, CellContent, UnitSize};
use crate::units::Unit;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiActionType {
    MAttack,
    RAttack,
    Move,
    MoveAndMAttack,
    Wait,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AiAction {
    pub action_type: AiActionType,
    pub cell_to_move: Option<Cell>,
    pub cell_to_attack: Option<Cell>,
    #[serde(skip)]
    pub known_paths: KnownPaths,
}

impl AiAction {
    pub fn wait() -> Self {
        Self {
            action_type: AiActionType::Wait,
            cell_to_move: None,
            cell_to_attack: None,
            known_paths: KnownPaths::new(),
        }
    }

    /// Route the unit would follow to `cell_to_move`.
    pub fn route(&self) -> Option<&WeightedRoute> {
        let destination = self.cell_to_move?;
        self.known_paths.get(&destination).and_then(|routes| routes.first())
    }
}

struct Approach {
    route: WeightedRoute,
    target_cells: Vec<Cell>,
}

/// Picks the nearest reachable enemy and decides how `unit` engages it this turn.
///
/// `matrix` is the board with its top row first and `units` lists every unit on it.
/// Returns `None` when the unit has nothing useful to do.
pub fn find_target(
    unit: &Unit,
    matrix: &[Vec<u8>],
    units: &[Unit],
    path_helper: &PathHelper,
    config: &AiConfig,
    rng: &mut impl RandomSource,
) -> Option<AiAction> {
    let board = match Board::from_rows(matrix) {
        Ok(board) => board,
        Err(err) => {
            debug!(unit = %unit.name, %err, "matrix rejected");
            return None;
        }
    };
    let own = unit.cells();
    if !own.iter().all(|cell| board.contains(*cell)) {
        debug!(unit = %unit.name, cell = %unit.cell, "unit is off the board");
        return None;
    }

    let enemy_team = unit.team.opponent();
    let enemies: Vec<&Unit> = units.iter().filter(|other| other.team == enemy_team).collect();
    let aggro = aggro_board(&board, &enemies, config);
    let budget = config.search_budget.unwrap_or(board.cell_count() as f64);
    let move_path =
        path_helper.get_move_path(&unit.move_query(budget), &board, Some(&aggro), rng);

    let mut closest: Option<Approach> = None;
    let mut seen_targets = BTreeSet::new();
    for cell in board.scan() {
        if board.content(cell) != Some(CellContent::Unit(enemy_team)) {
            continue;
        }
        let (anchor, size) = enemies
            .iter()
            .find(|enemy| enemy.occupies(cell))
            .map_or((cell, UnitSize::Small), |enemy| (enemy.cell, enemy.size));
        if !seen_targets.insert(anchor) {
            continue;
        }
        let target_cells = footprint(anchor, size);
        let approaches = cells_for_attacker(anchor, unit.size, size);
        if approaches.contains(&unit.cell) {
            let cell_to_attack = nearest_cell(&own, &target_cells)?;
            debug!(unit = %unit.name, target = %cell_to_attack, "attacking in place");
            return Some(AiAction {
                action_type: AiActionType::MAttack,
                cell_to_move: None,
                cell_to_attack: Some(cell_to_attack),
                known_paths: move_path.known_paths,
            });
        }
        for stand in approaches {
            let Some(route) = move_path.best_route(stand) else {
                continue;
            };
            let better = closest
                .as_ref()
                .is_none_or(|best| route.weight < best.route.weight - WEIGHT_EPSILON);
            if better {
                closest =
                    Some(Approach { route: route.clone(), target_cells: target_cells.clone() });
            }
        }
    }

    let Some(Approach { route, target_cells }) = closest else {
        debug!(unit = %unit.name, "no reachable enemy");
        return None;
    };
    let stand_cells = footprint(route.cell, unit.size);
    let cell_to_attack = nearest_cell(&stand_cells, &target_cells)?;
    let known_paths = move_path.known_paths;

    if unit.attack_type == AttackType::Range {
        debug!(unit = %unit.name, target = %cell_to_attack, "ranged attack");
        return Some(AiAction {
            action_type: AiActionType::RAttack,
            cell_to_move: None,
            cell_to_attack: Some(cell_to_attack),
            known_paths,
        });
    }

    let mut stop = route.furthest_within(unit.steps);
    while stop > 0
        && (route.route[stop] == unit.cell || !can_stand(&board, route.route[stop], unit.size, &own))
    {
        stop -= 1;
    }
    // Nothing before the budget runs out can be stood on, such as a flyer still over water.
    if stop == 0 {
        debug!(unit = %unit.name, "no standable cell along the route");
        return None;
    }

    let strike = final_step(&stand_cells, &target_cells, unit.can_fly);
    let reaches_target = stop + 1 == route.route.len();
    let action = if reaches_target && route.distance + strike <= unit.steps + WEIGHT_EPSILON {
        AiAction {
            action_type: AiActionType::MoveAndMAttack,
            cell_to_move: Some(route.cell),
            cell_to_attack: Some(cell_to_attack),
            known_paths,
        }
    } else {
        AiAction {
            action_type: AiActionType::Move,
            cell_to_move: Some(route.route[stop]),
            cell_to_attack: None,
            known_paths,
        }
    };
    debug!(
        unit = %unit.name,
        action = ?action.action_type,
        to = ?action.cell_to_move,
        "action chosen"
    );
    Some(action)
}

/// Like [`find_target`], but waits instead of returning nothing.
pub fn decide(
    unit: &Unit,
    matrix: &[Vec<u8>],
    units: &[Unit],
    path_helper: &PathHelper,
    config: &AiConfig,
    rng: &mut impl RandomSource,
) -> AiAction {
    find_target(unit, matrix, units, path_helper, config, rng).unwrap_or_else(AiAction::wait)
}

/// Target cell closest to the attacker, first in footprint order on ties.
fn nearest_cell(from: &[Cell], target: &[Cell]) -> Option<Cell> {
    let distance =
        |cell: Cell| from.iter().map(|own| chebyshev(*own, cell)).min().unwrap_or(u32::MAX);
    target.iter().copied().reduce(|best, cell| if distance(cell) < distance(best) { cell } else { best })
}

/// Raw cost of the strike that follows the move: the cheapest step from the attacker's
/// footprint onto the target's.
fn final_step(from: &[Cell], target: &[Cell], can_fly: bool) -> f64 {
    from.iter()
        .flat_map(|own| target.iter().map(move |cell| (*own, *cell)))
        .filter(|(own, cell)| chebyshev(*own, *cell) == 1)
        .map(|(own, cell)| step_cost(cell.x - own.x, cell.y - own.y, can_fly))
        .fold(f64::INFINITY, f64::min)
}
