//! Budgeted weighted search over the board.
//!
//! Arrivals are popped in weight order from a binary heap. A cell may settle more than
//! one arrival: a heavier arrival that is shorter, or that has not yet paid its aggro
//! surcharge, can still reach cells the lightest one cannot afford. Equal-weight
//! alternatives are kept in the known-paths map and shuffled in through the caller's
//! [`RandomSource`].

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use tracing::{debug, warn};

use super::PathHelper;
use super::routes::{Capture, KnownPaths, WEIGHT_EPSILON, WeightedRoute, capture_route};
use crate::board::{AggroBoard, Board};
use crate::geometry::{DIRECTIONS, ORTHOGONAL, footprint, step_cost};
use crate::rng::RandomSource;
use crate::types::{Cell, CellContent, ObstacleKind, UnitSize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveQuery {
    pub origin: Cell,
    pub max_steps: f64,
    pub can_fly: bool,
    pub size: UnitSize,
}

/// Result of a reachability search.
///
/// For small units `cells` are the reachable destinations. For large units they are
/// every cell covered by some reachable anchor, while `known_paths` stays keyed by anchor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovePath {
    pub cells: Vec<Cell>,
    pub cell_set: BTreeSet<Cell>,
    pub known_paths: KnownPaths,
}

impl MovePath {
    pub fn is_empty(&self) -> bool {
        self.known_paths.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cell_set.contains(&cell)
    }

    pub fn best_route(&self, destination: Cell) -> Option<&WeightedRoute> {
        self.known_paths.get(&destination).and_then(|routes| routes.first())
    }

    pub fn destinations(&self) -> impl Iterator<Item = Cell> + '_ {
        self.known_paths.keys().copied()
    }
}

#[derive(Clone, Debug)]
struct FrontierNode {
    weight: f64,
    seq: u64,
    route: WeightedRoute,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierNode {}

impl Ord for FrontierNode {
    // Reversed so the max-heap pops the lightest node, oldest first on equal weight.
    fn cmp(&self, other: &Self) -> Ordering {
        other.weight.total_cmp(&self.weight).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Costs of an arrival that has already been expanded.
#[derive(Clone, Copy, Debug)]
struct Arrival {
    weight: f64,
    distance: f64,
    first_aggro_met: bool,
}

impl Arrival {
    fn of(route: &WeightedRoute) -> Self {
        Self { weight: route.weight, distance: route.distance, first_aggro_met: route.first_aggro_met }
    }

    /// Any continuation of `other` costs at least as much as the same continuation of
    /// `self`, in both weight and distance.
    fn covers(self, other: Self) -> bool {
        self.weight <= other.weight + WEIGHT_EPSILON
            && self.distance <= other.distance + WEIGHT_EPSILON
            && (self.first_aggro_met || !other.first_aggro_met)
    }
}

/// Whether a unit may enter `cell`. Its own footprint never blocks it.
pub(crate) fn passable(board: &Board, cell: Cell, can_fly: bool, own: &[Cell]) -> bool {
    if own.contains(&cell) {
        return board.contains(cell);
    }
    match board.content(cell) {
        Some(CellContent::Empty) => true,
        Some(CellContent::Obstacle(kind)) => can_fly && kind.is_flyable(),
        Some(CellContent::Unit(_) | CellContent::Unknown(_)) | None => false,
    }
}

/// Whether a unit may end its move with its footprint anchored at `anchor`.
pub(crate) fn can_stand(board: &Board, anchor: Cell, size: UnitSize, own: &[Cell]) -> bool {
    footprint(anchor, size)
        .iter()
        .all(|cell| own.contains(cell) || board.content(*cell) == Some(CellContent::Empty))
}

/// Solid cells pinch diagonal moves; ground hazards do not.
fn pinches(board: &Board, cell: Cell, own: &[Cell]) -> bool {
    if own.contains(&cell) {
        return false;
    }
    matches!(
        board.content(cell),
        Some(
            CellContent::Unit(_)
                | CellContent::Unknown(_)
                | CellContent::Obstacle(ObstacleKind::Block)
        ) | None
    )
}

fn can_step(board: &Board, own: &[Cell], from: Cell, (dx, dy): (i32, i32), query: &MoveQuery) -> bool {
    let to = from.offset(dx, dy);
    if !footprint(to, query.size).iter().all(|cell| passable(board, *cell, query.can_fly, own)) {
        return false;
    }
    if dx == 0 || dy == 0 || query.can_fly {
        return true;
    }
    footprint(from, query.size)
        .iter()
        .all(|cell| !(pinches(board, cell.offset(dx, 0), own) && pinches(board, cell.offset(0, dy), own)))
}

/// Aggro is paid once per route, on the first step that enters a threatened footprint.
fn step_weight(
    aggro: Option<&AggroBoard>,
    current: &WeightedRoute,
    next: Cell,
    size: UnitSize,
    distance: f64,
) -> (f64, bool) {
    let Some(aggro) = aggro else {
        return (distance, current.first_aggro_met);
    };
    if current.first_aggro_met {
        return (distance, true);
    }
    let multiplier = footprint(next, size)
        .iter()
        .map(|cell| aggro.multiplier(*cell))
        .fold(1.0, f64::max);
    if multiplier > 1.0 { (distance * multiplier, true) } else { (distance, false) }
}

fn leaves_hazard_free(board: &Board, anchor: Cell, size: UnitSize, own: &[Cell]) -> bool {
    footprint(anchor, size).iter().all(|cell| {
        own.contains(cell)
            || !matches!(
                board.content(*cell),
                Some(CellContent::Obstacle(
                    ObstacleKind::Lava | ObstacleKind::Water | ObstacleKind::Block
                ))
            )
    })
}

impl PathHelper {
    /// Every destination a unit can reach within `query.max_steps`, with the cheapest
    /// routes to each.
    ///
    /// The budget is paid in raw step length. Routes are ranked by weight, which is the
    /// same length scaled by `aggro` on the first threatened step. A cell is reachable
    /// whenever its shortest route fits the budget, and its recorded routes are the
    /// lightest among those that fit.
    pub fn get_move_path(
        &self,
        query: &MoveQuery,
        board: &Board,
        aggro: Option<&AggroBoard>,
        rng: &mut impl RandomSource,
    ) -> MovePath {
        let own = footprint(query.origin, query.size);
        if query.max_steps.is_nan()
            || query.max_steps < 0.0
            || !own.iter().all(|cell| board.contains(*cell))
        {
            debug!(origin = %query.origin, max_steps = query.max_steps, "move query rejected");
            return MovePath::default();
        }

        let mut known = KnownPaths::new();
        let mut settled: BTreeMap<Cell, Vec<Arrival>> = BTreeMap::new();
        let mut frontier = BinaryHeap::new();
        let origin_route = WeightedRoute::origin(query.origin);
        let mut seq = 0_u64;
        frontier.push(FrontierNode { weight: 0.0, seq, route: origin_route.clone() });

        // Each cell settles at most one arrival per distinct route length.
        let pop_limit = board.cell_count() * board.cell_count() * DIRECTIONS.len() + 1;
        let mut pops = 0_usize;
        let mut ties = 0_usize;
        while let Some(FrontierNode { route: current, .. }) = frontier.pop() {
            pops += 1;
            if pops > pop_limit {
                warn!(origin = %query.origin, pops, "search frontier exceeded its bound");
                break;
            }
            let cell = current.cell;
            if cell != query.origin && capture_route(&mut known, current.clone(), rng) == Capture::Tied {
                ties += 1;
            }
            let arrival = Arrival::of(&current);
            let arrivals = settled.entry(cell).or_default();
            if arrivals.iter().any(|kept| kept.covers(arrival)) {
                continue;
            }
            arrivals.push(arrival);

            for direction in DIRECTIONS {
                let next = cell.offset(direction.0, direction.1);
                if !can_step(board, &own, cell, direction, query) {
                    continue;
                }
                let distance = step_cost(direction.0, direction.1, query.can_fly);
                if current.distance + distance > query.max_steps + WEIGHT_EPSILON {
                    continue;
                }
                let (weight, aggro_met) = step_weight(aggro, &current, next, query.size, distance);
                let candidate = current.extended(next, distance, weight, aggro_met);
                let candidate_arrival = Arrival::of(&candidate);
                let outclassed = settled.get(&next).is_some_and(|kept| {
                    kept.iter().any(|kept| {
                        kept.covers(candidate_arrival)
                            && kept.weight < candidate_arrival.weight - WEIGHT_EPSILON
                    })
                });
                if outclassed {
                    continue;
                }
                seq += 1;
                frontier.push(FrontierNode { weight: candidate.weight, seq, route: candidate });
            }
        }

        if query.max_steps > 0.0 {
            add_closest_moves(query, board, aggro, &own, &origin_route, &mut known);
        }
        known.retain(|anchor, _| leaves_hazard_free(board, *anchor, query.size, &own));

        let cell_set: BTreeSet<Cell> = match query.size {
            UnitSize::Small => known.keys().copied().collect(),
            UnitSize::Large => {
                known.keys().flat_map(|anchor| footprint(*anchor, UnitSize::Large)).collect()
            }
        };
        debug!(
            origin = %query.origin,
            destinations = known.len(),
            cells = cell_set.len(),
            ties,
            "move path computed"
        );
        MovePath { cells: cell_set.iter().copied().collect(), cell_set, known_paths: known }
    }
}

/// Any positive budget allows at least one orthogonal step into open ground.
fn add_closest_moves(
    query: &MoveQuery,
    board: &Board,
    aggro: Option<&AggroBoard>,
    own: &[Cell],
    origin_route: &WeightedRoute,
    known: &mut KnownPaths,
) {
    for (dx, dy) in ORTHOGONAL {
        let next = query.origin.offset(dx, dy);
        if known.contains_key(&next) {
            continue;
        }
        if !footprint(next, query.size).iter().all(|cell| passable(board, *cell, query.can_fly, own)) {
            continue;
        }
        let distance = step_cost(dx, dy, query.can_fly);
        let (weight, aggro_met) = step_weight(aggro, origin_route, next, query.size, distance);
        known.insert(next, vec![origin_route.extended(next, distance, weight, aggro_met)]);
    }
}
