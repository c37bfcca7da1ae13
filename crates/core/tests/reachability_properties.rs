use hoc_core::geometry::{chebyshev, footprint, step_cost};
use hoc_core::{
    AggroBoard, BLOCK, Board, Cell, ChaChaSource, EMPTY, GridSettings, HOLE, LAVA, MoveQuery,
    PathHelper, Team, Unit, UnitSize, WATER, snapshot_hash,
};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

#[derive(Clone, Debug)]
struct Arena {
    board: Board,
    origin: Cell,
}

fn terrain(code: u8) -> u8 {
    match code {
        6 => BLOCK,
        7 => WATER,
        8 => LAVA,
        9 => HOLE,
        _ => EMPTY,
    }
}

fn arena() -> impl Strategy<Value = Arena> {
    (4_usize..=7)
        .prop_flat_map(|size| {
            (
                Just(size),
                prop::collection::vec(0_u8..10, size * size),
                0..size as i32,
                0..size as i32,
            )
        })
        .prop_map(|(size, codes, x, y)| {
            let mut board = Board::new(size);
            for (index, code) in codes.into_iter().enumerate() {
                let cell = Cell::new((index % size) as i32, (index / size) as i32);
                board.set(cell, terrain(code));
            }
            let origin = Cell::new(x, y);
            board.set(origin, Team::Lower.marker());
            Arena { board, origin }
        })
}

/// Roughly half the cells stay unthreatened so routes can still meet aggro late.
fn threatened_arena() -> impl Strategy<Value = (Arena, AggroBoard)> {
    arena()
        .prop_flat_map(|arena| {
            let size = arena.board.size();
            let multipliers =
                prop::collection::vec(prop_oneof![1 => Just(1.0_f64), 1 => 1.0_f64..3.0], size * size);
            (Just(arena), multipliers)
        })
        .prop_map(|(arena, multipliers)| {
            let size = arena.board.size();
            let mut aggro = AggroBoard::new(size);
            for (index, multiplier) in multipliers.into_iter().enumerate() {
                aggro.add(Cell::new((index % size) as i32, (index / size) as i32), multiplier - 1.0);
            }
            (arena, aggro)
        })
}

fn helper(board: &Board) -> PathHelper {
    PathHelper::new(GridSettings::new(board.size() as i32, 64.0))
}

fn small(origin: Cell, max_steps: f64, can_fly: bool) -> MoveQuery {
    MoveQuery { origin, max_steps, can_fly, size: UnitSize::Small }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn larger_budgets_reach_a_superset(
        arena in arena(),
        budget in 0.0_f64..6.0,
        extra in 0.0_f64..4.0,
        can_fly in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let helper = helper(&arena.board);
        let mut rng = ChaChaSource::seeded(seed);
        let near = helper.get_move_path(&small(arena.origin, budget, can_fly), &arena.board, None, &mut rng);
        let far = helper.get_move_path(&small(arena.origin, budget + extra, can_fly), &arena.board, None, &mut rng);
        prop_assert!(near.cell_set.is_subset(&far.cell_set));
        for (destination, routes) in &near.known_paths {
            let near_weight = routes.first().map_or(f64::INFINITY, |route| route.weight);
            let far_weight = far.best_route(*destination).map_or(f64::INFINITY, |route| route.weight);
            prop_assert!(far_weight <= near_weight + 1e-9);
        }
    }

    #[test]
    fn route_sums_match_their_steps(
        arena in arena(),
        budget in 0.0_f64..8.0,
        can_fly in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let helper = helper(&arena.board);
        let path = helper.get_move_path(
            &small(arena.origin, budget, can_fly),
            &arena.board,
            None,
            &mut ChaChaSource::seeded(seed),
        );
        for (destination, routes) in &path.known_paths {
            prop_assert!(!routes.is_empty());
            for route in routes {
                prop_assert_eq!(route.route.first(), Some(&arena.origin));
                prop_assert_eq!(route.route.last(), Some(destination));
                prop_assert_eq!(route.cumulative_distance.len(), route.route.len());
                prop_assert_eq!(route.cumulative_weight.len(), route.route.len());
                let mut total = 0.0;
                for (i, pair) in route.route.windows(2).enumerate() {
                    prop_assert_eq!(chebyshev(pair[0], pair[1]), 1);
                    total += step_cost(pair[1].x - pair[0].x, pair[1].y - pair[0].y, can_fly);
                    prop_assert!((route.cumulative_distance[i + 1] - total).abs() < 1e-9);
                }
                prop_assert!((route.distance - total).abs() < 1e-9);
                prop_assert!((route.weight - route.distance).abs() < 1e-9, "no aggro means weight is distance");
                prop_assert!(route.distance <= budget.max(1.0) + 1e-9);
                prop_assert!((route.weight - routes[0].weight).abs() < 1e-9, "tie groups share a weight");
            }
        }
    }

    #[test]
    fn larger_budgets_reach_a_superset_under_aggro(
        (arena, aggro) in threatened_arena(),
        budget in 0.0_f64..6.0,
        extra in 0.0_f64..4.0,
        can_fly in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let helper = helper(&arena.board);
        let mut rng = ChaChaSource::seeded(seed);
        let near = helper.get_move_path(&small(arena.origin, budget, can_fly), &arena.board, Some(&aggro), &mut rng);
        let far = helper.get_move_path(&small(arena.origin, budget + extra, can_fly), &arena.board, Some(&aggro), &mut rng);
        prop_assert!(near.cell_set.is_subset(&far.cell_set), "near {:?} far {:?}", near.cell_set, far.cell_set);
        for (destination, routes) in &near.known_paths {
            let near_weight = routes.first().map_or(f64::INFINITY, |route| route.weight);
            let far_weight = far.best_route(*destination).map_or(f64::INFINITY, |route| route.weight);
            prop_assert!(far_weight <= near_weight + 1e-9, "{destination}: {far_weight} > {near_weight}");
        }
    }

    #[test]
    fn aggro_routes_pay_one_surcharge(
        (arena, aggro) in threatened_arena(),
        budget in 0.0_f64..8.0,
        can_fly in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let helper = helper(&arena.board);
        let path = helper.get_move_path(
            &small(arena.origin, budget, can_fly),
            &arena.board,
            Some(&aggro),
            &mut ChaChaSource::seeded(seed),
        );
        for routes in path.known_paths.values() {
            for route in routes {
                let mut weight = 0.0;
                let mut met = false;
                for (i, pair) in route.route.windows(2).enumerate() {
                    let distance = step_cost(pair[1].x - pair[0].x, pair[1].y - pair[0].y, can_fly);
                    let multiplier = aggro.multiplier(pair[1]);
                    if !met && multiplier > 1.0 {
                        weight += distance * multiplier;
                        met = true;
                    } else {
                        weight += distance;
                    }
                    prop_assert!((route.cumulative_weight[i + 1] - weight).abs() < 1e-9);
                }
                prop_assert!((route.weight - weight).abs() < 1e-9, "{} != {weight}", route.weight);
                prop_assert_eq!(route.first_aggro_met, met);
                prop_assert!(route.weight + 1e-9 >= route.distance);
                prop_assert!(
                    route.distance <= budget + 1e-9 || route.steps() == 1,
                    "{} exceeds {budget}",
                    route.distance
                );
            }
        }
    }

    #[test]
    fn walkers_never_squeeze_between_blocks(
        arena in arena(),
        budget in 1.0_f64..8.0,
        seed in any::<u64>(),
    ) {
        let helper = helper(&arena.board);
        let path = helper.get_move_path(
            &small(arena.origin, budget, false),
            &arena.board,
            None,
            &mut ChaChaSource::seeded(seed),
        );
        for routes in path.known_paths.values() {
            for route in routes {
                for pair in route.route.windows(2) {
                    let (dx, dy) = (pair[1].x - pair[0].x, pair[1].y - pair[0].y);
                    if dx != 0 && dy != 0 {
                        let side_a = arena.board.value(pair[0].offset(dx, 0));
                        let side_b = arena.board.value(pair[0].offset(0, dy));
                        prop_assert!(!(side_a == Some(BLOCK) && side_b == Some(BLOCK)));
                    }
                    prop_assert_ne!(arena.board.value(pair[1]), Some(BLOCK));
                    prop_assert_ne!(arena.board.value(pair[1]), Some(HOLE));
                }
            }
        }
        for cell in &path.cells {
            let value = arena.board.value(*cell);
            prop_assert!(value == Some(EMPTY), "destination {cell} holds {value:?}");
        }
    }

    #[test]
    fn large_footprints_and_cells_agree(
        arena in arena(),
        budget in 0.0_f64..6.0,
        seed in any::<u64>(),
    ) {
        let mut board = arena.board.clone();
        let anchor = Cell::new(arena.origin.x.max(1), arena.origin.y.max(1));
        for cell in footprint(anchor, UnitSize::Large) {
            board.set(cell, Team::Lower.marker());
        }
        let query = MoveQuery { origin: anchor, max_steps: budget, can_fly: false, size: UnitSize::Large };
        let path = helper(&board).get_move_path(&query, &board, None, &mut ChaChaSource::seeded(seed));
        for destination in path.destinations() {
            for cell in footprint(destination, UnitSize::Large) {
                prop_assert!(path.contains(cell));
            }
        }
        for cell in &path.cells {
            let covered = path
                .destinations()
                .any(|destination| footprint(destination, UnitSize::Large).contains(cell));
            prop_assert!(covered, "{cell} is not covered by any reachable anchor");
        }
    }

    #[test]
    fn fixed_seed_searches_are_repeatable(
        arena in arena(),
        budget in 0.0_f64..8.0,
        seed in any::<u64>(),
    ) {
        let helper = helper(&arena.board);
        let query = small(arena.origin, budget, false);
        let first = helper.get_move_path(&query, &arena.board, None, &mut ChaChaSource::seeded(seed));
        let second = helper.get_move_path(&query, &arena.board, None, &mut ChaChaSource::seeded(seed));
        prop_assert_eq!(snapshot_hash(&first), snapshot_hash(&second));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn attack_cells_are_reachable_and_in_range(
        arena in arena(),
        budget in 0.0_f64..6.0,
        range in 1_u32..=3,
        enemy_x in 0_i32..7,
        enemy_y in 0_i32..7,
        seed in any::<u64>(),
    ) {
        let mut board = arena.board.clone();
        let size = board.size() as i32;
        let enemy_cell = Cell::new(enemy_x % size, enemy_y % size);
        prop_assume!(enemy_cell != arena.origin);
        board.set(enemy_cell, Team::Upper.marker());

        let attacker = Unit::new("attacker", Team::Lower, arena.origin).ranged(range);
        let enemy = Unit::new("enemy", Team::Upper, enemy_cell);
        let helper = helper(&board);
        let path = helper.get_move_path(
            &attacker.move_query(budget),
            &board,
            None,
            &mut ChaChaSource::seeded(seed),
        );
        let targets = helper.attack_targets(&attacker, &path, &[enemy]);
        for cell in &targets.attack_cells {
            prop_assert!(*cell == arena.origin || path.contains(*cell));
            prop_assert!(chebyshev(*cell, enemy_cell) <= range);
        }
        let in_place = chebyshev(arena.origin, enemy_cell) <= range;
        prop_assert_eq!(in_place, targets.is_attack_cell(arena.origin));
    }
}
