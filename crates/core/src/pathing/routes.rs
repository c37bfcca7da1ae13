//! Weighted routes and the tie-retaining known-paths map.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;

use crate::rng::RandomSource;
use crate::types::Cell;

/// Weights closer than this are treated as a tie.
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Destination cell -> cheapest known routes to it, all of equal weight.
pub type KnownPaths = BTreeMap<Cell, Vec<WeightedRoute>>;

/// One route from the search origin (`route[0]`) to `cell` (`route[last]`).
///
/// `distance` is what the step budget pays for; `weight` is the aggro-scaled cost
/// routes are ranked by. Both running sums are kept per route cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeightedRoute {
    pub cell: Cell,
    pub route: Vec<Cell>,
    pub cumulative_weight: Vec<f64>,
    pub cumulative_distance: Vec<f64>,
    pub weight: f64,
    pub distance: f64,
    pub first_aggro_met: bool,
}

impl WeightedRoute {
    pub fn origin(cell: Cell) -> Self {
        Self {
            cell,
            route: vec![cell],
            cumulative_weight: vec![0.0],
            cumulative_distance: vec![0.0],
            weight: 0.0,
            distance: 0.0,
            first_aggro_met: false,
        }
    }

    pub fn extended(
        &self,
        next: Cell,
        step_distance: f64,
        step_weight: f64,
        first_aggro_met: bool,
    ) -> Self {
        let weight = self.weight + step_weight;
        let distance = self.distance + step_distance;
        let mut route = self.route.clone();
        route.push(next);
        let mut cumulative_weight = self.cumulative_weight.clone();
        cumulative_weight.push(weight);
        let mut cumulative_distance = self.cumulative_distance.clone();
        cumulative_distance.push(distance);
        Self {
            cell: next,
            route,
            cumulative_weight,
            cumulative_distance,
            weight,
            distance,
            first_aggro_met,
        }
    }

    pub fn steps(&self) -> usize {
        self.route.len().saturating_sub(1)
    }

    /// Index of the last route cell whose running distance fits in `budget`.
    pub fn furthest_within(&self, budget: f64) -> usize {
        self.cumulative_distance
            .iter()
            .rposition(|distance| *distance <= budget + WEIGHT_EPSILON)
            .unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capture {
    /// First route to the cell, or strictly cheaper than every known one.
    Improved,
    /// Same weight as the known routes; joined the tie group.
    Tied,
    Rejected,
}

/// Records `route` for its destination.
///
/// Cheaper routes replace the group, equal-weight routes are inserted at a random
/// position inside it so repeated insertions do not favor the first one found.
pub fn capture_route(
    known: &mut KnownPaths,
    route: WeightedRoute,
    rng: &mut impl RandomSource,
) -> Capture {
    match known.entry(route.cell) {
        Entry::Vacant(entry) => {
            entry.insert(vec![route]);
            Capture::Improved
        }
        Entry::Occupied(mut entry) => {
            let group = entry.get_mut();
            let best = group.first().map_or(f64::INFINITY, |known| known.weight);
            if route.weight < best - WEIGHT_EPSILON {
                *group = vec![route];
                Capture::Improved
            } else if route.weight <= best + WEIGHT_EPSILON {
                if group.iter().any(|known| known.route == route.route) {
                    return Capture::Rejected;
                }
                let slot = rng.next_int(0, group.len() as i32) as usize;
                group.insert(slot.min(group.len()), route);
                Capture::Tied
            } else {
                Capture::Rejected
            }
        }
    }
}
