//! Reachability search, attack-cell derivation and mouse-driven attack resolution.
//! This module exists so player input and the AI share one notion of legal movement.
//! It does not mutate the board; committing a move belongs to the battlefield.

mod attack_cells;
mod mouse;
mod octant;
mod routes;
mod search;

pub use attack_cells::AttackTargets;
pub use mouse::{AttackPoint, MouseAttackQuery};
pub use octant::Octant;
pub use routes::{Capture, KnownPaths, WEIGHT_EPSILON, WeightedRoute, capture_route};
pub use search::{MovePath, MoveQuery};

pub(crate) use search::can_stand;

use crate::config::GridSettings;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathHelper {
    settings: GridSettings,
}

impl PathHelper {
    pub fn new(settings: GridSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }
}
