pub mod ai;
pub mod battlefield;
pub mod board;
pub mod config;
pub mod error;
pub mod geometry;
pub mod hash;
pub mod pathing;
pub mod rng;
pub mod scenario;
pub mod types;
pub mod units;

#[cfg(test)]
mod test_support;

pub use ai::{AiAction, AiActionType, decide, find_target};
pub use battlefield::Battlefield;
pub use board::{AggroBoard, Board};
pub use config::{AiConfig, EngineConfig, GridSettings};
pub use error::{BoardError, MoveError, ScenarioError};
pub use hash::snapshot_hash;
pub use pathing::{AttackTargets, KnownPaths, MovePath, MoveQuery, PathHelper, WeightedRoute};
pub use rng::{ChaChaSource, RandomSource};
pub use scenario::{Scenario, UnitSpec};
pub use types::*;
pub use units::Unit;
