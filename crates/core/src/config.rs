//! Tunable engine parameters shared by path search, AI and the move handler.
//! This module exists so scenario files and callers configure the engine in one place.

use serde::{Deserialize, Serialize};

use crate::types::Cell;

/// Geometry of the square battlefield: cells per side and their pixel placement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub grid_size: i32,
    pub cell_size: f64,
    pub min_x: f64,
    pub min_y: f64,
}

impl GridSettings {
    pub const DEFAULT_GRID_SIZE: i32 = 16;
    pub const DEFAULT_CELL_SIZE: f64 = 64.0;

    pub fn new(grid_size: i32, cell_size: f64) -> Self {
        Self { grid_size, cell_size, min_x: 0.0, min_y: 0.0 }
    }

    pub fn with_origin(mut self, min_x: f64, min_y: f64) -> Self {
        self.min_x = min_x;
        self.min_y = min_y;
        self
    }

    pub fn step(&self) -> f64 {
        self.cell_size
    }

    pub fn half_step(&self) -> f64 {
        self.cell_size / 2.0
    }

    pub fn max_x(&self) -> f64 {
        self.min_x + f64::from(self.grid_size) * self.cell_size
    }

    pub fn max_y(&self) -> f64 {
        self.min_y + f64::from(self.grid_size) * self.cell_size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.grid_size && cell.y < self.grid_size
    }

    pub fn cell_count(&self) -> usize {
        let side = usize::try_from(self.grid_size).unwrap_or(0);
        side * side
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GRID_SIZE, Self::DEFAULT_CELL_SIZE)
    }
}

/// Knobs for AI target resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Extra cost multiplier each threatening enemy adds to a cell.
    pub aggro_per_threat: f64,
    /// Step budget for the AI's own reachability search; `None` searches the whole board.
    pub search_budget: Option<f64>,
}

impl AiConfig {
    pub const DEFAULT_AGGRO_PER_THREAT: f64 = 0.5;
}

impl Default for AiConfig {
    fn default() -> Self {
        Self { aggro_per_threat: Self::DEFAULT_AGGRO_PER_THREAT, search_budget: None }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridSettings,
    pub ai: AiConfig,
}
