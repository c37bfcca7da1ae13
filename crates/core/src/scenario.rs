//! Battle setups loaded from JSON or TOML files.
//! This module exists so tools and tests describe a board and its units declaratively.
//! It does not run turns; it only builds a [`Battlefield`].

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::battlefield::Battlefield;
use crate::board::Board;
use crate::config::{EngineConfig, GridSettings};
use crate::error::ScenarioError;
use crate::types::{AttackType, Cell, Team, UnitSize};
use crate::units::Unit;

/// A board of terrain values, top row first, and the units placed on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: EngineConfig,
    pub board: Vec<Vec<u8>>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub team: Team,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub size: UnitSize,
    #[serde(default = "default_steps")]
    pub steps: f64,
    #[serde(default = "default_attack_range")]
    pub attack_range: u32,
    #[serde(default)]
    pub can_fly: bool,
    #[serde(default)]
    pub attack_type: AttackType,
}

fn default_steps() -> f64 {
    3.0
}

fn default_attack_range() -> u32 {
    1
}

impl UnitSpec {
    pub fn to_unit(&self) -> Unit {
        Unit {
            size: self.size,
            steps: self.steps,
            attack_range: self.attack_range,
            can_fly: self.can_fly,
            attack_type: self.attack_type,
            ..Unit::new(self.name.clone(), self.team, Cell::new(self.x, self.y))
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ScenarioError::Io { path: path.to_path_buf(), source })?;
        let scenario = match path.extension().and_then(OsStr::to_str) {
            Some("json") => Self::from_json_str(&text)?,
            Some("toml") => Self::from_toml_str(&text)?,
            other => return Err(ScenarioError::UnsupportedFormat(other.unwrap_or_default().to_owned())),
        };
        info!(path = %path.display(), units = scenario.units.len(), "scenario loaded");
        Ok(scenario)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(text)?)
    }

    /// Grid settings with the side length taken from the board itself.
    pub fn grid(&self) -> GridSettings {
        GridSettings { grid_size: self.board.len() as i32, ..self.config.grid }
    }

    pub fn battlefield(&self) -> Result<Battlefield, ScenarioError> {
        let board = Board::from_rows(&self.board)?;
        let mut battlefield = Battlefield::with_board(self.grid(), board)?;
        for spec in &self.units {
            battlefield
                .spawn(spec.to_unit())
                .map_err(|source| ScenarioError::Placement { name: spec.name.clone(), source })?;
        }
        Ok(battlefield)
    }
}
