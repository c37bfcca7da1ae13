use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct UnitId;
}

pub const EMPTY: u8 = 0;
pub const BLOCK: u8 = 3;
pub const HOLE: u8 = 4;
pub const WATER: u8 = 5;
pub const LAVA: u8 = 6;

/// One board square. `y` grows upward, matching the battlefield orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pixel-space position on the rendered battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Lower,
    Upper,
}

impl Team {
    /// Value written into the board matrix for cells this team occupies.
    pub const fn marker(self) -> u8 {
        match self {
            Team::Lower => 1,
            Team::Upper => 2,
        }
    }

    pub const fn from_marker(value: u8) -> Option<Team> {
        match value {
            1 => Some(Team::Lower),
            2 => Some(Team::Upper),
            _ => None,
        }
    }

    pub const fn opponent(self) -> Team {
        match self {
            Team::Lower => Team::Upper,
            Team::Upper => Team::Lower,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UnitSize {
    #[default]
    Small,
    Large,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    #[default]
    Melee,
    Range,
    Magic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Block,
    Hole,
    Water,
    Lava,
}

impl ObstacleKind {
    pub const fn code(self) -> u8 {
        match self {
            ObstacleKind::Block => BLOCK,
            ObstacleKind::Hole => HOLE,
            ObstacleKind::Water => WATER,
            ObstacleKind::Lava => LAVA,
        }
    }

    /// Flying units pass over liquids but never through solid or missing ground.
    pub const fn is_flyable(self) -> bool {
        matches!(self, ObstacleKind::Water | ObstacleKind::Lava)
    }
}

/// Decoded meaning of one board matrix value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellContent {
    Empty,
    Unit(Team),
    Obstacle(ObstacleKind),
    Unknown(u8),
}

impl CellContent {
    pub const fn from_value(value: u8) -> Self {
        match value {
            EMPTY => CellContent::Empty,
            BLOCK => CellContent::Obstacle(ObstacleKind::Block),
            HOLE => CellContent::Obstacle(ObstacleKind::Hole),
            WATER => CellContent::Obstacle(ObstacleKind::Water),
            LAVA => CellContent::Obstacle(ObstacleKind::Lava),
            other => match Team::from_marker(other) {
                Some(team) => CellContent::Unit(team),
                None => CellContent::Unknown(other),
            },
        }
    }

    pub const fn is_terrain(self) -> bool {
        matches!(self, CellContent::Obstacle(_) | CellContent::Unknown(_))
    }
}
