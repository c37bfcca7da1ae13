//! Unit records as the pathing and AI layers see them.

use crate::geometry::footprint;
use crate::pathing::MoveQuery;
use crate::types::{AttackType, Cell, Team, UnitId, UnitSize};

/// A unit on the battlefield. `cell` is the anchor: the unit's own cell when small,
/// the top-right cell of its 2x2 footprint when large.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub cell: Cell,
    pub size: UnitSize,
    pub steps: f64,
    pub attack_range: u32,
    pub can_fly: bool,
    pub attack_type: AttackType,
}

impl Unit {
    pub fn new(name: impl Into<String>, team: Team, cell: Cell) -> Self {
        Self {
            id: UnitId::default(),
            name: name.into(),
            team,
            cell,
            size: UnitSize::Small,
            steps: 1.0,
            attack_range: 1,
            can_fly: false,
            attack_type: AttackType::Melee,
        }
    }

    pub fn large(mut self) -> Self {
        self.size = UnitSize::Large;
        self
    }

    pub fn with_steps(mut self, steps: f64) -> Self {
        self.steps = steps;
        self
    }

    pub fn flying(mut self) -> Self {
        self.can_fly = true;
        self
    }

    pub fn ranged(mut self, attack_range: u32) -> Self {
        self.attack_type = AttackType::Range;
        self.attack_range = attack_range;
        self
    }

    pub fn with_id(mut self, id: UnitId) -> Self {
        self.id = id;
        self
    }

    pub fn cells(&self) -> Vec<Cell> {
        footprint(self.cell, self.size)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.cells().contains(&cell)
    }

    pub fn is_large(&self) -> bool {
        self.size == UnitSize::Large
    }

    pub fn move_query(&self, max_steps: f64) -> MoveQuery {
        MoveQuery { origin: self.cell, max_steps, can_fly: self.can_fly, size: self.size }
    }
}
