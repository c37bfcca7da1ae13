//! Authoritative unit placement: the board markers, the unit table and the spatial index.
//! This module exists so moves, spawns and arena narrowing keep those three in agreement.
//! It does not search for routes; callers pass the known paths a move was chosen from.

mod index;
mod narrowing;

use slotmap::SlotMap;
use tracing::debug;

pub use index::SpatialIndex;

use crate::board::Board;
use crate::config::GridSettings;
use crate::error::{BoardError, MoveError};
use crate::geometry::{footprint, unit_position};
use crate::pathing::{KnownPaths, WeightedRoute};
use crate::types::{Cell, CellContent, EMPTY, Point, UnitId, UnitSize};
use crate::units::Unit;

#[derive(Clone, Debug)]
pub struct Battlefield {
    settings: GridSettings,
    board: Board,
    units: SlotMap<UnitId, Unit>,
    index: SpatialIndex,
}

impl Battlefield {
    pub fn new(settings: GridSettings) -> Self {
        let size = usize::try_from(settings.grid_size).unwrap_or(0);
        Self { settings, board: Board::new(size), units: SlotMap::with_key(), index: SpatialIndex::default() }
    }

    /// Starts from a terrain-only board. Unit markers are written by [`Battlefield::spawn`].
    pub fn with_board(settings: GridSettings, board: Board) -> Result<Self, BoardError> {
        if i32::try_from(board.size()).ok() != Some(settings.grid_size) {
            return Err(BoardError::SizeMismatch { board: board.size(), grid: settings.grid_size });
        }
        Ok(Self { settings, board, units: SlotMap::with_key(), index: SpatialIndex::default() })
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Board snapshot in the top-row-first layout the AI reads.
    pub fn matrix(&self) -> Vec<Vec<u8>> {
        self.board.to_rows()
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit_list(&self) -> Vec<Unit> {
        self.units.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<UnitId> {
        self.units.iter().find(|(_, unit)| unit.name == name).map(|(id, _)| id)
    }

    pub fn unit_at(&self, cell: Cell) -> Option<UnitId> {
        self.index.occupant(cell)
    }

    /// Large unit whose 2x2 footprint covers `cell`.
    pub fn large_unit_covering(&self, cell: Cell) -> Option<UnitId> {
        self.index.large_anchor_covering(cell).and_then(|anchor| self.index.occupant(anchor))
    }

    /// Pixel position the unit is drawn at.
    pub fn position_of(&self, id: UnitId) -> Option<Point> {
        let unit = self.units.get(id)?;
        Some(unit_position(&self.settings, unit.cell, unit.size))
    }

    pub fn spawn(&mut self, unit: Unit) -> Result<UnitId, MoveError> {
        self.check_free(unit.cell, unit.size, None)?;
        let id = self.units.insert_with_key(|id| Unit { id, ..unit });
        self.occupy(id);
        Ok(id)
    }

    pub fn remove(&mut self, id: UnitId) -> Option<Unit> {
        self.vacate(id);
        self.units.remove(id)
    }

    /// Moves a unit to `destination` along the best route recorded for it in `known_paths`.
    ///
    /// The destination must be a key of the map, and the map must have been searched from
    /// the unit's current cell.
    pub fn commit_move(
        &mut self,
        id: UnitId,
        destination: Cell,
        known_paths: &KnownPaths,
    ) -> Result<WeightedRoute, MoveError> {
        let unit = self.units.get(id).ok_or(MoveError::UnknownUnit(id))?;
        let origin = unit.cell;
        let size = unit.size;
        let route = known_paths
            .get(&destination)
            .and_then(|routes| routes.first())
            .filter(|route| route.route.first() == Some(&origin))
            .cloned()
            .ok_or(MoveError::UnknownDestination(destination))?;
        self.check_free(destination, size, Some(id))?;

        self.vacate(id);
        if let Some(unit) = self.units.get_mut(id) {
            unit.cell = destination;
        }
        self.occupy(id);
        debug!(unit = ?id, from = %origin, to = %destination, distance = route.distance, "move committed");
        Ok(route)
    }

    fn check_free(&self, anchor: Cell, size: UnitSize, mover: Option<UnitId>) -> Result<(), MoveError> {
        for cell in footprint(anchor, size) {
            if !self.board.contains(cell) {
                return Err(MoveError::OffBoard(anchor));
            }
            let occupant = self.index.occupant(cell);
            if occupant.is_some() && occupant != mover {
                return Err(MoveError::Occupied(cell));
            }
            match self.board.content(cell) {
                Some(CellContent::Empty) => {}
                Some(CellContent::Unit(_)) if occupant.is_some() => {}
                _ => return Err(MoveError::Occupied(cell)),
            }
        }
        Ok(())
    }

    fn occupy(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(id) else {
            return;
        };
        for cell in unit.cells() {
            self.board.set(cell, unit.team.marker());
        }
        self.index.insert(unit);
    }

    fn vacate(&mut self, id: UnitId) {
        let Some(unit) = self.units.get(id) else {
            return;
        };
        for cell in unit.cells() {
            if self.board.content(cell) == Some(CellContent::Unit(unit.team)) {
                self.board.set(cell, EMPTY);
            }
        }
        self.index.remove(unit);
    }
}
