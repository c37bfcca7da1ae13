//! Shrinking the arena: the outer ring turns into holes and units standing there are
//! pushed toward the center.

use tracing::{debug, warn};

use super::Battlefield;
use crate::geometry::footprint;
use crate::types::{Cell, HOLE, UnitId};

impl Battlefield {
    /// Turns every cell within `depth` of the board edge into a hole.
    ///
    /// Units touching the ring are shifted one cell at a time toward the center until
    /// their footprint fits on open ground. Large units are placed first. Units that
    /// cannot be placed are removed; the returned lines describe each removal.
    pub fn narrow(&mut self, depth: i32) -> Vec<String> {
        let size = self.board.size() as i32;
        if depth <= 0 {
            return Vec::new();
        }
        let in_ring = |cell: Cell| {
            cell.x.min(cell.y).min(size - 1 - cell.x).min(size - 1 - cell.y) < depth
        };

        let mut affected: Vec<UnitId> = self
            .index
            .large_anchors()
            .filter_map(|anchor| self.index.occupant(anchor))
            .filter(|id| self.units.get(*id).is_some_and(|unit| unit.cells().into_iter().any(in_ring)))
            .collect();
        affected.extend(
            self.units
                .iter()
                .filter(|(_, unit)| !unit.is_large() && in_ring(unit.cell))
                .map(|(id, _)| id),
        );
        for id in &affected {
            self.vacate(*id);
        }
        let ring: Vec<Cell> = self.board.scan().filter(|cell| in_ring(*cell)).collect();
        for cell in ring {
            self.board.set(cell, HOLE);
        }

        let mut log = Vec::new();
        for id in affected {
            match self.push_toward_center(id) {
                Some(anchor) => {
                    if let Some(unit) = self.units.get_mut(id) {
                        debug!(unit = %unit.name, from = %unit.cell, to = %anchor, "pushed by narrowing");
                        unit.cell = anchor;
                    }
                    self.occupy(id);
                }
                None => {
                    if let Some(unit) = self.units.remove(id) {
                        let line = format!("{} fell at {} as the arena narrowed", unit.name, unit.cell);
                        warn!(unit = %unit.name, cell = %unit.cell, "unit lost to narrowing");
                        log.push(line);
                    }
                }
            }
        }
        log
    }

    fn push_toward_center(&self, id: UnitId) -> Option<Cell> {
        let unit = self.units.get(id)?;
        let (dx, dy) = direction_to_center(self.board.size(), &unit.cells());
        if (dx, dy) == (0, 0) {
            return None;
        }
        let mut anchor = unit.cell;
        loop {
            anchor = anchor.offset(dx, dy);
            let cells = footprint(anchor, unit.size);
            if !cells.iter().all(|cell| self.board.contains(*cell)) {
                return None;
            }
            let open = cells
                .iter()
                .all(|cell| self.board.is_empty_cell(*cell) && self.index.occupant(*cell).is_none());
            if open {
                return Some(anchor);
            }
        }
    }
}

/// Unit step from a footprint's centroid toward the board center.
fn direction_to_center(size: usize, cells: &[Cell]) -> (i32, i32) {
    let center = (size as f64 - 1.0) / 2.0;
    let count = cells.len().max(1) as f64;
    let cx = cells.iter().map(|cell| f64::from(cell.x)).sum::<f64>() / count;
    let cy = cells.iter().map(|cell| f64::from(cell.y)).sum::<f64>() / count;
    let axis = |delta: f64| {
        if delta > 0.5 {
            1
        } else if delta < -0.5 {
            -1
        } else {
            0
        }
    };
    (axis(center - cx), axis(center - cy))
}
