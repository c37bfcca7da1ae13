//! Occupancy lookups kept alongside the board markers.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{Cell, UnitId};
use crate::units::Unit;

/// Cell -> unit occupancy, plus the anchors of large units indexed by column and by row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpatialIndex {
    occupancy: BTreeMap<Cell, UnitId>,
    large_x_to_y: BTreeMap<i32, BTreeSet<i32>>,
    large_y_to_x: BTreeMap<i32, BTreeSet<i32>>,
}

impl SpatialIndex {
    pub fn insert(&mut self, unit: &Unit) {
        for cell in unit.cells() {
            self.occupancy.insert(cell, unit.id);
        }
        if unit.is_large() {
            self.large_x_to_y.entry(unit.cell.x).or_default().insert(unit.cell.y);
            self.large_y_to_x.entry(unit.cell.y).or_default().insert(unit.cell.x);
        }
    }

    pub fn remove(&mut self, unit: &Unit) {
        for cell in unit.cells() {
            if self.occupancy.get(&cell) == Some(&unit.id) {
                self.occupancy.remove(&cell);
            }
        }
        if unit.is_large() {
            remove_from(&mut self.large_x_to_y, unit.cell.x, unit.cell.y);
            remove_from(&mut self.large_y_to_x, unit.cell.y, unit.cell.x);
        }
    }

    pub fn occupant(&self, cell: Cell) -> Option<UnitId> {
        self.occupancy.get(&cell).copied()
    }

    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    /// Large-unit anchors ordered by column, then row.
    pub fn large_anchors(&self) -> impl Iterator<Item = Cell> + '_ {
        self.large_x_to_y.iter().flat_map(|(x, ys)| ys.iter().map(move |y| Cell::new(*x, *y)))
    }

    /// Anchor of the large unit whose footprint covers `cell`, if any.
    pub fn large_anchor_covering(&self, cell: Cell) -> Option<Cell> {
        [cell.y, cell.y + 1].into_iter().find_map(|y| {
            let xs = self.large_y_to_x.get(&y)?;
            [cell.x, cell.x + 1].into_iter().find(|x| xs.contains(x)).map(|x| Cell::new(x, y))
        })
    }
}

fn remove_from(index: &mut BTreeMap<i32, BTreeSet<i32>>, key: i32, value: i32) {
    if let Some(values) = index.get_mut(&key) {
        values.remove(&value);
        if values.is_empty() {
            index.remove(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::with_ids;
    use crate::types::Team;

    #[test]
    fn large_units_are_found_from_any_covered_cell() {
        let units = with_ids(vec![
            Unit::new("ogre", Team::Upper, Cell::new(4, 4)).large(),
            Unit::new("imp", Team::Upper, Cell::new(0, 0)),
        ]);
        let mut index = SpatialIndex::default();
        for unit in &units {
            index.insert(unit);
        }
        assert_eq!(index.len(), 5);
        assert_eq!(index.occupant(Cell::new(3, 3)), Some(units[0].id));
        assert_eq!(index.large_anchor_covering(Cell::new(3, 3)), Some(Cell::new(4, 4)));
        assert_eq!(index.large_anchor_covering(Cell::new(4, 3)), Some(Cell::new(4, 4)));
        assert_eq!(index.large_anchor_covering(Cell::new(5, 4)), None);
        assert_eq!(index.large_anchor_covering(Cell::new(0, 0)), None);
        assert_eq!(index.large_anchors().collect::<Vec<_>>(), vec![Cell::new(4, 4)]);

        index.remove(&units[0]);
        assert_eq!(index.occupant(Cell::new(3, 3)), None);
        assert_eq!(index.large_anchors().count(), 0);
        index.remove(&units[1]);
        assert!(index.is_empty());
    }
}
