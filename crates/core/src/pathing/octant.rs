//! Placement of a large attacker around the cell it strikes from.

/// Direction from a defender cell to a candidate attack cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Octant {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Octant {
    pub const ALL: [Octant; 8] = [
        Octant::North,
        Octant::NorthEast,
        Octant::East,
        Octant::SouthEast,
        Octant::South,
        Octant::SouthWest,
        Octant::West,
        Octant::NorthWest,
    ];

    pub fn from_offset(dx: i32, dy: i32) -> Option<Octant> {
        match (dx.signum(), dy.signum()) {
            (0, 1) => Some(Octant::North),
            (1, 1) => Some(Octant::NorthEast),
            (1, 0) => Some(Octant::East),
            (1, -1) => Some(Octant::SouthEast),
            (0, -1) => Some(Octant::South),
            (-1, -1) => Some(Octant::SouthWest),
            (-1, 0) => Some(Octant::West),
            (-1, 1) => Some(Octant::NorthWest),
            _ => None,
        }
    }

    /// Anchor offsets, relative to the attack cell, of 2x2 footprints that contain the
    /// attack cell and extend away from the defender. Preferred placement first.
    pub const fn anchor_offsets(self) -> &'static [(i32, i32)] {
        match self {
            Octant::North => &[(0, 1), (1, 1)],
            Octant::NorthEast => &[(1, 1)],
            Octant::East => &[(1, 0), (1, 1)],
            Octant::SouthEast => &[(1, 0)],
            Octant::South => &[(0, 0), (1, 0)],
            Octant::SouthWest => &[(0, 0)],
            Octant::West => &[(0, 0), (0, 1)],
            Octant::NorthWest => &[(0, 1)],
        }
    }
}
