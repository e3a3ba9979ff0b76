//! The four cardinal approaches feeding the intersection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of approaches at the intersection. Fixed: this is a four-way
/// intersection by construction.
pub const NUM_APPROACHES: usize = 4;

/// One of the four cardinal directions.
///
/// Serializes as the uppercase name used by the snapshot contract
/// (`"NORTH"`, `"SOUTH"`, `"EAST"`, `"WEST"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions in registration order. Index order is the tie-break
    /// order used by the priority policies.
    pub const ALL: [Direction; NUM_APPROACHES] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Stable index of this direction in [0, 4).
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Direction for a given index.
    ///
    /// # Panics
    /// Panics if `index >= 4`.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }

    /// Single-letter prefix used for vehicle IDs (`N`, `S`, `E`, `W`).
    pub fn short(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        }
    }

    /// Uppercase name matching the snapshot contract.
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::South => "SOUTH",
            Direction::East => "EAST",
            Direction::West => "WEST",
        }
    }

    /// Parse the uppercase contract name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "NORTH" => Some(Direction::North),
            "SOUTH" => Some(Direction::South),
            "EAST" => Some(Direction::East),
            "WEST" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
