//! Directions for tile navigation
//!
//! The four planar directions drive grid and path construction. `Above` and
//! `Below` exist for floor transitions and are fixed points of the rotations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Navigation direction, planar sides first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
    /// One floor up
    Above,
    /// One floor down
    Below,
}

impl Direction {
    /// Planar sides in clockwise order, starting at the top
    pub const PLANAR: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    /// Every member of the enum
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Above,
        Direction::Below,
    ];

    pub fn is_planar(&self) -> bool {
        !matches!(self, Direction::Above | Direction::Below)
    }

    /// True for the sides that run along the x axis (top and bottom)
    pub fn is_horizontal_side(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// The opposite direction
    pub fn mirror_of(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Above => Direction::Below,
            Direction::Below => Direction::Above,
        }
    }

    /// Next planar direction going clockwise
    pub fn clockwise_of(&self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
            vertical => *vertical,
        }
    }

    /// Next planar direction going anticlockwise
    pub fn anticlockwise_of(&self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Right => Direction::Up,
            Direction::Down => Direction::Right,
            Direction::Left => Direction::Down,
            vertical => *vertical,
        }
    }

    /// Compass name used in player-facing text
    pub fn to_nesw(&self) -> &'static str {
        match self {
            Direction::Up => "north",
            Direction::Right => "east",
            Direction::Down => "south",
            Direction::Left => "west",
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Above => "above",
            Direction::Below => "below",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Accepts the plain name or the compass name, in any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str() == name || d.to_nesw() == name)
            .ok_or_else(|| format!("{} is not a supported direction", s))
    }
}
