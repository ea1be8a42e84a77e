//! Exit configuration and resolution
//!
//! Callers describe each side of a tile with an `ExitConfig`: which side, an
//! ordinal position along that side, and whether the opening is walled off.
//! Generators resolve those into `Exit`s in their own coordinate system.

use std::collections::HashSet;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::config::EdgeRange;
use crate::error::InputError;
use crate::geometry::{Direction, Point};

/// Caller-supplied description of one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitConfig {
    pub direction: Direction,
    /// Ordinal position along the side, starting at 1 (left-to-right on
    /// top/bottom, bottom-to-top on left/right)
    pub edge_position: u32,
    pub is_blocked: bool,
}

impl ExitConfig {
    pub fn new(direction: Direction, edge_position: u32, is_blocked: bool) -> Self {
        Self { direction, edge_position, is_blocked }
    }

    pub fn open(direction: Direction, edge_position: u32) -> Self {
        Self::new(direction, edge_position, false)
    }

    pub fn blocked(direction: Direction, edge_position: u32) -> Self {
        Self::new(direction, edge_position, true)
    }
}

/// A resolved exit in generator coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub point: Point,
    pub is_blocked: bool,
}

/// Check cardinality, uniqueness, edge ranges and the open-side minimum.
///
/// Accepts the four planar sides, optionally followed by `Above` and `Below`.
pub fn validate_exit_configs(configs: &[ExitConfig], edges: &EdgeRange) -> Result<(), InputError> {
    if configs.len() != 4 && configs.len() != 6 {
        return Err(InputError::WrongCardinality { count: configs.len() });
    }

    let mut seen = HashSet::new();
    for config in configs {
        if !seen.insert(config.direction) {
            return Err(InputError::DuplicateDirection(config.direction));
        }
    }

    for direction in Direction::PLANAR {
        if !seen.contains(&direction) {
            return Err(InputError::MissingDirection(direction));
        }
    }

    for config in configs.iter().filter(|c| c.direction.is_planar()) {
        let max = edges.max_for(config.direction);
        if config.edge_position < 1 || config.edge_position > max {
            return Err(InputError::EdgeOutOfRange {
                direction: config.direction,
                edge_position: config.edge_position,
                max,
            });
        }
    }

    let blocked = configs
        .iter()
        .filter(|c| c.direction.is_planar() && c.is_blocked)
        .count();
    if blocked >= 3 {
        return Err(InputError::TooManyBlocked { blocked });
    }

    Ok(())
}

/// Centre of an exit opening on the tile boundary, in pixels.
///
/// Floor transitions have no opening; they sit at the tile centre carrying
/// the floor offset.
pub fn boundary_position(config: &ExitConfig, width: i32, height: i32, cell_size: i32) -> Point {
    let along = config.edge_position as i32 * cell_size;
    match config.direction {
        Direction::Up => Point::new(along, height),
        Direction::Right => Point::new(width, along),
        Direction::Down => Point::new(along, 0),
        Direction::Left => Point::new(0, along),
        Direction::Above | Direction::Below => Point::new(width / 2, height / 2).step(config.direction),
    }
}

/// One resolved exit per planar side
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitMap {
    exits: [Exit; 4],
}

fn planar_index(direction: Direction) -> Option<usize> {
    Direction::PLANAR.iter().position(|d| *d == direction)
}

impl ExitMap {
    /// Resolve validated configs with a generator-specific placement.
    /// Non-planar configs are skipped.
    pub fn resolve(configs: &[ExitConfig], mut place: impl FnMut(&ExitConfig) -> Point) -> Result<Self, InputError> {
        let mut slots: [Option<Exit>; 4] = [None; 4];
        for config in configs {
            if let Some(idx) = planar_index(config.direction) {
                slots[idx] = Some(Exit { point: place(config), is_blocked: config.is_blocked });
            }
        }

        let mut exits = [Exit { point: Point::default(), is_blocked: false }; 4];
        for (idx, slot) in slots.into_iter().enumerate() {
            exits[idx] = slot.ok_or(InputError::MissingDirection(Direction::PLANAR[idx]))?;
        }
        Ok(Self { exits })
    }

    pub fn get(&self, direction: Direction) -> Option<&Exit> {
        planar_index(direction).map(|idx| &self.exits[idx])
    }

    /// Exits in `Direction::PLANAR` order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &Exit)> {
        Direction::PLANAR.into_iter().zip(self.exits.iter())
    }

    pub fn is_blocked(&self, direction: Direction) -> bool {
        self.get(direction).map_or(true, |e| e.is_blocked)
    }

    /// First open side at or clockwise of `start`
    pub fn first_open_from(&self, start: Direction) -> Option<Direction> {
        let mut dir = start;
        for _ in 0..4 {
            if !self.is_blocked(dir) {
                return Some(dir);
            }
            dir = dir.clockwise_of();
        }
        None
    }
}

impl Index<Direction> for ExitMap {
    type Output = Exit;

    /// Panics for `Above`/`Below`, which never carry planar geometry.
    fn index(&self, direction: Direction) -> &Exit {
        match planar_index(direction) {
            Some(idx) => &self.exits[idx],
            None => panic!("{} has no planar exit", direction),
        }
    }
}
