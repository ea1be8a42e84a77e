//! Corridor synthesis on the grid overlay
//!
//! Every exit cell is seeded as filled, then each open exit walks towards the
//! exit opposite it (or the next open one clockwise) with a greedy random walk.
//! A walk stops as soon as it would step onto a filled cell, so corridors
//! merge instead of running in parallel. Results that contain a solid 2x2
//! block are rejected as a whole; the caller regenerates.

use std::collections::HashSet;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::error::GeometryError;
use crate::exits::ExitMap;
use crate::geometry::{Direction, Point};

use super::grid::Grid;

/// How a single corridor walk ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkEnd {
    /// Stepped next to an already filled cell
    Joined,
    /// Start and target were the same cell
    AtTarget,
    /// Every closer cell was on the border ring
    Stuck,
}

/// A corridor walk that stopped before joining anything
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Truncation {
    pub from: Direction,
    pub to: Direction,
    pub stopped_at: Point,
}

#[derive(Clone, Debug)]
pub struct Path {
    exits: ExitMap,
    filled: Vec<Point>,
    filled_set: HashSet<Point>,
    truncations: Vec<Truncation>,
}

impl Path {
    /// Draw corridors connecting the open exits. Exit points are grid cells.
    pub fn generate(grid: &Grid, exits: ExitMap, rng: &mut ChaCha8Rng) -> Result<Self, GeometryError> {
        let mut path = Self::empty(exits);
        path.seed_exits();

        // Draw order changes which corridors exist first, and so the shape
        let mut order = Direction::PLANAR.to_vec();
        order.shuffle(rng);

        for direction in order {
            let start = path.exits[direction];
            if start.is_blocked {
                continue;
            }

            let target_dir = path
                .exits
                .first_open_from(direction.mirror_of())
                .ok_or(GeometryError::NoOpenExit { from: direction })?;
            let target = path.exits[target_dir].point;

            let (cells, end) = path.walk(grid, start.point, target, rng);
            debug!("corridor {} -> {}: {} cells, {:?}", direction, target_dir, cells.len(), end);

            if end == WalkEnd::Stuck {
                let stopped_at = cells.last().copied().unwrap_or(start.point);
                warn!("corridor {} -> {} truncated at {}", direction, target_dir, stopped_at);
                path.truncations.push(Truncation { from: direction, to: target_dir, stopped_at });
            }

            for cell in cells {
                path.fill(cell);
            }
        }

        if let Some(at) = path.find_square() {
            return Err(GeometryError::SquareInPath { at });
        }

        Ok(path)
    }

    fn empty(exits: ExitMap) -> Self {
        Self {
            exits,
            filled: Vec::new(),
            filled_set: HashSet::new(),
            truncations: Vec::new(),
        }
    }

    fn seed_exits(&mut self) {
        let seeds: Vec<Point> = self.exits.iter().map(|(_, exit)| exit.point).collect();
        for point in seeds {
            self.fill(point);
        }
    }

    fn fill(&mut self, point: Point) {
        if self.filled_set.insert(point) {
            self.filled.push(point);
        }
    }

    /// Filled cells in insertion order (exit seeds first)
    pub fn filled(&self) -> &[Point] {
        &self.filled
    }

    pub fn is_filled(&self, point: &Point) -> bool {
        self.filled_set.contains(point)
    }

    pub fn exits(&self) -> &ExitMap {
        &self.exits
    }

    /// Walks that ended without reaching the corridor network
    pub fn truncations(&self) -> &[Truncation] {
        &self.truncations
    }

    /// Greedy random walk from `start` towards `target`. Returns the cells
    /// stepped on (excluding `start`) and why the walk ended. Does not fill.
    fn walk(&self, grid: &Grid, start: Point, target: Point, rng: &mut ChaCha8Rng) -> (Vec<Point>, WalkEnd) {
        let mut cells = Vec::new();
        let mut current = start;

        while current != target {
            let candidates = step_candidates(&current, &target);

            if candidates.iter().any(|c| self.is_filled(c)) {
                return (cells, WalkEnd::Joined);
            }

            let valid: Vec<Point> = candidates.into_iter().filter(|c| grid.is_interior(c)).collect();
            let Some(&next) = valid.choose(rng) else {
                return (cells, WalkEnd::Stuck);
            };

            cells.push(next);
            current = next;
        }

        (cells, WalkEnd::AtTarget)
    }

    /// Lower-left corner of the first fully filled 2x2 block, if any
    pub fn find_square(&self) -> Option<Point> {
        self.filled.iter().copied().find(|p| {
            self.is_filled(&p.step(Direction::Right))
                && self.is_filled(&p.step(Direction::Up))
                && self.is_filled(&p.step(Direction::Up).step(Direction::Right))
        })
    }

    /// Route from `current` to `target` over filled cells only.
    ///
    /// Steps greedily to the neighbour closest to the target. When several
    /// neighbours tie, each is tried in turn and the first that arrives wins.
    pub fn get_path_between(&self, current: Point, target: Point) -> Option<Vec<Point>> {
        self.search(vec![current], target)
    }

    fn search(&self, mut route: Vec<Point>, target: Point) -> Option<Vec<Point>> {
        loop {
            let current = *route.last()?;
            if current == target {
                return Some(route);
            }

            let candidates: Vec<Point> = current
                .planar_neighbours()
                .into_iter()
                .filter(|c| self.is_filled(c) && !route.contains(c))
                .collect();

            let nearest = candidates.iter().map(|c| Point::distance_between(c, &target)).min()?;
            let ties: Vec<Point> = candidates
                .into_iter()
                .filter(|c| Point::distance_between(c, &target) == nearest)
                .collect();

            if ties.len() > 1 {
                return ties.into_iter().find_map(|next| {
                    let mut branch = route.clone();
                    branch.push(next);
                    self.search(branch, target)
                });
            }

            route.push(ties[0]);
        }
    }
}

/// Cells one step closer to `target`, in up/right/down/left order
fn step_candidates(current: &Point, target: &Point) -> Vec<Point> {
    let mut candidates = Vec::with_capacity(2);
    if target.y > current.y {
        candidates.push(current.step(Direction::Up));
    }
    if target.x > current.x {
        candidates.push(current.step(Direction::Right));
    }
    if target.y < current.y {
        candidates.push(current.step(Direction::Down));
    }
    if target.x < current.x {
        candidates.push(current.step(Direction::Left));
    }
    candidates
}

#[cfg(test)]
impl Path {
    /// Path with a hand-written filled set, for exercising the searches
    pub(crate) fn with_filled(exits: ExitMap, filled: &[Point]) -> Self {
        let mut path = Self::empty(exits);
        for &p in filled {
            path.fill(p);
        }
        path
    }
}
