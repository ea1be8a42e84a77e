//! Exit configuration drawing for new tiles
//!
//! A fresh tile blocks each side at random and copies the edge position from
//! the neighbour across that side, so the openings of adjacent tiles line up.

use std::collections::HashMap;

use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::config::EdgeRange;
use crate::error::{Result, TileError};
use crate::exits::ExitConfig;
use crate::geometry::{Direction, Point};
use crate::render::TileStyle;

/// Probabilities used when planning a tile
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideParams {
    /// Chance for each side to be walled off
    pub prob_blockage: f64,
    /// Chance for a tile to use the cavern style
    pub prob_cavern: f64,
    /// Side draws before giving up on finding two open sides
    pub max_draws: usize,
}

impl Default for SideParams {
    fn default() -> Self {
        Self {
            prob_blockage: 0.2,
            prob_cavern: 0.3,
            max_draws: 10,
        }
    }
}

/// Read access to already planned tiles
pub trait NeighbourLookup {
    /// Exit config on `direction` side of the tile at `coord`, if that tile exists
    fn exit_config(&self, coord: Point, direction: Direction) -> Option<ExitConfig>;
}

/// Draw four planar exit configs for the tile at `target`.
///
/// Draws with three or more blocked sides are thrown away and redrawn.
pub fn generate_exit_configs(
    target: Point,
    neighbours: &impl NeighbourLookup,
    edges: &EdgeRange,
    params: &SideParams,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<ExitConfig>> {
    let prob_blockage = params.prob_blockage.clamp(0.0, 1.0);

    for draw in 1..=params.max_draws {
        let configs: Vec<ExitConfig> = Direction::PLANAR
            .into_iter()
            .map(|direction| {
                let is_blocked = rng.gen_bool(prob_blockage);
                let edge_position = match neighbours.exit_config(target.step(direction), direction.mirror_of()) {
                    Some(shared) => shared.edge_position,
                    None => rng.gen_range(1..=edges.max_for(direction)),
                };
                ExitConfig::new(direction, edge_position, is_blocked)
            })
            .collect();

        let blocked = configs.iter().filter(|c| c.is_blocked).count();
        if blocked < 3 {
            return Ok(configs);
        }
        debug!("side draw {} for {} blocked {} sides, redrawing", draw, target, blocked);
    }

    Err(TileError::ExhaustedSideDraws { attempts: params.max_draws })
}

/// A planned tile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtlasEntry {
    pub style: TileStyle,
    pub exits: Vec<ExitConfig>,
}

/// In-memory map of planned tiles keyed by coordinate
#[derive(Clone, Debug, Default)]
pub struct TileAtlas {
    tiles: HashMap<Point, AtlasEntry>,
}

impl TileAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: &Point) -> Option<&AtlasEntry> {
        self.tiles.get(coord)
    }

    pub fn insert(&mut self, coord: Point, entry: AtlasEntry) {
        self.tiles.insert(coord, entry);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Existing entry, or a freshly planned one consistent with its neighbours
    pub fn get_or_plan(
        &mut self,
        coord: Point,
        edges: &EdgeRange,
        params: &SideParams,
        rng: &mut ChaCha8Rng,
    ) -> Result<&AtlasEntry> {
        if !self.tiles.contains_key(&coord) {
            let style = TileStyle::random(rng, params.prob_cavern);
            let exits = generate_exit_configs(coord, &*self, edges, params, rng)?;
            self.insert(coord, AtlasEntry { style, exits });
        }

        self.tiles
            .get(&coord)
            .ok_or_else(|| TileError::InvalidConfig(format!("tile {} missing after planning", coord)))
    }

    /// Coordinates in row-major order, top row first
    pub fn coords(&self) -> Vec<Point> {
        let mut coords: Vec<Point> = self.tiles.keys().copied().collect();
        coords.sort_by_key(|p| (-p.y, p.x));
        coords
    }
}

impl NeighbourLookup for TileAtlas {
    fn exit_config(&self, coord: Point, direction: Direction) -> Option<ExitConfig> {
        self.tiles
            .get(&coord)?
            .exits
            .iter()
            .find(|c| c.direction == direction)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_never_more_than_two_blocked() {
        let atlas = TileAtlas::new();
        let params = SideParams { prob_blockage: 0.6, ..Default::default() };
        for seed in 0..100 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match generate_exit_configs(Point::new(0, 0), &atlas, &EdgeRange::default(), &params, &mut rng) {
                Ok(configs) => {
                    assert_eq!(configs.len(), 4);
                    assert!(configs.iter().filter(|c| c.is_blocked).count() < 3);
                }
                Err(err) => assert!(matches!(err, TileError::ExhaustedSideDraws { attempts: 10 })),
            }
        }
    }

    #[test]
    fn test_always_blocked_exhausts_draws() {
        let params = SideParams { prob_blockage: 1.0, max_draws: 4, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = generate_exit_configs(Point::new(0, 0), &TileAtlas::new(), &EdgeRange::default(), &params, &mut rng)
            .unwrap_err();
        assert!(matches!(err, TileError::ExhaustedSideDraws { attempts: 4 }));
    }

    #[test]
    fn test_edges_are_within_range() {
        let edges = EdgeRange::default();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let configs =
                generate_exit_configs(Point::new(3, 3), &TileAtlas::new(), &edges, &SideParams::default(), &mut rng);
            for c in configs.unwrap_or_default() {
                assert!(c.edge_position >= 1 && c.edge_position <= edges.max_for(c.direction));
            }
        }
    }

    #[test]
    fn test_neighbours_share_edge_positions() {
        let edges = EdgeRange::default();
        let params = SideParams::default();
        let mut atlas = TileAtlas::new();
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        for y in -1..=1 {
            for x in -1..=1 {
                atlas.get_or_plan(Point::new(x, y), &edges, &params, &mut rng).unwrap();
            }
        }
        assert_eq!(atlas.len(), 9);

        for coord in atlas.coords() {
            for direction in Direction::PLANAR {
                let here = atlas.exit_config(coord, direction).unwrap();
                if let Some(there) = atlas.exit_config(coord.step(direction), direction.mirror_of()) {
                    assert_eq!(here.edge_position, there.edge_position, "{} {}", coord, direction);
                }
            }
        }
    }

    #[test]
    fn test_get_or_plan_keeps_existing() {
        let mut atlas = TileAtlas::new();
        let entry = AtlasEntry {
            style: TileStyle::Cavern,
            exits: Direction::PLANAR.iter().map(|&d| ExitConfig::open(d, 1)).collect(),
        };
        atlas.insert(Point::new(0, 0), entry.clone());

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let planned = atlas
            .get_or_plan(Point::new(0, 0), &EdgeRange::default(), &SideParams::default(), &mut rng)
            .unwrap();
        assert_eq!(planned, &entry);
    }
}
