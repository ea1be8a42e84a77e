//! Grid-and-corridor tile style
//!
//! The tile is overlaid with a coarse grid, corridors are drawn between the
//! exit cells, and walls are traced around the outer bends.

pub mod elbows;
pub mod grid;
pub mod path;

pub use elbows::{Elbow, ElbowMaker};
pub use grid::Grid;
pub use path::{Path, Truncation, WalkEnd};

use rand_chacha::ChaCha8Rng;

use crate::config::TunnelParams;
use crate::error::{GeometryError, InputError};
use crate::exits::{ExitConfig, ExitMap};
use crate::geometry::{Direction, Point};

/// Grid cell of an exit: edge column/row, `edge_position` along it
pub fn exit_cell(grid: &Grid, config: &ExitConfig) -> Point {
    let e = config.edge_position as i32;
    let (w, h) = (grid.width() as i32, grid.height() as i32);
    match config.direction {
        Direction::Up => Point::new(e, h - 1),
        Direction::Right => Point::new(w - 1, e),
        Direction::Down => Point::new(e, 0),
        Direction::Left => Point::new(0, e),
        Direction::Above | Direction::Below => Point::new(0, 0),
    }
}

/// Exits in grid coordinates. Each exit cell must open onto an interior cell.
pub fn resolve_exits(grid: &Grid, configs: &[ExitConfig]) -> Result<ExitMap, InputError> {
    for config in configs.iter().filter(|c| c.direction.is_planar()) {
        let inward = exit_cell(grid, config).step(config.direction.mirror_of());
        if !grid.is_interior(&inward) {
            let cells = if config.direction.is_horizontal_side() { grid.width() } else { grid.height() };
            return Err(InputError::EdgeOutOfRange {
                direction: config.direction,
                edge_position: config.edge_position,
                max: cells.saturating_sub(2) as u32,
            });
        }
    }

    ExitMap::resolve(configs, |config| exit_cell(grid, config))
}

/// One successful tunnel attempt
#[derive(Clone, Debug)]
pub struct TunnelShape {
    pub path: Path,
    pub elbows: ElbowMaker,
    /// Concatenated open elbows
    pub wall: Vec<Point>,
    pub stubs: Vec<(Direction, Vec<Point>)>,
    /// Centres of filled cells off the border ring
    pub entity_candidates: Vec<Point>,
}

impl TunnelShape {
    pub fn generate(
        grid: &Grid,
        exits: &ExitMap,
        params: &TunnelParams,
        rng: &mut ChaCha8Rng,
    ) -> Result<Self, GeometryError> {
        let path = Path::generate(grid, exits.clone(), rng)?;
        let elbows = ElbowMaker::new(grid, &path, params, rng)?;
        let (wall, stubs) = elbows.connected_elbows();
        let entity_candidates = entity_candidates(grid, &path);

        Ok(Self { path, elbows, wall, stubs, entity_candidates })
    }
}

pub fn entity_candidates(grid: &Grid, path: &Path) -> Vec<Point> {
    path.filled()
        .iter()
        .filter(|cell| grid.is_interior(cell))
        .map(|cell| grid.get_rect_at(cell).centre())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn configs() -> Vec<ExitConfig> {
        vec![
            ExitConfig::open(Direction::Up, 4),
            ExitConfig::blocked(Direction::Right, 3),
            ExitConfig::open(Direction::Down, 1),
            ExitConfig::blocked(Direction::Left, 3),
        ]
    }

    #[test]
    fn test_exit_cells_sit_on_the_border() {
        let grid = Grid::new(600, 400, 100);
        let exits = resolve_exits(&grid, &configs()).unwrap();
        assert_eq!(exits[Direction::Up].point, Point::new(4, 4));
        assert_eq!(exits[Direction::Right].point, Point::new(6, 3));
        assert_eq!(exits[Direction::Down].point, Point::new(1, 0));
        assert_eq!(exits[Direction::Left].point, Point::new(0, 3));
        for (_, exit) in exits.iter() {
            assert!(grid.is_on_edge(&exit.point));
        }
    }

    #[test]
    fn test_exit_cells_outside_the_side_are_rejected() {
        let grid = Grid::new(600, 400, 100);

        let mut configs = configs();
        configs[0] = ExitConfig::open(Direction::Up, 10);
        assert_eq!(
            resolve_exits(&grid, &configs),
            Err(InputError::EdgeOutOfRange { direction: Direction::Up, edge_position: 10, max: 5 })
        );

        // Corner cells have no interior neighbour either
        configs[0] = ExitConfig::open(Direction::Up, 0);
        assert!(resolve_exits(&grid, &configs).is_err());
        configs[0] = ExitConfig::open(Direction::Up, 4);
        configs[1] = ExitConfig::blocked(Direction::Right, 4);
        assert_eq!(
            resolve_exits(&grid, &configs),
            Err(InputError::EdgeOutOfRange { direction: Direction::Right, edge_position: 4, max: 3 })
        );
    }

    #[test]
    fn test_generate_some_attempt_succeeds() {
        let grid = Grid::new(600, 400, 100);
        let exits = resolve_exits(&grid, &configs()).unwrap();

        let shape = (0..20)
            .find_map(|seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                TunnelShape::generate(&grid, &exits, &TunnelParams::default(), &mut rng).ok()
            })
            .expect("no successful attempt in 20 seeds");

        assert_eq!(shape.stubs.len(), 2);
        assert!(!shape.wall.is_empty());
        assert!(!shape.entity_candidates.is_empty());
        for p in &shape.entity_candidates {
            assert!(p.x > 50 && p.x < 550 && p.y > 50 && p.y < 350, "{}", p);
        }
    }
}
