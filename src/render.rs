//! Tile rendering orchestration
//!
//! Validates the exit configuration once, then runs geometry attempts until
//! one succeeds or the attempt budget runs out. Only geometry is redrawn on
//! retry; the exit configuration stays fixed.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::cavern::{self, CavernShape};
use crate::config::TileConfig;
use crate::error::{GeometryError, Result, TileError};
use crate::exits::{boundary_position, validate_exit_configs, ExitConfig};
use crate::geometry::{Direction, Point, Rectangle};
use crate::smoothing::{CurvePath, Smoother};
use crate::tunnel::{self, Grid, TunnelShape, Truncation};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStyle {
    /// Corridors on a grid overlay
    Tunnel,
    /// Wobbly inset rectangle
    Cavern,
}

impl TileStyle {
    /// Cavern with probability `cavern_probability`, tunnel otherwise
    pub fn random(rng: &mut ChaCha8Rng, cavern_probability: f64) -> Self {
        if rng.gen_bool(cavern_probability.clamp(0.0, 1.0)) {
            TileStyle::Cavern
        } else {
            TileStyle::Tunnel
        }
    }
}

impl fmt::Display for TileStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileStyle::Tunnel => f.pad("tunnel"),
            TileStyle::Cavern => f.pad("cavern"),
        }
    }
}

impl FromStr for TileStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tunnel" => Ok(TileStyle::Tunnel),
            "cavern" => Ok(TileStyle::Cavern),
            other => Err(format!("unknown tile style '{}', expected tunnel or cavern", other)),
        }
    }
}

/// Raw polylines behind the curves, for debug drawing
#[derive(Clone, Debug, Default)]
pub struct DebugGeometry {
    pub wall_points: Vec<Point>,
    pub stub_points: Vec<(Direction, Vec<Point>)>,
    /// Grid cells the corridors occupy (tunnels only)
    pub filled_cells: Vec<Rectangle>,
    /// Elbow samples or cavern side samples
    pub markers: Vec<Point>,
}

/// Everything a caller needs from one tile
#[derive(Clone, Debug, Serialize)]
pub struct RenderedTile {
    pub style: TileStyle,
    pub width: i32,
    pub height: i32,
    /// Curves are in top-left origin coordinates
    pub y_flipped: bool,
    /// Closed wall outline (tunnel walls are open at the exits)
    pub outline: CurvePath,
    pub stubs: Vec<(Direction, CurvePath)>,
    /// Points where entities such as stairs may be placed
    pub entity_candidates: Vec<Point>,
    /// Exit opening centres on the tile boundary, in pixels
    pub exit_positions: BTreeMap<Direction, Point>,
    pub exits: Vec<ExitConfig>,
    /// Geometry attempts used, including the successful one
    pub attempts: usize,
    pub truncated_walks: Vec<Truncation>,
    #[serde(skip)]
    pub debug: DebugGeometry,
}

impl RenderedTile {
    /// Configs for `Above`/`Below`, which carry no planar geometry
    pub fn floor_links(&self) -> impl Iterator<Item = &ExitConfig> {
        self.exits.iter().filter(|c| !c.direction.is_planar())
    }
}

pub struct TileRenderer {
    config: TileConfig,
    smoother: Smoother,
}

impl TileRenderer {
    pub fn new(config: TileConfig) -> Result<Self> {
        config.validate()?;
        let smoother = Smoother::new(config.smoothing, config.flip_y.then_some(config.height));
        Ok(Self { config, smoother })
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Render one tile. Fails with `InvalidInput` for a malformed exit list
    /// and `ExhaustedRetries` when no attempt produced valid geometry.
    pub fn render(&self, configs: &[ExitConfig], style: TileStyle, rng: &mut ChaCha8Rng) -> Result<RenderedTile> {
        validate_exit_configs(configs, &self.config.edges)?;

        let cfg = &self.config;
        let (wall, stubs, entity_candidates, truncated_walks, debug, attempts) = match style {
            TileStyle::Tunnel => {
                let grid = Grid::new(cfg.width, cfg.height, cfg.cell_size);
                let exits = tunnel::resolve_exits(&grid, configs)?;
                let (shape, attempts) =
                    self.with_retries(style, rng, |rng| TunnelShape::generate(&grid, &exits, &cfg.tunnel, rng))?;

                let debug = DebugGeometry {
                    wall_points: shape.wall.clone(),
                    stub_points: shape.stubs.clone(),
                    filled_cells: shape.path.filled().iter().map(|cell| grid.get_rect_at(cell)).collect(),
                    markers: shape.elbows.elbows().iter().flat_map(|e| e.points.iter().copied()).collect(),
                };
                let truncated = shape.path.truncations().to_vec();
                (shape.wall, shape.stubs, shape.entity_candidates, truncated, debug, attempts)
            }
            TileStyle::Cavern => {
                let exits = cavern::resolve_exits(configs, cfg.width, cfg.height, cfg.cell_size)?;
                let (shape, attempts) = self.with_retries(style, rng, |rng| {
                    Ok(CavernShape::new(cfg.width, cfg.height, exits.clone(), &cfg.cavern, rng))
                })?;
                debug_assert!(shape.is_closed());

                let debug = DebugGeometry {
                    wall_points: shape.perimeter.clone(),
                    stub_points: shape.stubs.clone(),
                    filled_cells: Vec::new(),
                    markers: shape.sides.values().flatten().copied().collect(),
                };
                (shape.perimeter, shape.stubs, cfg.cavern.entity_slots.clone(), Vec::new(), debug, attempts)
            }
        };

        let exit_positions = configs
            .iter()
            .map(|c| (c.direction, boundary_position(c, cfg.width, cfg.height, cfg.cell_size)))
            .collect();

        Ok(RenderedTile {
            style,
            width: cfg.width,
            height: cfg.height,
            y_flipped: cfg.flip_y,
            outline: self.smoother.smooth(&wall),
            stubs: stubs.iter().map(|(d, points)| (*d, self.smoother.smooth(points))).collect(),
            entity_candidates,
            exit_positions,
            exits: configs.to_vec(),
            attempts,
            truncated_walks,
            debug,
        })
    }

    /// Run `attempt` until it succeeds, at most `max_attempts` times
    fn with_retries<T>(
        &self,
        style: TileStyle,
        rng: &mut ChaCha8Rng,
        mut attempt: impl FnMut(&mut ChaCha8Rng) -> std::result::Result<T, GeometryError>,
    ) -> Result<(T, usize)> {
        let max = self.config.max_attempts;
        let mut n = 1;
        loop {
            debug!("{} attempt {}/{}", style, n, max);
            match attempt(rng) {
                Ok(value) => {
                    if n > 1 {
                        info!("{} geometry succeeded after {} attempts", style, n);
                    }
                    return Ok((value, n));
                }
                Err(err) if n < max => {
                    warn!("{} attempt {}/{} rejected: {}", style, n, max, err);
                    n += 1;
                }
                Err(err) => return Err(TileError::ExhaustedRetries { attempts: n, last: err }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use rand::SeedableRng;

    fn renderer() -> TileRenderer {
        TileRenderer::new(TileConfig::default()).unwrap()
    }

    fn reference() -> Vec<ExitConfig> {
        vec![
            ExitConfig::open(Direction::Up, 4),
            ExitConfig::open(Direction::Down, 1),
            ExitConfig::blocked(Direction::Left, 3),
            ExitConfig::blocked(Direction::Right, 3),
        ]
    }

    #[test]
    fn test_same_seed_same_tile() {
        let renderer = renderer();
        let configs: Vec<ExitConfig> = Direction::PLANAR.iter().map(|&d| ExitConfig::open(d, 2)).collect();

        for style in [TileStyle::Tunnel, TileStyle::Cavern] {
            let render = |seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                renderer.render(&configs, style, &mut rng).map(|t| t.outline.to_svg_path())
            };
            for seed in [0, 5, 17] {
                match (render(seed), render(seed)) {
                    (Ok(a), Ok(b)) => assert_eq!(a, b),
                    (Err(TileError::ExhaustedRetries { .. }), Err(TileError::ExhaustedRetries { .. })) => {}
                    (a, b) => panic!("seed {} diverged: {:?} vs {:?}", seed, a.is_ok(), b.is_ok()),
                }
            }
        }
    }

    #[test]
    fn test_reference_tunnel_tile() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let tile = renderer().render(&reference(), TileStyle::Tunnel, &mut rng).unwrap();

        assert_eq!(tile.stubs.len(), 2);
        assert!(!tile.outline.is_empty());
        assert!(tile.attempts >= 1);
        assert!(!tile.entity_candidates.is_empty());
        for p in &tile.entity_candidates {
            assert!(p.x > 0 && p.x < 600 && p.y > 0 && p.y < 400, "{}", p);
        }
        assert_eq!(tile.exit_positions[&Direction::Up], Point::new(400, 400));
        assert_eq!(tile.exit_positions[&Direction::Left], Point::new(0, 300));
        assert!(!tile.debug.filled_cells.is_empty());
    }

    #[test]
    fn test_reference_cavern_tile() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let tile = renderer().render(&reference(), TileStyle::Cavern, &mut rng).unwrap();

        assert_eq!(tile.attempts, 1);
        assert_eq!(tile.stubs.len(), 2);
        assert_eq!(tile.entity_candidates, TileConfig::default().cavern.entity_slots);
        assert_eq!(tile.debug.wall_points.first(), tile.debug.wall_points.last());
    }

    #[test]
    fn test_three_blocked_sides_rejected() {
        let configs = vec![
            ExitConfig::open(Direction::Up, 1),
            ExitConfig::blocked(Direction::Down, 1),
            ExitConfig::blocked(Direction::Left, 1),
            ExitConfig::blocked(Direction::Right, 1),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = renderer().render(&configs, TileStyle::Tunnel, &mut rng).unwrap_err();
        assert!(matches!(err, TileError::InvalidInput(InputError::TooManyBlocked { blocked: 3 })));
    }

    #[test]
    fn test_floor_links_pass_through() {
        let mut configs = reference();
        configs.push(ExitConfig::blocked(Direction::Above, 1));
        configs.push(ExitConfig::open(Direction::Below, 1));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tile = renderer().render(&configs, TileStyle::Cavern, &mut rng).unwrap();

        let links: Vec<Direction> = tile.floor_links().map(|c| c.direction).collect();
        assert_eq!(links, vec![Direction::Above, Direction::Below]);
        assert_eq!(tile.exit_positions[&Direction::Below].z, Some(1));
        assert_eq!(tile.stubs.len(), 2);
    }

    #[test]
    fn test_retries_are_bounded() {
        let config = TileConfig { max_attempts: 3, ..Default::default() };
        let renderer = TileRenderer::new(config).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let mut calls = 0;
        let result: Result<((), usize)> = renderer.with_retries(TileStyle::Tunnel, &mut rng, |_| {
            calls += 1;
            Err(GeometryError::SquareInPath { at: Point::new(1, 1) })
        });
        assert_eq!(calls, 3);
        assert!(matches!(result, Err(TileError::ExhaustedRetries { attempts: 3, .. })));

        let mut failures = 2;
        let (_, attempts) = renderer
            .with_retries(TileStyle::Tunnel, &mut rng, |_| {
                if failures > 0 {
                    failures -= 1;
                    Err(GeometryError::NoCorridor { from: Direction::Up, to: Direction::Right })
                } else {
                    Ok(())
                }
            })
            .unwrap();
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_style_parsing_and_draw() {
        assert_eq!("Cavern".parse::<TileStyle>(), Ok(TileStyle::Cavern));
        assert!("maze".parse::<TileStyle>().is_err());

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(TileStyle::random(&mut rng, 0.0), TileStyle::Tunnel);
        assert_eq!(TileStyle::random(&mut rng, 1.0), TileStyle::Cavern);
    }
}
