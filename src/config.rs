//! Generation parameters
//!
//! Defaults describe the reference tile: 600x400 pixels cut into 100 pixel
//! cells. Any field may be overridden from a JSON file; missing fields keep
//! their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TileError};
use crate::geometry::{Direction, Point};

/// Full configuration for a tile renderer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// Tile width in pixels
    pub width: i32,
    /// Tile height in pixels
    pub height: i32,
    /// Side length of one grid cell in pixels
    pub cell_size: i32,
    /// Allowed edge positions per side
    pub edges: EdgeRange,
    pub tunnel: TunnelParams,
    pub cavern: CavernParams,
    /// Bezier smoothing factor
    pub smoothing: f64,
    /// Flip y when emitting curves (renderers with a top-left origin)
    pub flip_y: bool,
    /// Geometry attempts before giving up
    pub max_attempts: usize,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            cell_size: 100,
            edges: EdgeRange::default(),
            tunnel: TunnelParams::default(),
            cavern: CavernParams::default(),
            smoothing: 0.2,
            flip_y: true,
            max_attempts: 10,
        }
    }
}

/// Largest edge position for each axis. Positions start at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeRange {
    /// Top and bottom sides
    pub horizontal: u32,
    /// Left and right sides
    pub vertical: u32,
}

impl Default for EdgeRange {
    fn default() -> Self {
        Self { horizontal: 4, vertical: 3 }
    }
}

impl EdgeRange {
    pub fn max_for(&self, direction: Direction) -> u32 {
        if direction.is_horizontal_side() {
            self.horizontal
        } else {
            self.vertical
        }
    }
}

/// Grid corridor style
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelParams {
    /// How far exit points poke out past the tile edge
    pub exit_offset: i32,
    /// Distance between jitter samples along an elbow
    pub spacing: i32,
    /// Maximum perpendicular jitter
    pub wobbliness: i32,
    /// Keep elbow corner vertices alongside the jitter samples
    pub keep_corners: bool,
}

impl Default for TunnelParams {
    fn default() -> Self {
        Self {
            exit_offset: 30,
            spacing: 30,
            wobbliness: 10,
            keep_corners: false,
        }
    }
}

/// Organic rounded-rectangle style
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CavernParams {
    /// Inset of the cavern boundary from the tile edge
    pub margin: i32,
    /// Distance between boundary samples
    pub spacing: i32,
    /// Maximum perpendicular jitter of boundary samples
    pub wobbliness: i32,
    /// Opening width of an exit
    pub exit_width: i32,
    /// How far the wall runs past the tile edge at an exit
    pub rung_offset: i32,
    /// Inclusive range for pulling a blocked side inwards
    pub blocked_inset: (i32, i32),
    /// Fixed entity placement candidates
    pub entity_slots: Vec<Point>,
}

impl Default for CavernParams {
    fn default() -> Self {
        Self {
            margin: 50,
            spacing: 45,
            wobbliness: 25,
            exit_width: 100,
            rung_offset: 30,
            blocked_inset: (20, 40),
            entity_slots: vec![
                Point::new(220, 150),
                Point::new(220, 250),
                Point::new(380, 150),
                Point::new(380, 250),
            ],
        }
    }
}

impl TileConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: TileConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Grid columns: one cell centred on every multiple of `cell_size`
    pub fn grid_width(&self) -> usize {
        (self.width / self.cell_size) as usize + 1
    }

    /// Grid rows
    pub fn grid_height(&self) -> usize {
        (self.height / self.cell_size) as usize + 1
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(TileError::InvalidConfig(msg));

        if self.width <= 0 || self.height <= 0 || self.cell_size <= 0 {
            return fail(format!(
                "tile {}x{} with cell size {} must be positive",
                self.width, self.height, self.cell_size
            ));
        }
        if self.width % self.cell_size != 0 || self.height % self.cell_size != 0 {
            return fail(format!(
                "tile {}x{} is not a multiple of cell size {}",
                self.width, self.height, self.cell_size
            ));
        }
        if self.cell_size % 2 != 0 {
            return fail(format!("cell size {} must be even", self.cell_size));
        }

        // Exits must land on interior columns/rows
        let max_h = self.grid_width().saturating_sub(2) as u32;
        let max_v = self.grid_height().saturating_sub(2) as u32;
        if self.edges.horizontal == 0 || self.edges.horizontal > max_h {
            return fail(format!("horizontal edge range 1..={} does not fit 1..={}", self.edges.horizontal, max_h));
        }
        if self.edges.vertical == 0 || self.edges.vertical > max_v {
            return fail(format!("vertical edge range 1..={} does not fit 1..={}", self.edges.vertical, max_v));
        }

        if self.tunnel.spacing <= 0 || self.tunnel.wobbliness < 0 {
            return fail("tunnel spacing must be positive and wobbliness non-negative".to_string());
        }
        if self.cavern.spacing <= 0 || self.cavern.wobbliness < 0 {
            return fail("cavern spacing must be positive and wobbliness non-negative".to_string());
        }
        if self.cavern.blocked_inset.0 > self.cavern.blocked_inset.1 {
            return fail(format!("blocked inset range {:?} is inverted", self.cavern.blocked_inset));
        }
        if 2 * self.cavern.margin >= self.width.min(self.height) {
            return fail(format!("cavern margin {} leaves no interior", self.cavern.margin));
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return fail(format!("smoothing {} must lie in 0..=1", self.smoothing));
        }
        if self.max_attempts == 0 {
            return fail("max_attempts must be at least 1".to_string());
        }

        Ok(())
    }
}
