//! Dungeon tile generation library
//!
//! Builds wall geometry for 2D dungeon tiles from a per-side exit
//! configuration, in either a grid corridor style or an organic cavern
//! style. Re-exports modules for use by binaries and tools.

pub mod cavern;
pub mod config;
pub mod error;
pub mod exits;
pub mod geometry;
pub mod raster;
pub mod render;
pub mod seeds;
pub mod sides;
pub mod smoothing;
pub mod svg;
pub mod tilemap;
pub mod tunnel;

pub use config::TileConfig;
pub use error::{GeometryError, InputError, TileError};
pub use exits::ExitConfig;
pub use geometry::{Direction, Point, Rectangle};
pub use render::{RenderedTile, TileRenderer, TileStyle};
