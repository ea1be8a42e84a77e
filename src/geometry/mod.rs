//! Geometry primitives shared by the tile generators
//!
//! - `Point`: integer 2D/3D point with directional translation
//! - `Direction`: four planar sides plus floor transitions
//! - `Rectangle`: axis-aligned box addressed by its corners

pub mod direction;
pub mod point;
pub mod rectangle;

pub use direction::Direction;
pub use point::Point;
pub use rectangle::Rectangle;
