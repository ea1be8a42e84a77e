//! Integer points in tile or grid coordinates
//!
//! The y axis points up (bottom-left origin). `z` is only present for points
//! that carry a floor index; arithmetic keeps it whenever either side has one.

use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use super::direction::Direction;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<i32>,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, z: None }
    }

    pub const fn new_3d(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z: Some(z) }
    }

    /// Unit vector for a direction. `Above` lowers the floor index.
    pub fn direction_vector(direction: Direction) -> Self {
        match direction {
            Direction::Up => Point::new(0, 1),
            Direction::Right => Point::new(1, 0),
            Direction::Down => Point::new(0, -1),
            Direction::Left => Point::new(-1, 0),
            Direction::Above => Point::new_3d(0, 0, -1),
            Direction::Below => Point::new_3d(0, 0, 1),
        }
    }

    /// Move `amount` steps along `direction`
    pub fn translate(&self, direction: Direction, amount: i32) -> Self {
        *self + Point::direction_vector(direction) * amount
    }

    /// One step along `direction`
    pub fn step(&self, direction: Direction) -> Self {
        self.translate(direction, 1)
    }

    /// Manhattan distance on the plane; `z` is ignored
    pub fn distance_between(a: &Point, b: &Point) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }

    /// The four planar neighbours, in `Direction::PLANAR` order
    pub fn planar_neighbours(&self) -> [Point; 4] {
        Direction::PLANAR.map(|d| self.step(d))
    }

    pub fn as_f64(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        let z = match (self.z, other.z) {
            (Some(a), Some(b)) => Some(a + b),
            (Some(a), None) | (None, Some(a)) => Some(a),
            (None, None) => None,
        };
        Point { x: self.x + other.x, y: self.y + other.y, z }
    }
}

impl Mul<i32> for Point {
    type Output = Point;

    fn mul(self, factor: i32) -> Point {
        Point { x: self.x * factor, y: self.y * factor, z: self.z.map(|z| z * factor) }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.z {
            Some(z) => write!(f, "(x={}, y={}, z={})", self.x, self.y, z),
            None => write!(f, "(x={}, y={})", self.x, self.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_then_mirror_returns_origin() {
        let cases = [
            (Point::new(3, -2), &Direction::PLANAR[..]),
            (Point::new_3d(0, 0, 4), &Direction::ALL[..]),
        ];
        for (p, directions) in cases {
            for &dir in directions {
                for n in 0..5 {
                    let moved = p.translate(dir, n);
                    assert_eq!(moved.translate(dir.mirror_of(), n), p, "{} {} {}", p, dir, n);
                }
            }
        }
    }

    #[test]
    fn test_translate_keeps_z() {
        let p = Point::new_3d(1, 1, 2);
        assert_eq!(p.translate(Direction::Up, 3), Point::new_3d(1, 4, 2));
        assert_eq!(p.translate(Direction::Above, 1), Point::new_3d(1, 1, 1));
        assert_eq!((p * 2).z, Some(4));
    }

    #[test]
    fn test_vertical_translate_gains_floor_index() {
        let p = Point::new(0, 0);
        assert_eq!(p.translate(Direction::Below, 2), Point::new_3d(0, 0, 2));
    }

    #[test]
    fn test_distance_ignores_z() {
        let a = Point::new_3d(0, 0, 7);
        let b = Point::new(3, -4);
        assert_eq!(Point::distance_between(&a, &b), 7);
    }
}
