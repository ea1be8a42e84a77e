use serde::{Deserialize, Serialize};

use super::point::Point;

/// Axis-aligned rectangle stored by its four corners (y up)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    pub bl: Point,
    pub br: Point,
    pub tl: Point,
    pub tr: Point,
}

impl Rectangle {
    /// Build from the bottom-left corner and a size
    pub fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            bl: Point::new(x, y),
            br: Point::new(x + width, y),
            tl: Point::new(x, y + height),
            tr: Point::new(x + width, y + height),
        }
    }

    pub fn width(&self) -> i32 {
        self.tr.x - self.tl.x
    }

    pub fn height(&self) -> i32 {
        self.tl.y - self.bl.y
    }

    pub fn centre(&self) -> Point {
        Point::new((self.tl.x + self.tr.x) / 2, (self.tl.y + self.bl.y) / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_and_centre() {
        let rect = Rectangle::from_origin(50, 0, 100, 50);
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 50);
        assert_eq!(rect.centre(), Point::new(100, 25));
        assert_eq!(rect.br, Point::new(150, 0));
        assert_eq!(rect.tl, Point::new(50, 50));
    }
}
