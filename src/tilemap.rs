/// A bounded 2D lattice addressed by `(x, y)` with `y` growing upwards.
///
/// Unlike a world map, a tile lattice never wraps: cells on the border simply
/// have fewer neighbours.
#[derive(Clone, Debug)]
pub struct Tilemap<T> {
    pub width: usize,
    pub height: usize,
    data: Vec<T>,
}

impl<T> Tilemap<T> {
    /// Build a lattice by evaluating `f` at every cell
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self { width, height, data }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// True for cells in the outermost ring
    pub fn is_on_edge(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    /// Bounds-checked access with signed coordinates
    pub fn try_get(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(self.get(x as usize, y as usize))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_wrapping_at_borders() {
        let map = Tilemap::from_fn(4, 3, |x, y| (x, y));

        assert_eq!(map.try_get(3, 2), Some(&(3, 2)));
        assert!(map.try_get(-1, 0).is_none());
        assert!(map.try_get(4, 0).is_none());
        assert!(map.try_get(0, 3).is_none());
    }

    #[test]
    fn test_edge_ring() {
        let map = Tilemap::from_fn(5, 5, |_, _| ());
        let edge_count = (0..5)
            .flat_map(|y| (0..5).map(move |x| (x, y)))
            .filter(|&(x, y)| map.is_on_edge(x, y))
            .count();
        assert_eq!(edge_count, 16);
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let map = Tilemap::from_fn(3, 2, |x, y| x * 10 + y);
        assert_eq!(*map.get(0, 0), 0);
        assert_eq!(*map.get(2, 0), 20);
        assert_eq!(*map.get(1, 1), 11);
    }
}
