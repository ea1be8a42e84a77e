//! Grid overlay for corridor pathfinding
//!
//! One cell is centred on every multiple of the cell size, so the outer ring
//! is half a cell wide and the lattice covers the tile exactly.

use crate::geometry::{Point, Rectangle};
use crate::tilemap::Tilemap;

#[derive(Clone, Debug)]
pub struct Grid {
    pub tile_width: i32,
    pub tile_height: i32,
    pub cell_size: i32,
    cells: Tilemap<Rectangle>,
}

impl Grid {
    /// Deterministic for a given tile size and cell size. The tile size is
    /// expected to be a multiple of an even cell size (see `TileConfig::validate`).
    pub fn new(tile_width: i32, tile_height: i32, cell_size: i32) -> Self {
        let width = (tile_width / cell_size) as usize + 1;
        let height = (tile_height / cell_size) as usize + 1;
        let half = cell_size / 2;

        let cells = Tilemap::from_fn(width, height, |gx, gy| {
            let x = if gx > 0 { gx as i32 * cell_size - half } else { 0 };
            let y = if gy > 0 { gy as i32 * cell_size - half } else { 0 };
            let w = if gx == 0 || gx == width - 1 { half } else { cell_size };
            let h = if gy == 0 || gy == height - 1 { half } else { cell_size };
            Rectangle::from_origin(x, y, w, h)
        });

        Self {
            tile_width,
            tile_height,
            cell_size,
            cells,
        }
    }

    /// Columns
    pub fn width(&self) -> usize {
        self.cells.width
    }

    /// Rows
    pub fn height(&self) -> usize {
        self.cells.height
    }

    pub fn contains(&self, cell: &Point) -> bool {
        self.cells.in_bounds(cell.x, cell.y)
    }

    pub fn try_rect_at(&self, cell: &Point) -> Option<&Rectangle> {
        self.cells.try_get(cell.x, cell.y)
    }

    /// Rectangle of a cell in tile coordinates.
    ///
    /// Panics if `cell` lies outside the grid.
    pub fn get_rect_at(&self, cell: &Point) -> Rectangle {
        match self.try_rect_at(cell) {
            Some(rect) => *rect,
            None => panic!("cell {} outside {}x{} grid", cell, self.width(), self.height()),
        }
    }

    /// Cells on the outermost ring are never used for corridor steps
    pub fn is_on_edge(&self, cell: &Point) -> bool {
        self.contains(cell) && self.cells.is_on_edge(cell.x as usize, cell.y as usize)
    }

    /// Strictly inside the border ring
    pub fn is_interior(&self, cell: &Point) -> bool {
        self.contains(cell) && !self.is_on_edge(cell)
    }
}
