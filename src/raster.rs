//! PNG previews of rendered tiles
//!
//! Curves are sampled into polylines, the floor is filled with an even-odd
//! scanline pass and walls are stroked by stamping discs along each line.
//! Contact sheets lay many previews out on a labelled grid.

use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::Result;
use crate::geometry::Point;
use crate::render::RenderedTile;
use crate::smoothing::CurvePath;

/// Colours and sizes for raster previews
#[derive(Clone, Copy, Debug)]
pub struct RasterStyle {
    pub rock: Rgb<u8>,
    pub floor: Rgb<u8>,
    pub wall: Rgb<u8>,
    pub entity: Rgb<u8>,
    /// Wall stroke width in tile pixels
    pub wall_width: f64,
    /// Output pixels per tile pixel
    pub scale: f64,
    pub show_entities: bool,
}

impl Default for RasterStyle {
    fn default() -> Self {
        Self {
            rock: Rgb([58, 52, 48]),
            floor: Rgb([247, 250, 255]),
            wall: Rgb([0, 0, 0]),
            entity: Rgb([46, 160, 67]),
            wall_width: 6.0,
            scale: 1.0,
            show_entities: true,
        }
    }
}

/// Samples per Bezier segment
const CURVE_STEPS: usize = 12;

/// Rasterise a tile into an image of `scale * width` by `scale * height`
pub fn rasterize(tile: &RenderedTile, style: &RasterStyle) -> RgbImage {
    let width = ((tile.width as f64 * style.scale).round() as u32).max(1);
    let height = ((tile.height as f64 * style.scale).round() as u32).max(1);
    let mut img: RgbImage = ImageBuffer::from_pixel(width, height, style.rock);

    // Image rows grow downwards
    let to_image = |(x, y): (f64, f64)| {
        let y = if tile.y_flipped { y } else { tile.height as f64 - y };
        (x * style.scale, y * style.scale)
    };
    let polyline = |curve: &CurvePath| -> Vec<(f64, f64)> { curve.sample(CURVE_STEPS).into_iter().map(to_image).collect() };

    let outline = polyline(&tile.outline);
    let stubs: Vec<Vec<(f64, f64)>> = tile.stubs.iter().map(|(_, c)| polyline(c)).collect();

    fill_polygon(&mut img, &outline, style.floor);
    for stub in &stubs {
        fill_polygon(&mut img, stub, style.floor);
    }

    let radius = style.wall_width * style.scale / 2.0;
    stroke_polyline(&mut img, &outline, radius, style.wall);
    for stub in &stubs {
        stroke_polyline(&mut img, stub, radius, style.wall);
    }

    if style.show_entities {
        for p in &tile.entity_candidates {
            let centre = to_image(tile_coords(tile, p));
            stamp_disc(&mut img, centre, 6.0 * style.scale, style.entity);
        }
    }

    img
}

/// Tile point in the same frame as the curves
fn tile_coords(tile: &RenderedTile, p: &Point) -> (f64, f64) {
    if tile.y_flipped {
        (p.x as f64, (tile.height - p.y) as f64)
    } else {
        p.as_f64()
    }
}

/// Even-odd fill of the implicitly closed polygon
fn fill_polygon(img: &mut RgbImage, points: &[(f64, f64)], colour: Rgb<u8>) {
    if points.len() < 3 {
        return;
    }

    let mut crossings = Vec::new();
    for row in 0..img.height() {
        let y = row as f64 + 0.5;
        crossings.clear();

        for i in 0..points.len() {
            let (x0, y0) = points[i];
            let (x1, y1) = points[(i + 1) % points.len()];
            if (y0 <= y && y1 > y) || (y1 <= y && y0 > y) {
                crossings.push(x0 + (y - y0) / (y1 - y0) * (x1 - x0));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let start = pair[0].round().max(0.0) as u32;
            let end = (pair[1].round().max(0.0) as u32).min(img.width());
            for x in start..end {
                img.put_pixel(x, row, colour);
            }
        }
    }
}

fn stroke_polyline(img: &mut RgbImage, points: &[(f64, f64)], radius: f64, colour: Rgb<u8>) {
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        let length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let steps = (length * 2.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            stamp_disc(img, (x0 + (x1 - x0) * t, y0 + (y1 - y0) * t), radius, colour);
        }
    }
}

fn stamp_disc(img: &mut RgbImage, (cx, cy): (f64, f64), radius: f64, colour: Rgb<u8>) {
    let r = radius.max(0.5);
    let min_x = (cx - r).floor().max(0.0) as u32;
    let min_y = (cy - r).floor().max(0.0) as u32;
    let max_x = ((cx + r).ceil().max(0.0) as u32).min(img.width());
    let max_y = ((cy + r).ceil().max(0.0) as u32).min(img.height());

    for y in min_y..max_y {
        for x in min_x..max_x {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, colour);
            }
        }
    }
}

pub fn save_png(img: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    img.save(path)?;
    Ok(())
}

/// Lay out labelled previews in a grid with `cols` columns
pub fn contact_sheet(images: &[(String, RgbImage)], cols: usize) -> RgbImage {
    if images.is_empty() || cols == 0 {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images.iter().map(|(_, img)| img.width()).max().unwrap_or(1);
    let cell_height = images.iter().map(|(_, img)| img.height()).max().unwrap_or(1);
    let label_height = 16u32;
    let padding = 4u32;
    let rows = images.len().div_ceil(cols);

    let pitch_x = cell_width + padding;
    let pitch_y = cell_height + label_height + padding;
    let mut sheet: RgbImage = ImageBuffer::from_pixel(
        pitch_x * cols as u32 + padding,
        pitch_y * rows as u32 + padding,
        Rgb([24, 24, 28]),
    );

    for (idx, (label, img)) in images.iter().enumerate() {
        let x_offset = padding + (idx % cols) as u32 * pitch_x;
        let y_offset = padding + (idx / cols) as u32 * pitch_y;

        draw_text(&mut sheet, x_offset + 2, y_offset + 4, label);
        image::imageops::replace(&mut sheet, img, x_offset as i64, (y_offset + label_height) as i64);
    }

    sheet
}

/// Place equally sized tiles edge to edge, row-major from the top-left
pub fn mosaic(images: &[RgbImage], cols: usize) -> RgbImage {
    let Some(first) = images.first() else {
        return ImageBuffer::new(1, 1);
    };
    let cols = cols.max(1);
    let rows = images.len().div_ceil(cols);
    let (w, h) = first.dimensions();

    let mut out: RgbImage = ImageBuffer::new(w * cols as u32, h * rows as u32);
    for (idx, img) in images.iter().enumerate() {
        let x = (idx % cols) as u32 * w;
        let y = (idx / cols) as u32 * h;
        image::imageops::replace(&mut out, img, x as i64, y as i64);
    }
    out
}

/// 5x7 glyphs for labels: digits, the letters used in style names and a few symbols
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x06, 0x08, 0x10, 0x1f],
        '3' => [0x0e, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        'A' => [0x0e, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11],
        'C' => [0x0e, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0e],
        'D' => [0x1e, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1e],
        'E' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x1f],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1f],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'R' => [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11],
        'S' => [0x0e, 0x11, 0x10, 0x0e, 0x01, 0x11, 0x0e],
        'T' => [0x1f, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0a, 0x04],
        'X' => [0x11, 0x11, 0x0a, 0x04, 0x0a, 0x11, 0x11],
        ':' => [0x00, 0x0c, 0x0c, 0x00, 0x0c, 0x0c, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1f, 0x00, 0x00, 0x00],
        '#' => [0x0a, 0x0a, 0x1f, 0x0a, 0x1f, 0x0a, 0x0a],
        _ => [0; 7],
    }
}

fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str) {
    let white = Rgb([235, 235, 235]);
    for (i, c) in text.chars().enumerate() {
        let cx = x + i as u32 * 6;
        if cx + 5 >= img.width() {
            break;
        }
        for (row, bits) in glyph(c).iter().enumerate() {
            for col in 0..5u32 {
                if (bits >> (4 - col)) & 1 == 1 {
                    let (px, py) = (cx + col, y + row as u32);
                    if py < img.height() {
                        img.put_pixel(px, py, white);
                    }
                }
            }
        }
    }
}
