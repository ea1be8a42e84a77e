//! SVG output for rendered tiles
//!
//! Walls are drawn as filled, stroked paths. The optional debug overlay adds
//! the corridor cells, the raw wall samples and the entity candidates.

use std::fmt::{self, Write};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::geometry::Point;
use crate::render::RenderedTile;
use crate::smoothing::CurvePath;

const FLOOR_FILL: &str = "#f7faff";
const WALL_STROKE: &str = "#000000";
const WALL_WIDTH: u32 = 6;

/// Full SVG document for `tile`
pub fn render_svg(tile: &RenderedTile, debug: bool) -> String {
    let mut svg = String::new();
    // Writing into a String never fails
    let _ = write_document(&mut svg, tile, debug);
    svg
}

pub fn write_svg(tile: &RenderedTile, path: impl AsRef<Path>, debug: bool) -> Result<()> {
    fs::write(path, render_svg(tile, debug))?;
    Ok(())
}

fn write_document(svg: &mut String, tile: &RenderedTile, debug: bool) -> fmt::Result {
    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = tile.width,
        h = tile.height
    )?;

    if debug {
        write_debug_cells(svg, tile)?;
    }

    write_wall(svg, &tile.outline)?;
    for (_, stub) in &tile.stubs {
        write_wall(svg, stub)?;
    }

    if debug {
        write_debug_markers(svg, tile)?;
    }

    svg.push_str("</svg>\n");
    Ok(())
}

fn write_wall(svg: &mut String, curve: &CurvePath) -> fmt::Result {
    if curve.is_empty() {
        return Ok(());
    }
    writeln!(
        svg,
        r#"  <path d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
        curve.to_svg_path(),
        FLOOR_FILL,
        WALL_STROKE,
        WALL_WIDTH
    )
}

/// Point in document coordinates
fn to_document(tile: &RenderedTile, p: &Point) -> (i32, i32) {
    if tile.y_flipped {
        (p.x, tile.height - p.y)
    } else {
        (p.x, p.y)
    }
}

fn write_debug_cells(svg: &mut String, tile: &RenderedTile) -> fmt::Result {
    for rect in &tile.debug.filled_cells {
        // Top edge in document coordinates
        let corner = if tile.y_flipped { rect.tl } else { rect.bl };
        let (x, y) = to_document(tile, &corner);
        writeln!(
            svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#ffd8a8" stroke="#e8590c" stroke-width="1"/>"##,
            x,
            y,
            rect.width(),
            rect.height()
        )?;
    }
    Ok(())
}

fn write_debug_markers(svg: &mut String, tile: &RenderedTile) -> fmt::Result {
    for (index, p) in tile.debug.markers.iter().enumerate() {
        let (x, y) = to_document(tile, p);
        writeln!(svg, r##"  <circle cx="{}" cy="{}" r="4" fill="red" stroke="brown"/>"##, x, y)?;
        writeln!(
            svg,
            r##"  <text x="{}" y="{}" font-size="12" fill="blue">{}</text>"##,
            x + 5,
            y - 5,
            index
        )?;
    }

    for p in &tile.entity_candidates {
        let (x, y) = to_document(tile, p);
        writeln!(svg, r#"  <circle cx="{}" cy="{}" r="8" fill="green"/>"#, x, y)?;
    }

    for p in tile.exit_positions.values().filter(|p| p.z.is_none()) {
        let (x, y) = to_document(tile, p);
        writeln!(svg, r#"  <circle cx="{}" cy="{}" r="6" fill="none" stroke="purple" stroke-width="2"/>"#, x, y)?;
    }
    Ok(())
}
