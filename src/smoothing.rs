//! Curve smoothing for wall outlines
//!
//! Turns an ordered list of points into a chain of cubic Bezier segments.
//! Each control point sits on the line through the current point parallel to
//! the chord between its neighbours, at `smoothing` times the chord length.
//! Straight input therefore yields straight curves.

use std::f64::consts::PI;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// One cubic Bezier segment; the start is the previous segment's end
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicSegment {
    pub c1: (f64, f64),
    pub c2: (f64, f64),
    pub end: (f64, f64),
}

/// A smoothed open path
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePath {
    pub start: Option<(f64, f64)>,
    pub segments: Vec<CubicSegment>,
}

impl CurvePath {
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// SVG path data: `M x,y C c1 c2 end ...`
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        let Some(start) = self.start else {
            return d;
        };

        let _ = write!(d, "M {},{}", fmt_coord(start.0), fmt_coord(start.1));
        for seg in &self.segments {
            let _ = write!(
                d,
                " C {},{} {},{} {},{}",
                fmt_coord(seg.c1.0),
                fmt_coord(seg.c1.1),
                fmt_coord(seg.c2.0),
                fmt_coord(seg.c2.1),
                fmt_coord(seg.end.0),
                fmt_coord(seg.end.1),
            );
        }
        d
    }

    /// Polyline approximation with `steps` samples per segment
    pub fn sample(&self, steps: usize) -> Vec<(f64, f64)> {
        let Some(start) = self.start else {
            return Vec::new();
        };
        let steps = steps.max(1);

        let mut points = vec![start];
        let mut p0 = start;
        for seg in &self.segments {
            for i in 1..=steps {
                let t = i as f64 / steps as f64;
                points.push(cubic_at(p0, seg.c1, seg.c2, seg.end, t));
            }
            p0 = seg.end;
        }
        points
    }
}

fn cubic_at(p0: (f64, f64), c1: (f64, f64), c2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * c1.0 + c * c2.0 + d * p3.0,
        a * p0.1 + b * c1.1 + c * c2.1 + d * p3.1,
    )
}

/// Two decimals, no trailing zeros
fn fmt_coord(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

/// Reusable smoothing settings
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Smoother {
    pub smoothing: f64,
    /// When set, y becomes `height - y` before smoothing
    pub flip_y_height: Option<i32>,
}

impl Smoother {
    pub fn new(smoothing: f64, flip_y_height: Option<i32>) -> Self {
        Self { smoothing, flip_y_height }
    }

    pub fn smooth(&self, points: &[Point]) -> CurvePath {
        match self.flip_y_height {
            Some(h) => {
                let flipped: Vec<Point> = points.iter().map(|p| Point::new(p.x, h - p.y)).collect();
                smooth_line(&flipped, self.smoothing)
            }
            None => smooth_line(points, self.smoothing),
        }
    }
}

/// Smooth a point list as given, without any flip
pub fn smooth_line(points: &[Point], smoothing: f64) -> CurvePath {
    let coords: Vec<(f64, f64)> = points.iter().map(Point::as_f64).collect();
    let Some(&start) = coords.first() else {
        return CurvePath::default();
    };

    let segments = (1..coords.len())
        .map(|i| {
            let previous = if i >= 2 { Some(coords[i - 2]) } else { None };
            let c1 = control_point(coords[i - 1], previous, Some(coords[i]), smoothing, false);
            let c2 = control_point(coords[i], Some(coords[i - 1]), coords.get(i + 1).copied(), smoothing, true);
            CubicSegment { c1, c2, end: coords[i] }
        })
        .collect();

    CurvePath { start: Some(start), segments }
}

/// Control point for `current`, parallel to the chord `previous -> next`.
/// Missing neighbours fall back to `current`; `reverse` points backwards.
fn control_point(
    current: (f64, f64),
    previous: Option<(f64, f64)>,
    next: Option<(f64, f64)>,
    smoothing: f64,
    reverse: bool,
) -> (f64, f64) {
    let previous = previous.unwrap_or(current);
    let next = next.unwrap_or(current);

    let dx = next.0 - previous.0;
    let dy = next.1 - previous.1;
    let angle = dy.atan2(dx) + if reverse { PI } else { 0.0 };
    let length = (dx * dx + dy * dy).sqrt() * smoothing;

    (current.0 + angle.cos() * length, current.1 + angle.sin() * length)
}
