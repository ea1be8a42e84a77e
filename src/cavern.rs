//! Organic cavern tile style
//!
//! A rectangle inset from the tile edge whose sides are resampled with
//! perpendicular jitter. Open exits cut a gap into their side with short
//! rungs running out past the tile edge; blocked sides are pulled inwards
//! and marked with a dead-end stub.

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::CavernParams;
use crate::error::InputError;
use crate::exits::{boundary_position, ExitConfig, ExitMap};
use crate::geometry::{Direction, Point};

/// Exits in tile pixels, on the tile boundary
pub fn resolve_exits(configs: &[ExitConfig], width: i32, height: i32, cell_size: i32) -> Result<ExitMap, InputError> {
    ExitMap::resolve(configs, |config| boundary_position(config, width, height, cell_size))
}

#[derive(Clone, Debug)]
pub struct CavernShape {
    /// Lower-left corner of the inset rectangle
    pub origin: Point,
    pub width: i32,
    pub height: i32,
    pub exits: ExitMap,
    /// Inward pull per side; zero for open sides
    pub offsets: BTreeMap<Direction, Point>,
    /// Jittered samples per side, in clockwise order
    pub sides: BTreeMap<Direction, Vec<Point>>,
    /// Closed outline; the first point is repeated at the end
    pub perimeter: Vec<Point>,
    pub stubs: Vec<(Direction, Vec<Point>)>,
}

impl CavernShape {
    pub fn new(tile_width: i32, tile_height: i32, exits: ExitMap, params: &CavernParams, rng: &mut ChaCha8Rng) -> Self {
        let origin = Point::new(params.margin, params.margin);
        let width = tile_width - 2 * params.margin;
        let height = tile_height - 2 * params.margin;

        let offsets = wall_offsets(&exits, params, rng);
        let mut sides = side_samples(origin, width, height, &offsets, params, rng);
        let perimeter = perimeter(&exits, &mut sides, params);
        let stubs = stubs(&exits, &offsets, params);

        Self {
            origin,
            width,
            height,
            exits,
            offsets,
            sides,
            perimeter,
            stubs,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.perimeter.len() > 1 && self.perimeter.first() == self.perimeter.last()
    }
}

fn wall_offsets(exits: &ExitMap, params: &CavernParams, rng: &mut ChaCha8Rng) -> BTreeMap<Direction, Point> {
    let (low, high) = params.blocked_inset;
    Direction::PLANAR
        .into_iter()
        .map(|direction| {
            let amount = rng.gen_range(low..=high);
            let offset = if !exits.is_blocked(direction) {
                Point::default()
            } else if direction.is_horizontal_side() {
                Point::new(0, amount)
            } else {
                Point::new(amount, 0)
            };
            (direction, offset)
        })
        .collect()
}

fn side_samples(
    origin: Point,
    width: i32,
    height: i32,
    offsets: &BTreeMap<Direction, Point>,
    params: &CavernParams,
    rng: &mut ChaCha8Rng,
) -> BTreeMap<Direction, Vec<Point>> {
    let offset = |d: Direction| offsets.get(&d).copied().unwrap_or_default();
    let across = Point::new(params.spacing, 0);
    let upwards = Point::new(0, params.spacing);
    let (left, right) = (origin.x, origin.x + width);
    let (bottom, top) = (origin.y, origin.y + height);

    let mut sides = BTreeMap::new();

    let y = top - offset(Direction::Up).y;
    sides.insert(Direction::Up, sample_line(Point::new(left, y), Point::new(right, y), across, params.wobbliness, rng));

    let x = right - offset(Direction::Right).x;
    let mut side = sample_line(Point::new(x, bottom), Point::new(x, top), upwards, params.wobbliness, rng);
    side.reverse();
    sides.insert(Direction::Right, side);

    let y = bottom + offset(Direction::Down).y;
    let mut side = sample_line(Point::new(left, y), Point::new(right, y), across, params.wobbliness, rng);
    side.reverse();
    sides.insert(Direction::Down, side);

    let x = left + offset(Direction::Left).x;
    sides.insert(Direction::Left, sample_line(Point::new(x, bottom), Point::new(x, top), upwards, params.wobbliness, rng));

    sides
}

/// Samples from `start` towards `end` every `increment`, jittered across the
/// line. The two corner samples are dropped.
fn sample_line(start: Point, end: Point, increment: Point, wobbliness: i32, rng: &mut ChaCha8Rng) -> Vec<Point> {
    let mut points = Vec::new();
    let mut at = start;

    while at.x <= end.x && at.y <= end.y {
        let jitter = rng.gen_range(-wobbliness..=wobbliness);
        points.push(if increment.x == 0 {
            Point::new(at.x + jitter, at.y)
        } else {
            Point::new(at.x, at.y + jitter)
        });
        at = at + increment;
    }

    if points.len() <= 2 {
        return Vec::new();
    }
    points[1..points.len() - 1].to_vec()
}

/// Move the side sample nearest to `exit_point` onto it along the side's axis
fn snap_to_exit(side: &mut [Point], direction: Direction, exit_point: Point) -> Option<usize> {
    let horizontal = direction.is_horizontal_side();
    let (idx, _) = side.iter().enumerate().min_by_key(|(_, p)| {
        if horizontal {
            (p.x - exit_point.x).abs()
        } else {
            (p.y - exit_point.y).abs()
        }
    })?;

    if horizontal {
        side[idx].x = exit_point.x;
    } else {
        side[idx].y = exit_point.y;
    }
    Some(idx)
}

fn perimeter(exits: &ExitMap, sides: &mut BTreeMap<Direction, Vec<Point>>, params: &CavernParams) -> Vec<Point> {
    let mut perimeter = Vec::new();
    for direction in Direction::PLANAR {
        perimeter.extend(corner_run(direction, direction.clockwise_of(), exits, sides, params));
    }

    if let Some(&first) = perimeter.first() {
        perimeter.push(first);
    }
    perimeter
}

/// Wall from the clockwise edge of the `from` opening round the corner to
/// the anticlockwise edge of the `to` opening.
fn corner_run(
    from: Direction,
    to: Direction,
    exits: &ExitMap,
    sides: &mut BTreeMap<Direction, Vec<Point>>,
    params: &CavernParams,
) -> Vec<Point> {
    let half = params.exit_width / 2;
    let mut run = Vec::new();

    let exit = exits[from];
    if !exit.is_blocked {
        let v = Point::direction_vector(from);
        let exit_point = Point::new(exit.point.x + v.y * half, exit.point.y - v.x * half);
        run.push(exit_point.translate(from, params.rung_offset));
        run.push(exit_point);

        let side = sides.entry(from).or_default();
        if let Some(idx) = snap_to_exit(side, from, exit_point) {
            run.extend_from_slice(&side[idx..]);
        }
    }

    let exit = exits[to];
    let side = sides.entry(to).or_default();
    if exit.is_blocked {
        run.extend_from_slice(side);
    } else {
        let v = Point::direction_vector(to);
        let exit_point = Point::new(exit.point.x - v.y * half, exit.point.y + v.x * half);
        if let Some(idx) = snap_to_exit(side, to, exit_point) {
            run.extend_from_slice(&side[..=idx]);
        }
        run.push(exit_point);
        run.push(exit_point.translate(to, params.rung_offset));
    }

    run
}

/// U-shaped dead end across each blocked opening: out past the edge, in by
/// the side's inset, across the opening and back out.
fn stubs(exits: &ExitMap, offsets: &BTreeMap<Direction, Point>, params: &CavernParams) -> Vec<(Direction, Vec<Point>)> {
    let half = params.exit_width / 2;

    exits
        .iter()
        .filter(|(_, exit)| exit.is_blocked)
        .map(|(direction, exit)| {
            let offset = offsets.get(&direction).copied().unwrap_or_default();
            let inset = offset.x.abs().max(offset.y.abs());

            let start = exit.point.translate(direction.clockwise_of(), half);
            let outer_a = start.translate(direction, params.rung_offset);
            let inner_a = start.translate(direction.mirror_of(), inset);
            let inner_b = inner_a.translate(direction.anticlockwise_of(), params.exit_width);
            let outer_b = inner_b.translate(direction, inset + params.rung_offset);

            (direction, vec![outer_a, inner_a, inner_b, outer_b])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn shape(configs: &[ExitConfig], seed: u64) -> CavernShape {
        let exits = resolve_exits(configs, 600, 400, 100).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        CavernShape::new(600, 400, exits, &CavernParams::default(), &mut rng)
    }

    fn reference() -> Vec<ExitConfig> {
        vec![
            ExitConfig::open(Direction::Up, 4),
            ExitConfig::open(Direction::Down, 1),
            ExitConfig::blocked(Direction::Left, 3),
            ExitConfig::blocked(Direction::Right, 3),
        ]
    }

    #[test]
    fn test_perimeter_is_closed() {
        let all_open: Vec<ExitConfig> = Direction::PLANAR.iter().map(|&d| ExitConfig::open(d, 2)).collect();
        for seed in 0..50 {
            assert!(shape(&all_open, seed).is_closed(), "seed {}", seed);
            assert!(shape(&reference(), seed).is_closed(), "seed {}", seed);
        }
    }

    #[test]
    fn test_open_exits_are_snapped_exactly() {
        let cavern = shape(&reference(), 4);

        // Up exit at x=400: gap edges at 350 and 450, rungs 30 px past the edge
        for p in [Point::new(450, 400), Point::new(450, 430), Point::new(350, 400), Point::new(350, 430)] {
            assert!(cavern.perimeter.contains(&p), "missing {}", p);
        }
        // Down exit at x=100
        for p in [Point::new(50, 0), Point::new(150, 0), Point::new(150, -30)] {
            assert!(cavern.perimeter.contains(&p), "missing {}", p);
        }
        assert!(cavern.sides[&Direction::Up].iter().any(|p| p.x == 450));
    }

    #[test]
    fn test_blocked_sides_are_pulled_in_with_stubs() {
        let params = CavernParams::default();
        let cavern = shape(&reference(), 11);

        assert_eq!(cavern.stubs.len(), 2);
        assert_eq!(cavern.offsets[&Direction::Up], Point::default());

        let inset = cavern.offsets[&Direction::Left].x;
        assert!((20..=40).contains(&inset));
        // Left side runs at margin + inset, jittered by at most the wobble
        for p in &cavern.sides[&Direction::Left] {
            assert!((p.x - (50 + inset)).abs() <= params.wobbliness, "{}", p);
        }

        let (direction, stub) = &cavern.stubs[1];
        assert_eq!(*direction, Direction::Left);
        assert_eq!(
            stub,
            &vec![Point::new(-30, 350), Point::new(inset, 350), Point::new(inset, 250), Point::new(-30, 250)]
        );
    }

    #[test]
    fn test_sample_line_drops_corners() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let points = sample_line(Point::new(50, 350), Point::new(550, 350), Point::new(45, 0), 0, &mut rng);
        assert_eq!(points.len(), 10);
        assert_eq!(points[0], Point::new(95, 350));
        assert_eq!(points[9], Point::new(500, 350));

        let short = sample_line(Point::new(0, 0), Point::new(0, 40), Point::new(0, 45), 5, &mut rng);
        assert!(short.is_empty());
    }

    #[test]
    fn test_same_seed_same_outline() {
        let a = shape(&reference(), 99);
        let b = shape(&reference(), 99);
        assert_eq!(a.perimeter, b.perimeter);
        assert_eq!(a.stubs, b.stubs);
    }
}
