//! Wall polylines traced around the corridor network
//!
//! Each open exit owns the wall that runs from its clockwise-side corner to
//! the next open exit clockwise, hugging the outer bends of the corridor
//! between them. Blocked exits get a short closed-off stub instead. Every
//! straight run is then resampled with perpendicular jitter.

use log::trace;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::TunnelParams;
use crate::error::GeometryError;
use crate::geometry::{Direction, Point, Rectangle};

use super::grid::Grid;
use super::path::Path;

/// Wall points belonging to one exit, in tile coordinates
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Elbow {
    pub direction: Direction,
    pub is_blocked: bool,
    pub points: Vec<Point>,
}

#[derive(Clone, Debug)]
pub struct ElbowMaker {
    elbows: Vec<Elbow>,
}

impl ElbowMaker {
    pub fn new(grid: &Grid, path: &Path, params: &TunnelParams, rng: &mut ChaCha8Rng) -> Result<Self, GeometryError> {
        let mut elbows = Vec::with_capacity(4);

        for (direction, exit) in path.exits().iter() {
            let corners = if exit.is_blocked {
                blocked_stub(grid, path, direction, exit.point)
            } else {
                open_elbow(grid, path, direction, params.exit_offset)?
            };
            trace!("{} elbow corners: {:?}", direction, corners);

            elbows.push(Elbow {
                direction,
                is_blocked: exit.is_blocked,
                points: insert_jitter(&corners, params, rng)?,
            });
        }

        Ok(Self { elbows })
    }

    /// Elbows in up/right/down/left order
    pub fn elbows(&self) -> &[Elbow] {
        &self.elbows
    }

    /// Open elbows concatenated into one wall, plus the blocked stubs
    pub fn connected_elbows(&self) -> (Vec<Point>, Vec<(Direction, Vec<Point>)>) {
        let mut connected = Vec::new();
        let mut stubs = Vec::new();

        for elbow in &self.elbows {
            if elbow.is_blocked {
                stubs.push((elbow.direction, elbow.points.clone()));
            } else {
                connected.extend_from_slice(&elbow.points);
            }
        }

        (connected, stubs)
    }
}

fn open_elbow(grid: &Grid, path: &Path, direction: Direction, offset: i32) -> Result<Vec<Point>, GeometryError> {
    let exits = path.exits();
    let start = exits[direction].point;

    let target_dir = exits
        .first_open_from(direction.clockwise_of())
        .ok_or(GeometryError::NoOpenExit { from: direction })?;
    let target = exits[target_dir].point;

    let route = path
        .get_path_between(start, target)
        .ok_or(GeometryError::NoCorridor { from: direction, to: target_dir })?;

    let mut corners = vec![leaving_corner(&grid.get_rect_at(&start), direction).translate(direction, offset)];

    for window in route.windows(3) {
        let (prev, current, next) = (window[0], window[1], window[2]);
        let prev_intersect = corners[corners.len() - 1];
        if let Some(corner) = intersection(grid, prev, current, next, prev_intersect) {
            corners.push(corner);
        }
    }

    corners.push(arriving_corner(&grid.get_rect_at(&target), target_dir).translate(target_dir, offset));
    Ok(corners)
}

/// Corner an elbow starts from: the clockwise side of the opening
fn leaving_corner(rect: &Rectangle, direction: Direction) -> Point {
    match direction {
        Direction::Up => rect.tr,
        Direction::Right => rect.br,
        Direction::Down => rect.bl,
        Direction::Left => rect.tl,
        Direction::Above | Direction::Below => unreachable!("{} has no planar exit", direction),
    }
}

/// Corner an elbow ends on: the anticlockwise side of the opening
fn arriving_corner(rect: &Rectangle, direction: Direction) -> Point {
    match direction {
        Direction::Up => rect.tl,
        Direction::Right => rect.tr,
        Direction::Down => rect.br,
        Direction::Left => rect.bl,
        Direction::Above | Direction::Below => unreachable!("{} has no planar exit", direction),
    }
}

/// Outer corner of the bend at `current`, aligned with the previous corner
fn intersection(grid: &Grid, prev: Point, current: Point, next: Point, prev_intersect: Point) -> Option<Point> {
    if next.x == prev.x || next.y == prev.y {
        return None;
    }

    let rect = grid.get_rect_at(&current);
    let corners = if (next.x - prev.x) * (next.y - prev.y) > 0 {
        [rect.tl, rect.br]
    } else {
        [rect.tr, rect.bl]
    };

    let vertical_first = current.x == prev.x;
    corners.into_iter().find(|corner| {
        if vertical_first {
            corner.x == prev_intersect.x
        } else {
            corner.y == prev_intersect.y
        }
    })
}

/// Closed-off opening. When a corridor reaches the cell inside the exit the
/// inner wall is pulled halfway out so the dead end stays visible.
fn blocked_stub(grid: &Grid, path: &Path, direction: Direction, exit: Point) -> Vec<Point> {
    let rect = grid.get_rect_at(&exit);
    let reached = path.is_filled(&exit.step(direction.mirror_of()));
    let amount = if direction.is_horizontal_side() { rect.height() / 2 } else { rect.width() / 2 };
    let pull = |p: Point| if reached { p.translate(direction, amount) } else { p };

    match direction {
        Direction::Up => vec![rect.tr, pull(rect.br), pull(rect.bl), rect.tl],
        Direction::Right => vec![rect.br, pull(rect.bl), pull(rect.tl), rect.tr],
        Direction::Down => vec![rect.bl, pull(rect.tl), pull(rect.tr), rect.br],
        Direction::Left => vec![rect.tl, pull(rect.tr), pull(rect.br), rect.bl],
        Direction::Above | Direction::Below => unreachable!("{} has no planar exit", direction),
    }
}

/// Resample a corner polyline. Endpoints are kept; interior corners only
/// when `keep_corners` is set.
fn insert_jitter(corners: &[Point], params: &TunnelParams, rng: &mut ChaCha8Rng) -> Result<Vec<Point>, GeometryError> {
    let (Some(&first), Some(&last)) = (corners.first(), corners.last()) else {
        return Ok(Vec::new());
    };

    let mut points = vec![first];
    for (i, pair) in corners.windows(2).enumerate() {
        if i > 0 && params.keep_corners {
            points.push(pair[0]);
        }
        points.extend(points_between(pair[0], pair[1], params, rng)?);
    }
    if corners.len() > 1 {
        points.push(last);
    }

    Ok(points)
}

/// Evenly spaced points strictly between `a` and `b`, jittered sideways
fn points_between(a: Point, b: Point, params: &TunnelParams, rng: &mut ChaCha8Rng) -> Result<Vec<Point>, GeometryError> {
    let (step, distance) = if a.x == b.x {
        (Point::new(0, (b.y - a.y).signum()), (b.y - a.y).abs())
    } else if a.y == b.y {
        (Point::new((b.x - a.x).signum(), 0), (b.x - a.x).abs())
    } else {
        return Err(GeometryError::MisalignedSegment { from: a, to: b });
    };

    let mut points = Vec::new();
    let mut i = params.spacing;
    while i < distance {
        let variation = rng.gen_range(-params.wobbliness..=params.wobbliness);
        let sideways = if step.x == 0 { Point::new(variation, 0) } else { Point::new(0, variation) };
        points.push(a + step * i + sideways);
        i += params.spacing;
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exits::{ExitConfig, ExitMap};
    use rand::SeedableRng;

    fn elbow(maker: &ElbowMaker, direction: Direction) -> &Elbow {
        maker.elbows().iter().find(|e| e.direction == direction).unwrap()
    }

    fn flat() -> TunnelParams {
        TunnelParams { wobbliness: 0, keep_corners: true, ..Default::default() }
    }

    /// Up 4 and down 1 open, left 3 and right 3 blocked, one hand-drawn corridor
    fn scenario(extra: &[Point]) -> (Grid, Path) {
        let grid = Grid::new(600, 400, 100);
        let configs = [
            ExitConfig::open(Direction::Up, 4),
            ExitConfig::blocked(Direction::Right, 3),
            ExitConfig::open(Direction::Down, 1),
            ExitConfig::blocked(Direction::Left, 3),
        ];
        let exits = ExitMap::resolve(&configs, |c| {
            let e = c.edge_position as i32;
            match c.direction {
                Direction::Up => Point::new(e, 4),
                Direction::Down => Point::new(e, 0),
                Direction::Left => Point::new(0, e),
                _ => Point::new(6, e),
            }
        })
        .unwrap();

        let mut filled = vec![
            Point::new(4, 4),
            Point::new(6, 3),
            Point::new(1, 0),
            Point::new(0, 3),
            Point::new(4, 3),
            Point::new(4, 2),
            Point::new(4, 1),
            Point::new(3, 1),
            Point::new(2, 1),
            Point::new(1, 1),
        ];
        filled.extend_from_slice(extra);
        let path = Path::with_filled(exits, &filled);
        (grid, path)
    }

    #[test]
    fn test_open_elbow_follows_outer_bends() {
        let (grid, path) = scenario(&[]);

        let up = open_elbow(&grid, &path, Direction::Up, 30).unwrap();
        assert_eq!(up, vec![Point::new(450, 430), Point::new(450, 50), Point::new(150, 50), Point::new(150, -30)]);

        let down = open_elbow(&grid, &path, Direction::Down, 30).unwrap();
        assert_eq!(down, vec![Point::new(50, -30), Point::new(50, 150), Point::new(350, 150), Point::new(350, 430)]);
    }

    #[test]
    fn test_connected_elbows_and_stubs() {
        let (grid, path) = scenario(&[]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let maker = ElbowMaker::new(&grid, &path, &TunnelParams::default(), &mut rng).unwrap();

        let (connected, stubs) = maker.connected_elbows();
        let stub_dirs: Vec<Direction> = stubs.iter().map(|(d, _)| *d).collect();
        assert_eq!(stub_dirs, vec![Direction::Right, Direction::Left]);

        // Jittered runs, corners dropped: 1 + 12 + 9 + 2 + 1 per open elbow
        let up = elbow(&maker, Direction::Up);
        assert_eq!(up.points.len(), 25);
        assert_eq!(up.points[0], Point::new(450, 430));
        assert_eq!(up.points[24], Point::new(150, -30));
        assert_eq!(connected.len(), up.points.len() + elbow(&maker, Direction::Down).points.len());
        assert_eq!(connected[0], Point::new(450, 430));
    }

    #[test]
    fn test_jitter_stays_within_wobble() {
        let (grid, path) = scenario(&[]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let maker = ElbowMaker::new(&grid, &path, &TunnelParams::default(), &mut rng).unwrap();

        // First run of the up elbow is vertical along x = 450
        let up = elbow(&maker, Direction::Up);
        for p in &up.points[1..13] {
            assert!((p.x - 450).abs() <= 10, "{}", p);
        }
    }

    #[test]
    fn test_blocked_stub_shapes() {
        let (grid, path) = scenario(&[]);
        let left = blocked_stub(&grid, &path, Direction::Left, Point::new(0, 3));
        assert_eq!(left, vec![Point::new(0, 350), Point::new(50, 350), Point::new(50, 250), Point::new(0, 250)]);

        // A corridor reaching the cell inside the exit pulls the inner wall out
        let (grid, path) = scenario(&[Point::new(1, 3)]);
        let left = blocked_stub(&grid, &path, Direction::Left, Point::new(0, 3));
        assert_eq!(left, vec![Point::new(0, 350), Point::new(25, 350), Point::new(25, 250), Point::new(0, 250)]);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let maker = ElbowMaker::new(&grid, &path, &flat(), &mut rng).unwrap();
        let stub = elbow(&maker, Direction::Left);
        assert!(stub.is_blocked);
        assert!(stub.points.contains(&Point::new(25, 350)));
        assert_eq!(stub.points[0], Point::new(0, 350));
        assert_eq!(stub.points[stub.points.len() - 1], Point::new(0, 250));
    }

    #[test]
    fn test_misaligned_segment_is_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = points_between(Point::new(0, 0), Point::new(10, 10), &flat(), &mut rng).unwrap_err();
        assert_eq!(err, GeometryError::MisalignedSegment { from: Point::new(0, 0), to: Point::new(10, 10) });

        let corners = [Point::new(0, 0), Point::new(0, 90), Point::new(40, 100)];
        assert!(insert_jitter(&corners, &flat(), &mut rng).is_err());
    }

    #[test]
    fn test_points_between_spacing() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let points = points_between(Point::new(0, 0), Point::new(0, -90), &flat(), &mut rng).unwrap();
        assert_eq!(points, vec![Point::new(0, -30), Point::new(0, -60)]);
        assert!(points_between(Point::new(5, 5), Point::new(5, 5), &flat(), &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_missing_corridor_is_retryable() {
        let grid = Grid::new(600, 400, 100);
        let configs: Vec<ExitConfig> = Direction::PLANAR.iter().map(|&d| ExitConfig::open(d, 1)).collect();
        let exits = ExitMap::resolve(&configs, |c| match c.direction {
            Direction::Up => Point::new(1, 4),
            Direction::Down => Point::new(1, 0),
            Direction::Left => Point::new(0, 1),
            _ => Point::new(6, 1),
        })
        .unwrap();
        let path = Path::with_filled(exits, &[]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let err = ElbowMaker::new(&grid, &path, &flat(), &mut rng).unwrap_err();
        assert_eq!(err, GeometryError::NoCorridor { from: Direction::Up, to: Direction::Right });
    }
}
