//! Sketch geometry primitives.
//!
//! Coordinates are in meters on the sketch plane. The host maps sketch
//! `(x, y)` onto whichever plane the sketch was opened on.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// A 2D point on the sketch plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate (m).
    pub x: f64,
    /// Y coordinate (m).
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A point at `radius` from `centre` in direction `angle` (radians).
    #[must_use]
    pub fn polar(centre: Self, radius: f64, angle: f64) -> Self {
        Self::new(
            radius.mul_add(angle.cos(), centre.x),
            radius.mul_add(angle.sin(), centre.y),
        )
    }
}

/// Sweep direction of a centre-point arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcDirection {
    /// Counter-clockwise from start to end.
    CounterClockwise,
    /// Clockwise from start to end.
    Clockwise,
}

/// A single entity drawn into a sketch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SketchEntity {
    /// Straight segment.
    Line { start: Point, end: Point },
    /// Full circle.
    Circle { centre: Point, radius: f64 },
    /// Centre-point arc from `start` to `end`.
    Arc {
        centre: Point,
        start: Point,
        end: Point,
        direction: ArcDirection,
    },
    /// Arc through `start`, `mid` and `end`.
    ThreePointArc { start: Point, mid: Point, end: Point },
    /// Construction line used as a revolve axis.
    CentreLine { start: Point, end: Point },
    /// Axis-aligned ellipse given by its semi-axes.
    Ellipse {
        centre: Point,
        semi_major: f64,
        semi_minor: f64,
    },
}

impl SketchEntity {
    /// Creates a line entity.
    #[must_use]
    pub const fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::Line {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    /// Whether this entity is construction geometry only.
    #[must_use]
    pub const fn is_construction(&self) -> bool {
        matches!(self, Self::CentreLine { .. })
    }

    /// Approximates the entity as a polyline with roughly `segments`
    /// pieces per full turn. Lines return their two endpoints.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn sample(&self, segments: usize) -> Vec<Point> {
        let segments = segments.max(8);
        match *self {
            Self::Line { start, end } | Self::CentreLine { start, end } => vec![start, end],
            Self::Circle { centre, radius } => (0..=segments)
                .map(|i| Point::polar(centre, radius, 2.0 * PI * i as f64 / segments as f64))
                .collect(),
            Self::Ellipse {
                centre,
                semi_major,
                semi_minor,
            } => (0..=segments)
                .map(|i| {
                    let t = 2.0 * PI * i as f64 / segments as f64;
                    Point::new(
                        semi_major.mul_add(t.cos(), centre.x),
                        semi_minor.mul_add(t.sin(), centre.y),
                    )
                })
                .collect(),
            Self::Arc {
                centre,
                start,
                end,
                direction,
            } => {
                let radius = (start.x - centre.x).hypot(start.y - centre.y);
                let a0 = (start.y - centre.y).atan2(start.x - centre.x);
                let a1 = (end.y - centre.y).atan2(end.x - centre.x);
                let sweep = match direction {
                    ArcDirection::CounterClockwise => (a1 - a0).rem_euclid(2.0 * PI),
                    ArcDirection::Clockwise => -(a0 - a1).rem_euclid(2.0 * PI),
                };
                sample_sweep(centre, radius, a0, sweep, segments)
            }
            Self::ThreePointArc { start, mid, end } => {
                let Some(centre) = circumcentre(start, mid, end) else {
                    return vec![start, mid, end];
                };
                let radius = (start.x - centre.x).hypot(start.y - centre.y);
                let angle = |p: Point| (p.y - centre.y).atan2(p.x - centre.x);
                let (a0, am, a1) = (angle(start), angle(mid), angle(end));
                let ccw = (a1 - a0).rem_euclid(2.0 * PI);
                let sweep = if (am - a0).rem_euclid(2.0 * PI) <= ccw {
                    ccw
                } else {
                    ccw - 2.0 * PI
                };
                sample_sweep(centre, radius, a0, sweep, segments)
            }
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn sample_sweep(centre: Point, radius: f64, start: f64, sweep: f64, segments: usize) -> Vec<Point> {
    let steps = ((sweep.abs() / (2.0 * PI)) * segments as f64).ceil().max(1.0) as usize;
    (0..=steps)
        .map(|i| Point::polar(centre, radius, sweep.mul_add(i as f64 / steps as f64, start)))
        .collect()
}

/// Centre of the circle through three points, if they are not collinear.
fn circumcentre(a: Point, b: Point, c: Point) -> Option<Point> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < f64::EPSILON {
        return None;
    }
    let a2 = a.x.mul_add(a.x, a.y * a.y);
    let b2 = b.x.mul_add(b.x, b.y * b.y);
    let c2 = c.x.mul_add(c.x, c.y * c.y);
    Some(Point::new(
        (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d,
        (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d,
    ))
}

/// Vertices of a regular polygon with circumradius `radius`, the first
/// vertex pointing straight down.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn polygon_vertices(centre: Point, radius: f64, sides: u32) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let angle = 2.0 * PI * f64::from(i) / f64::from(sides) - PI / 2.0;
            Point::polar(centre, radius, angle)
        })
        .collect()
}

/// Vertices of a star alternating between `outer` and `inner` radius.
#[must_use]
pub fn star_vertices(centre: Point, outer: f64, inner: f64, points: u32) -> Vec<Point> {
    (0..points * 2)
        .map(|i| {
            let angle = PI * f64::from(i) / f64::from(points) - PI / 2.0;
            let radius = if i % 2 == 0 { outer } else { inner };
            Point::polar(centre, radius, angle)
        })
        .collect()
}

/// Lines joining consecutive vertices, closing back to the first.
#[must_use]
pub fn closed_polyline(vertices: &[Point]) -> Vec<SketchEntity> {
    vertices
        .iter()
        .zip(vertices.iter().cycle().skip(1))
        .map(|(&start, &end)| SketchEntity::Line { start, end })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12
    }

    #[test]
    fn polygon_first_vertex_points_down() {
        let vertices = polygon_vertices(Point::default(), 0.01, 6);
        assert_eq!(vertices.len(), 6);
        assert!(close(vertices[0], Point::new(0.0, -0.01)));
    }

    #[test]
    fn polygon_vertices_on_circumcircle() {
        for v in polygon_vertices(Point::new(1.0, 2.0), 0.5, 8) {
            assert!(((v.x - 1.0).hypot(v.y - 2.0) - 0.5).abs() < 1e-12);
        }
    }

    #[test]
    fn star_alternates_radii() {
        let vertices = star_vertices(Point::default(), 0.02, 0.008, 5);
        assert_eq!(vertices.len(), 10);
        for (i, v) in vertices.iter().enumerate() {
            let expected = if i % 2 == 0 { 0.02 } else { 0.008 };
            assert!((v.x.hypot(v.y) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn closed_polyline_wraps_around() {
        let vertices = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let lines = closed_polyline(&vertices);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], SketchEntity::line(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn closed_polyline_of_nothing_is_empty() {
        assert!(closed_polyline(&[]).is_empty());
    }

    #[test]
    fn semicircle_samples_stay_on_radius() {
        let arc = SketchEntity::ThreePointArc {
            start: Point::new(0.0, 0.01),
            mid: Point::new(0.01, 0.0),
            end: Point::new(0.0, -0.01),
        };
        let points = arc.sample(32);
        assert!(points.len() > 3);
        for p in &points {
            assert!((p.x.hypot(p.y) - 0.01).abs() < 1e-9);
            assert!(p.x >= -1e-9, "semicircle should stay on the +x side");
        }
    }

    #[test]
    fn clockwise_arc_sweeps_right_half() {
        let arc = SketchEntity::Arc {
            centre: Point::default(),
            start: Point::new(0.0, 1.0),
            end: Point::new(0.0, -1.0),
            direction: ArcDirection::Clockwise,
        };
        for p in arc.sample(16) {
            assert!(p.x >= -1e-9);
        }
    }
}
