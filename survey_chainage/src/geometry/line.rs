//! Basic 2D line segment used by the projection engine.

use super::{distance, Point};

/// Representation of a 2D line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    /// Creates a new line segment.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Returns the length of the line segment.
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Returns `true` when start and end coincide.
    pub fn is_degenerate(&self) -> bool {
        self.length() < f64::EPSILON
    }

    /// Parameter of the orthogonal foot of `p` on this segment, clamped to
    /// `[0, 1]`. A degenerate segment acts as its start point and yields `0`.
    pub fn closest_param(&self, p: Point) -> f64 {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len2 = dx * dx + dy * dy;
        if len2.sqrt() < f64::EPSILON {
            return 0.0;
        }
        let t = ((p.x - self.start.x) * dx + (p.y - self.start.y) * dy) / len2;
        t.clamp(0.0, 1.0)
    }

    /// Returns the point at parameter `t` along the segment. `t = 0` and
    /// `t = 1` return the endpoints exactly.
    pub fn point_at(&self, t: f64) -> Point {
        Point::new(
            (1.0 - t) * self.start.x + t * self.end.x,
            (1.0 - t) * self.start.y + t * self.end.y,
        )
    }

    /// Closest point on the segment to `p` together with its parameter.
    pub fn closest_point(&self, p: Point) -> (Point, f64) {
        let t = self.closest_param(p);
        (self.point_at(t), t)
    }
}
