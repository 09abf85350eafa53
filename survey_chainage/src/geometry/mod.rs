//! Basic geometry primitives for alignment work.

mod line;
mod point;

pub use line::Line;
pub use point::Point;

/// Calculates the Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
}

/// Representation of a series of connected line segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub vertices: Vec<Point>,
}

impl Polyline {
    /// Creates a new polyline from a list of vertices.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Returns the total length of all segments in the polyline.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| distance(pair[0], pair[1]))
            .sum()
    }

    /// Returns the segment starting at vertex `index`, if any.
    pub fn segment(&self, index: usize) -> Option<Line> {
        let start = *self.vertices.get(index)?;
        let end = *self.vertices.get(index + 1)?;
        Some(Line::new(start, end))
    }

    /// Running arc length at every vertex, starting at `0.0`.
    pub fn cumulative_lengths(&self) -> Vec<f64> {
        let mut total = 0.0;
        let mut out = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            if i > 0 {
                total += distance(self.vertices[i - 1], *v);
            }
            out.push(total);
        }
        out
    }

    /// Number of vertices left after collapsing runs of identical
    /// consecutive vertices.
    pub fn distinct_vertex_count(&self) -> usize {
        if self.vertices.is_empty() {
            return 0;
        }
        1 + self
            .vertices
            .windows(2)
            .filter(|pair| distance(pair[0], pair[1]) >= f64::EPSILON)
            .count()
    }
}
