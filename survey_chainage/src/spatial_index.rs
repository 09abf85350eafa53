//! Static nearest-vertex index over centerline vertices.
//!
//! Built once per centerline with an R-tree bulk load. Runs of identical
//! consecutive vertices collapse into a single entry that remembers the
//! vertex range it stands for, so callers can step over zero-length
//! segments when refining a match.
//!
//! Each entry's envelope is padded by its reach, half the longest segment
//! touching it. A segment passing within `r` of a query point then has an
//! endpoint whose padded envelope meets the square of half-width `r` around
//! that point, which keeps segment searches local to the query.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::{distance, Point};

/// A centerline vertex stored in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedVertex {
    pub position: Point,
    /// First vertex index of the run of identical vertices.
    pub first: usize,
    /// Last vertex index of the run (equal to `first` for a single vertex).
    pub last: usize,
    /// Half the length of the longest segment leaving the run.
    pub reach: f64,
}

impl RTreeObject for IndexedVertex {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let Point { x, y } = self.position;
        let r = self.reach;
        AABB::from_corners([x - r, y - r], [x + r, y + r])
    }
}

impl PointDistance for IndexedVertex {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position.x - point[0];
        let dy = self.position.y - point[1];
        dx * dx + dy * dy
    }
}

/// Nearest-neighbour index over the vertices of a polyline.
#[derive(Debug)]
pub struct VertexIndex {
    tree: RTree<IndexedVertex>,
}

impl VertexIndex {
    /// Bulk loads the index from polyline vertices.
    pub fn build(vertices: &[Point]) -> Self {
        let mut entries: Vec<IndexedVertex> = Vec::with_capacity(vertices.len());
        for (i, v) in vertices.iter().enumerate() {
            match entries.last_mut() {
                Some(run) if distance(run.position, *v) < f64::EPSILON => run.last = i,
                _ => entries.push(IndexedVertex {
                    position: *v,
                    first: i,
                    last: i,
                    reach: 0.0,
                }),
            }
        }
        for entry in &mut entries {
            let before = entry
                .first
                .checked_sub(1)
                .map_or(0.0, |prev| distance(vertices[prev], entry.position));
            let after = vertices
                .get(entry.last + 1)
                .map_or(0.0, |next| distance(entry.position, *next));
            entry.reach = before.max(after) / 2.0;
        }
        log::debug!(
            "vertex index: {} entries for {} vertices",
            entries.len(),
            vertices.len()
        );
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Vertex entry closest to `p` by Euclidean distance. `None` for an
    /// empty index or a non-finite `p`.
    pub fn nearest(&self, p: Point) -> Option<&IndexedVertex> {
        if !p.is_finite() {
            return None;
        }
        self.tree.nearest_neighbor(&[p.x, p.y])
    }

    /// Entries that may bound a segment passing within `radius` of `p`:
    /// every entry with `|p - v| <= hypot(radius, v.reach)`, in no
    /// particular order.
    pub fn near_segments(&self, p: Point, radius: f64) -> impl Iterator<Item = &IndexedVertex> {
        let query = AABB::from_corners(
            [p.x - radius, p.y - radius],
            [p.x + radius, p.y + radius],
        );
        let radius_2 = radius * radius;
        self.tree
            .locate_in_envelope_intersecting(&query)
            .filter(move |v| v.distance_2(&[p.x, p.y]) <= radius_2 + v.reach * v.reach)
    }

    /// Number of entries after collapsing repeated vertices.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
