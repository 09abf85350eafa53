//! Reference centerline built from chainage-tagged alignment points.

use log::{debug, info, warn};

use crate::error::{ChainageError, Result};
use crate::geometry::{distance, Point, Polyline};
use crate::record::{self, Record, CHAINAGE, EASTING, NORTHING, POINT};

/// Columns every alignment batch must carry.
pub const ALIGNMENT_COLUMNS: [&str; 4] = [POINT, NORTHING, EASTING, CHAINAGE];

/// A single chainage-tagged point of the alignment.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AlignmentPoint {
    pub id: Option<String>,
    pub easting: f64,
    pub northing: f64,
    pub chainage: f64,
}

impl AlignmentPoint {
    pub fn new(easting: f64, northing: f64, chainage: f64) -> Self {
        Self {
            id: None,
            easting,
            northing,
            chainage,
        }
    }

    /// Attaches a point identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Reads an alignment point from a record. Returns `None` when the
    /// easting, northing or chainage value is missing or unparseable.
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record.text(POINT).map(str::to_string),
            easting: record.number(EASTING)?,
            northing: record.number(NORTHING)?,
            chainage: record.number(CHAINAGE)?,
        })
    }

    pub fn position(&self) -> Point {
        Point::new(self.easting, self.northing)
    }

    fn is_finite(&self) -> bool {
        self.easting.is_finite() && self.northing.is_finite() && self.chainage.is_finite()
    }
}

/// Ordered reference path used for chainage and offset computation.
///
/// Points are sorted ascending by chainage; equal chainages keep their input
/// order. The vertex list and the cumulative arc-length table are computed
/// once and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Centerline {
    points: Vec<AlignmentPoint>,
    polyline: Polyline,
    cumulative: Vec<f64>,
}

impl Centerline {
    /// Builds a centerline from typed points. Non-finite points are dropped.
    pub fn from_points(points: Vec<AlignmentPoint>) -> Result<Self> {
        let total = points.len();
        let mut points: Vec<AlignmentPoint> =
            points.into_iter().filter(|p| p.is_finite()).collect();
        if points.len() < total {
            warn!(
                "dropped {} alignment point(s) with non-finite values",
                total - points.len()
            );
        }
        if points.len() < 2 {
            return Err(ChainageError::InsufficientData {
                valid: points.len(),
            });
        }
        // `sort_by` is stable, so equal chainages keep input order.
        points.sort_by(|a, b| a.chainage.total_cmp(&b.chainage));

        let polyline = Polyline::new(points.iter().map(AlignmentPoint::position).collect());
        let cumulative = polyline.cumulative_lengths();
        let centerline = Self {
            points,
            polyline,
            cumulative,
        };
        info!(
            "centerline built: {} vertices, length {:.3}",
            centerline.len(),
            centerline.length()
        );
        Ok(centerline)
    }

    /// Sorted alignment points.
    pub fn points(&self) -> &[AlignmentPoint] {
        &self.points
    }

    pub fn polyline(&self) -> &Polyline {
        &self.polyline
    }

    pub fn vertices(&self) -> &[Point] {
        &self.polyline.vertices
    }

    /// Arc length from the first vertex to every vertex.
    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.cumulative
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total arc length of the centerline.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn distinct_vertex_count(&self) -> usize {
        self.polyline.distinct_vertex_count()
    }

    /// Stored chainage of the first point.
    pub fn start_chainage(&self) -> f64 {
        self.points.first().map(|p| p.chainage).unwrap_or(0.0)
    }

    /// Stored chainage of the last point.
    pub fn end_chainage(&self) -> f64 {
        self.points.last().map(|p| p.chainage).unwrap_or(0.0)
    }

    /// Returns the position at the given arc length along the centerline.
    pub fn point_at(&self, station: f64) -> Option<Point> {
        if !(0.0..=self.length()).contains(&station) {
            return None;
        }
        for (i, pair) in self.polyline.vertices.windows(2).enumerate() {
            let len = distance(pair[0], pair[1]);
            let end = self.cumulative[i] + len;
            if station <= end {
                let t = if len < f64::EPSILON {
                    0.0
                } else {
                    (station - self.cumulative[i]) / len
                };
                return Some(Point::new(
                    pair[0].x + t * (pair[1].x - pair[0].x),
                    pair[0].y + t * (pair[1].y - pair[0].y),
                ));
            }
        }
        self.polyline.vertices.last().copied()
    }

    /// Converts the centerline into a `geo_types::LineString` for GIS tooling.
    pub fn to_line_string(&self) -> geo_types::LineString<f64> {
        geo_types::LineString::from(
            self.polyline
                .vertices
                .iter()
                .map(|p| geo_types::Coord::from(*p))
                .collect::<Vec<_>>(),
        )
    }
}

/// Builds the centerline from raw alignment records.
///
/// Every column in [`ALIGNMENT_COLUMNS`] has to appear somewhere in the batch.
/// Individual records with a missing or unparseable easting, northing or
/// chainage are logged and skipped.
pub fn build_centerline(records: &[Record]) -> Result<Centerline> {
    let absent = record::absent_columns(records, &ALIGNMENT_COLUMNS);
    if !absent.is_empty() {
        return Err(ChainageError::missing_columns(absent));
    }

    let mut points = Vec::with_capacity(records.len());
    for (idx, rec) in records.iter().enumerate() {
        match AlignmentPoint::from_record(rec) {
            Some(p) => points.push(p),
            None => warn!(
                "alignment record {} ({}) skipped: missing easting, northing or chainage",
                idx,
                rec.text(POINT).unwrap_or("no id")
            ),
        }
    }
    debug!(
        "{} of {} alignment records usable",
        points.len(),
        records.len()
    );
    Centerline::from_points(points)
}
