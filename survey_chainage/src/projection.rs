//! Projection of survey points onto a centerline.
//!
//! Each point is matched in two steps: the vertex index supplies the nearest
//! centerline vertex, then the point is projected onto the segments on
//! either side of that vertex (and of any other vertex close enough to
//! matter) and the closest of the candidates wins.
//! Chainage is measured to that closest point and the offset is the distance
//! to it.

use log::debug;

use crate::alignment::Centerline;
use crate::config::{ChainageReference, ProjectionOptions};
use crate::error::{ChainageError, Result};
use crate::geometry::{distance, Point};
use crate::record::{Record, CHAINAGE, EASTING, NORTHING, OFFSET, POINT};
use crate::spatial_index::{IndexedVertex, VertexIndex};

/// A survey observation to be located against the centerline.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyPoint {
    pub id: String,
    pub easting: f64,
    pub northing: f64,
    /// The record the point was read from, passed through untouched.
    pub attributes: Record,
}

impl SurveyPoint {
    pub fn new(id: impl Into<String>, easting: f64, northing: f64) -> Self {
        Self {
            id: id.into(),
            easting,
            northing,
            attributes: Record::new(),
        }
    }

    /// Reads a survey point from record `index` of a batch. A missing or
    /// unparseable easting or northing is a schema error for that record.
    pub fn from_record(index: usize, record: &Record) -> Result<Self> {
        let easting = record.number(EASTING);
        let northing = record.number(NORTHING);
        match (easting, northing) {
            (Some(easting), Some(northing)) => Ok(Self {
                id: record.text(POINT).unwrap_or_default().to_string(),
                easting,
                northing,
                attributes: record.clone(),
            }),
            _ => {
                let mut fields = Vec::new();
                if easting.is_none() {
                    fields.push(EASTING.to_string());
                }
                if northing.is_none() {
                    fields.push(NORTHING.to_string());
                }
                Err(ChainageError::Schema {
                    fields,
                    record: Some(index),
                })
            }
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.easting, self.northing)
    }
}

/// Rounded chainage and offset for one survey point.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectionResult {
    pub survey_point_id: String,
    pub chainage: f64,
    pub offset: f64,
}

/// Unrounded location of a point relative to the centerline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Closest point found on the centerline.
    pub foot: Point,
    /// Index of the segment holding `foot` (segment `i` runs from vertex `i`
    /// to vertex `i + 1`).
    pub segment: usize,
    /// Position of `foot` along that segment, in `[0, 1]`.
    pub param: f64,
    pub chainage: f64,
    pub offset: f64,
}

/// Closest point found so far, ordered by distance, then segment, then
/// parameter.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    foot: Point,
    segment: usize,
    param: f64,
    distance: f64,
}

impl Candidate {
    /// The vertex run itself, taken as the end of the segment arriving at
    /// the first vertex of the run (or the start of the centerline).
    fn vertex(v: &IndexedVertex, p: Point) -> Self {
        let (segment, param) = match v.first.checked_sub(1) {
            Some(prev) => (prev, 1.0),
            None => (0, 0.0),
        };
        Self {
            foot: v.position,
            segment,
            param,
            distance: distance(p, v.position),
        }
    }

    fn beats(&self, other: &Candidate) -> bool {
        self.distance < other.distance
            || (self.distance == other.distance
                && (self.segment, self.param) < (other.segment, other.param))
    }
}

/// Projection engine bound to one centerline.
///
/// The vertex index is built once in [`Projector::new`] and only read
/// afterwards, so a projector can be shared between threads.
#[derive(Debug)]
pub struct Projector<'a> {
    centerline: &'a Centerline,
    index: VertexIndex,
    options: ProjectionOptions,
}

impl<'a> Projector<'a> {
    /// Prepares the engine. Fails when the centerline has fewer than two
    /// distinct vertices, since no offset direction exists then.
    pub fn new(centerline: &'a Centerline, options: ProjectionOptions) -> Result<Self> {
        let distinct = centerline.distinct_vertex_count();
        if distinct < 2 {
            return Err(ChainageError::Geometry { distinct });
        }
        Ok(Self {
            centerline,
            index: VertexIndex::build(centerline.vertices()),
            options,
        })
    }

    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }

    /// Locates `p` against the centerline without rounding. A non-finite
    /// coordinate is a schema error.
    pub fn project_point(&self, p: Point) -> Result<Projection> {
        check_finite(p, None)?;
        Ok(self.locate(p))
    }

    /// The nearest vertex seeds the search and the segments on either side
    /// of it are checked first. Any other segment closer than that result
    /// has an endpoint `v` within `hypot(best, v.reach)` of `p`, so only
    /// those vertices are examined afterwards.
    fn locate(&self, p: Point) -> Projection {
        let mut best = match self.index.nearest(p) {
            Some(anchor) => {
                let mut best = Candidate::vertex(anchor, p);
                self.refine_around(anchor, p, &mut best);
                best
            }
            // `new` guarantees at least two vertices and `p` is finite.
            None => Candidate {
                foot: self.centerline.vertices()[0],
                segment: 0,
                param: 0.0,
                distance: distance(p, self.centerline.vertices()[0]),
            },
        };

        for v in self.index.near_segments(p, best.distance) {
            self.refine_around(v, p, &mut best);
        }

        Projection {
            foot: best.foot,
            segment: best.segment,
            param: best.param,
            chainage: self.chainage_at(best.segment, best.param),
            offset: best.distance,
        }
    }

    /// Projects `p` onto the non-degenerate segments touching a vertex run.
    fn refine_around(&self, v: &IndexedVertex, p: Point, best: &mut Candidate) {
        let polyline = self.centerline.polyline();
        let neighbours = [v.first.checked_sub(1), Some(v.last)];
        for seg in neighbours.into_iter().flatten() {
            let Some(line) = polyline.segment(seg) else {
                continue;
            };
            if line.is_degenerate() {
                continue;
            }
            let (foot, param) = line.closest_point(p);
            let candidate = Candidate {
                foot,
                segment: seg,
                param,
                distance: distance(p, foot),
            };
            if candidate.beats(best) {
                *best = candidate;
            }
        }
    }

    fn chainage_at(&self, segment: usize, t: f64) -> f64 {
        match self.options.chainage_reference {
            ChainageReference::ArcLength => {
                let cumulative = self.centerline.cumulative_lengths();
                let start = cumulative[segment];
                let end = cumulative.get(segment + 1).copied().unwrap_or(start);
                lerp(start, end, t)
            }
            ChainageReference::Stored => {
                let points = self.centerline.points();
                let start = points[segment].chainage;
                let end = points.get(segment + 1).map(|p| p.chainage).unwrap_or(start);
                lerp(start, end, t)
            }
        }
    }

    fn result_for(&self, point: &SurveyPoint) -> ProjectionResult {
        let proj = self.locate(point.position());
        ProjectionResult {
            survey_point_id: point.id.clone(),
            chainage: self.options.round(proj.chainage),
            offset: self.options.round(proj.offset),
        }
    }

    /// Projects a batch of survey points, keeping input order. The whole
    /// batch fails if any point has a non-finite coordinate.
    pub fn project(&self, survey: &[SurveyPoint]) -> Result<Vec<ProjectionResult>> {
        for (i, point) in survey.iter().enumerate() {
            check_finite(point.position(), Some(i))?;
        }
        debug!("projecting {} survey point(s)", survey.len());
        #[cfg(feature = "parallel")]
        if self.options.parallel {
            use rayon::prelude::*;
            return Ok(survey.par_iter().map(|p| self.result_for(p)).collect());
        }
        Ok(survey.iter().map(|p| self.result_for(p)).collect())
    }
}

fn check_finite(p: Point, record: Option<usize>) -> Result<()> {
    if p.is_finite() {
        return Ok(());
    }
    let mut fields = Vec::new();
    if !p.x.is_finite() {
        fields.push(EASTING.to_string());
    }
    if !p.y.is_finite() {
        fields.push(NORTHING.to_string());
    }
    Err(ChainageError::Schema { fields, record })
}

// Returns `start` exactly at `t == 0` and `end` exactly at `t == 1`.
fn lerp(start: f64, end: f64, t: f64) -> f64 {
    (1.0 - t) * start + t * end
}

/// Projects survey points with default options.
pub fn project(survey: &[SurveyPoint], centerline: &Centerline) -> Result<Vec<ProjectionResult>> {
    project_with(survey, centerline, &ProjectionOptions::default())
}

/// Projects survey points with the given options.
pub fn project_with(
    survey: &[SurveyPoint],
    centerline: &Centerline,
    options: &ProjectionOptions,
) -> Result<Vec<ProjectionResult>> {
    let projector = Projector::new(centerline, *options)?;
    projector.project(survey)
}

/// Reads every record as a survey point. Stops at the first malformed record.
pub fn survey_points(records: &[Record]) -> Result<Vec<SurveyPoint>> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| SurveyPoint::from_record(i, r))
        .collect()
}

/// Returns copies of `records` with `Chainage` and `Offset` columns set, in
/// input order. Existing columns of those names are overwritten in place.
pub fn annotate_records(
    records: &[Record],
    centerline: &Centerline,
    options: &ProjectionOptions,
) -> Result<Vec<Record>> {
    let survey = survey_points(records)?;
    let results = project_with(&survey, centerline, options)?;
    Ok(survey
        .into_iter()
        .zip(results)
        .map(|(point, res)| {
            let mut out = point.attributes;
            out.set(CHAINAGE, options.format(res.chainage));
            out.set(OFFSET, options.format(res.offset));
            out
        })
        .collect())
}
