//! Core library for locating survey points along a reference centerline.
//!
//! An alignment (chainage-tagged points) is turned into a [`Centerline`];
//! survey points are then projected onto it to obtain a chainage and an
//! offset for each one.

pub mod alignment;
pub mod config;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod io;
pub mod projection;
pub mod record;
pub mod spatial_index;

pub use alignment::{build_centerline, AlignmentPoint, Centerline};
pub use config::{ChainageReference, ProjectionOptions, Rounding};
pub use error::{ChainageError, Result};
pub use projection::{
    annotate_records, project, project_with, survey_points, Projection, ProjectionResult,
    Projector, SurveyPoint,
};
pub use record::Record;
