//! File input and output helpers for alignment and survey data.

use std::fs::File;
use std::io::{self, Read, Write};

use log::{debug, warn};

use crate::config::{ProjectionOptions, MAX_DECIMALS};
use crate::error::{ChainageError, Result};
use crate::record::{
    Record, CHAINAGE, DESCRIPTION, EASTING, ELEVATION, FEATURE_PREFIX, NORTHING, POINT,
};

/// Reads a file to string.
pub fn read_to_string(path: &str) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Column layouts understood by the CSV readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointFileFormat {
    /// The first row names the columns.
    Header,
    /// Point, Northing, Easting, Elevation, Description.
    PNEZD,
    /// Point, Easting, Northing, Elevation, Description.
    PENZD,
    /// Point, Easting, Northing, Chainage, Description.
    PENCD,
    /// Point, Northing, Easting, Chainage, Description.
    PNECD,
}

impl PointFileFormat {
    /// Parses a string to a [`PointFileFormat`]. Case insensitive.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "header" | "headers" => Some(Self::Header),
            "pnezd" => Some(Self::PNEZD),
            "penzd" => Some(Self::PENZD),
            "pencd" => Some(Self::PENCD),
            "pnecd" => Some(Self::PNECD),
            _ => None,
        }
    }

    /// Names of the leading positional columns, or `None` for [`Self::Header`].
    pub fn columns(&self) -> Option<[&'static str; 5]> {
        match self {
            Self::Header => None,
            Self::PNEZD => Some([POINT, NORTHING, EASTING, ELEVATION, DESCRIPTION]),
            Self::PENZD => Some([POINT, EASTING, NORTHING, ELEVATION, DESCRIPTION]),
            Self::PENCD => Some([POINT, EASTING, NORTHING, CHAINAGE, DESCRIPTION]),
            Self::PNECD => Some([POINT, NORTHING, EASTING, CHAINAGE, DESCRIPTION]),
        }
    }
}

/// Reads records from a CSV file.
pub fn read_records_csv(path: &str, format: PointFileFormat) -> Result<Vec<Record>> {
    let file = File::open(path)?;
    let records = read_records(file, format)?;
    debug!("read {} record(s) from {}", records.len(), path);
    Ok(records)
}

/// Reads records from any CSV source.
///
/// Positional formats treat the first row as a title row and name the
/// columns after the layout, with extra columns becoming `Feature_1`,
/// `Feature_2`, .... Leading rows whose easting cell reads `Easting` are
/// repeated headers and are skipped.
pub fn read_records<R: Read>(reader: R, format: PointFileFormat) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for row in rdr.records() {
        rows.push(row?);
    }
    let mut rows = rows.into_iter();

    let Some(layout) = format.columns() else {
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let names: Vec<String> = header.iter().map(str::to_string).collect();
        return Ok(rows.map(|row| named_record(&names, &row)).collect());
    };

    // Title row.
    rows.next();
    let rows: Vec<csv::StringRecord> = rows.collect();
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    if !rows.is_empty() && width < layout.len() {
        return Err(ChainageError::missing_columns(
            layout[width..].iter().map(|c| c.to_string()).collect(),
        ));
    }
    let mut names: Vec<String> = layout.iter().map(|c| c.to_string()).collect();
    for n in 1..=width.saturating_sub(layout.len()) {
        names.push(format!("{FEATURE_PREFIX}{n}"));
    }

    Ok(rows
        .iter()
        .map(|row| named_record(&names, row))
        .skip_while(|rec| {
            rec.get(EASTING)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(EASTING))
        })
        .collect())
}

fn named_record(names: &[String], row: &csv::StringRecord) -> Record {
    names
        .iter()
        .zip(row.iter())
        .map(|(name, value)| (name.clone(), value.to_string()))
        .collect()
}

/// Writes records to a CSV file with a header row.
pub fn write_records_csv(path: &str, records: &[Record]) -> Result<()> {
    let file = File::create(path)?;
    write_records(file, records)?;
    debug!("wrote {} record(s) to {}", records.len(), path);
    Ok(())
}

/// Writes records as CSV. The header is the union of all columns in the
/// order they are first seen.
pub fn write_records<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut columns: Vec<&str> = Vec::new();
    for rec in records {
        for col in rec.columns() {
            if !columns.iter().any(|c| c.trim().eq_ignore_ascii_case(col.trim())) {
                columns.push(col);
            }
        }
    }
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&columns)?;
    for rec in records {
        wtr.write_record(columns.iter().map(|c| rec.get(c).unwrap_or("")))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Loads projection options from a JSON file. Missing keys take defaults.
pub fn read_options_json(path: &str) -> Result<ProjectionOptions> {
    let contents = read_to_string(path)?;
    let options: ProjectionOptions = serde_json::from_str(&contents)?;
    if options.decimals > MAX_DECIMALS {
        warn!(
            "{}: decimals {} exceeds {}, clamping",
            path, options.decimals, MAX_DECIMALS
        );
    }
    Ok(options)
}
