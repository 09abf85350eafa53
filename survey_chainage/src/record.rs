//! Raw tabular records as handed over by the presentation layer.
//!
//! A [`Record`] keeps its columns in the order they were read so that
//! annotated copies can be written back without reshuffling the caller's
//! data. Column lookups ignore ASCII case and surrounding whitespace.

use serde::{Deserialize, Serialize};

pub const POINT: &str = "Point";
pub const EASTING: &str = "Easting";
pub const NORTHING: &str = "Northing";
pub const ELEVATION: &str = "Elevation";
pub const CHAINAGE: &str = "Chainage";
pub const OFFSET: &str = "Offset";
pub const DESCRIPTION: &str = "Description";
pub const FEATURE_NAME: &str = "FeatureName";
pub const FEATURE_PREFIX: &str = "Feature_";

/// Ordered list of `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, String)>,
}

fn same_column(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Returns `true` when the column exists, even if its value is blank.
    pub fn has(&self, column: &str) -> bool {
        self.fields.iter().any(|(k, _)| same_column(k, column))
    }

    /// Raw text of a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| same_column(k, column))
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed, non-empty text of a column.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Parses a column as a finite number. Blank, unparseable and
    /// non-finite values (`NaN`, `inf`) are all treated as missing.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.text(column)?
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Sets a column, replacing it in place if it already exists.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| same_column(k, column)) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    /// Builder-style variant of [`Record::set`].
    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            let k: String = k.into();
            record.set(&k, v);
        }
        record
    }
}

/// Required columns that appear in none of `records`.
pub(crate) fn absent_columns(records: &[Record], required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|col| !records.iter().any(|r| r.has(col)))
        .map(|col| col.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let r = Record::new().with(" easting ", "12.5");
        assert!(r.has(EASTING));
        assert_eq!(r.number(EASTING), Some(12.5));
    }

    #[test]
    fn invalid_numbers_are_missing() {
        let r = Record::new()
            .with(NORTHING, "")
            .with(EASTING, "NaN")
            .with(CHAINAGE, "abc")
            .with(ELEVATION, "inf");
        assert_eq!(r.number(NORTHING), None);
        assert_eq!(r.number(EASTING), None);
        assert_eq!(r.number(CHAINAGE), None);
        assert_eq!(r.number(ELEVATION), None);
        assert_eq!(r.number(POINT), None);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut r: Record = [(POINT, "1"), (CHAINAGE, ""), (DESCRIPTION, "EP")]
            .into_iter()
            .collect();
        r.set("chainage", "5.000");
        r.set(OFFSET, "1.000");
        let cols: Vec<&str> = r.columns().collect();
        assert_eq!(cols, vec![POINT, CHAINAGE, DESCRIPTION, OFFSET]);
        assert_eq!(r.get(CHAINAGE), Some("5.000"));
    }

    #[test]
    fn absent_columns_checks_whole_batch() {
        let records = vec![
            Record::new().with(POINT, "1"),
            Record::new().with(EASTING, "1.0"),
        ];
        let missing = absent_columns(&records, &[POINT, EASTING, NORTHING]);
        assert_eq!(missing, vec![NORTHING.to_string()]);
    }
}
