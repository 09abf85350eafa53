//! Error types for chainage and offset computation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainageError {
    /// Required columns are absent from a batch, or a single survey record
    /// lacks its coordinates.
    #[error("{}", schema_message(.fields, .record))]
    Schema {
        fields: Vec<String>,
        record: Option<usize>,
    },

    #[error("insufficient alignment data: {valid} valid point(s), at least 2 required")]
    InsufficientData { valid: usize },

    #[error("degenerate centerline: {distinct} distinct vertex(es), at least 2 required")]
    Geometry { distinct: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

fn schema_message(fields: &[String], record: &Option<usize>) -> String {
    match record {
        Some(idx) => format!("record {}: missing or invalid {}", idx, fields.join(", ")),
        None => format!("missing required column(s): {}", fields.join(", ")),
    }
}

impl ChainageError {
    pub(crate) fn missing_columns(fields: Vec<String>) -> Self {
        ChainageError::Schema {
            fields,
            record: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChainageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_messages() {
        let batch = ChainageError::missing_columns(vec!["Easting".into(), "Chainage".into()]);
        assert_eq!(
            batch.to_string(),
            "missing required column(s): Easting, Chainage"
        );
        let single = ChainageError::Schema {
            fields: vec!["Northing".into()],
            record: Some(4),
        };
        assert_eq!(single.to_string(), "record 4: missing or invalid Northing");
    }
}
