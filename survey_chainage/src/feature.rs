//! Feature-name strings built from a point's description and feature columns.
//!
//! Field data collectors export attribute pairs as consecutive columns,
//! often with a `label: value` prefix. The combined name joins the pairs
//! as `key=value` separated by `/`, e.g. `EP/Type=Weld/Size=24`.

use crate::record::{Record, DESCRIPTION, FEATURE_PREFIX};

/// Placeholder for an absent value.
pub const NA: &str = "NA";

/// Reduces a raw feature cell to its value: the text after the last `:`,
/// trimmed. Blank and `nan` cells become [`NA`].
pub fn extract_value(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NA.to_string();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("none")
    {
        return NA.to_string();
    }
    match trimmed.rsplit_once(':') {
        Some((_, value)) => value.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Joins feature values pairwise as `key=value` with `/`. A trailing key
/// without a value pairs with [`NA`]; `NA=NA` pairs are skipped.
pub fn format_feature_name(features: &[String]) -> String {
    let parts: Vec<String> = features
        .chunks(2)
        .filter_map(|pair| {
            let key = pair[0].as_str();
            let value = pair.get(1).map(String::as_str).unwrap_or(NA);
            if key == NA && value == NA {
                None
            } else {
                Some(format!("{key}={value}"))
            }
        })
        .collect();
    let joined = parts.join("/");
    let name = joined.trim_matches('/');
    if name.is_empty() {
        NA.to_string()
    } else {
        name.to_string()
    }
}

/// Values of the `Feature_1`, `Feature_2`, ... columns in numeric order.
pub fn feature_values(record: &Record) -> Vec<String> {
    let mut numbered: Vec<(usize, &str)> = record
        .iter()
        .filter_map(|(col, value)| {
            let n = col.trim().strip_prefix(FEATURE_PREFIX)?.parse::<usize>().ok()?;
            Some((n, value))
        })
        .collect();
    numbered.sort_by_key(|(n, _)| *n);
    numbered
        .into_iter()
        .map(|(_, value)| extract_value(Some(value)))
        .collect()
}

/// Full feature name of a record, prefixed by its description when present.
pub fn feature_name(record: &Record) -> String {
    let features = format_feature_name(&feature_values(record));
    let description = extract_description(record.get(DESCRIPTION));
    match description {
        Some(desc) => format!("{desc}/{features}"),
        None => features,
    }
}

fn extract_description(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || value == NA || value.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(value.to_string())
    }
}
