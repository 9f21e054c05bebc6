//! Boundary adapter: flat prompt record → typed placeholder list.
//!
//! The prompt service returns each prompt as a flat object where `keyN` holds a
//! placeholder value and `selN` holds its description. Only this module knows
//! that convention; the annotator works on `PlaceholderValue`s.

use serde_json::{Map, Value};

use crate::annotation::annotator::PlaceholderValue;

const VALUE_PREFIX: &str = "key";
const DESCRIPTION_PREFIX: &str = "sel";

/// Extracts the non-empty `key*` fields with their matching `sel*` descriptions.
///
/// Output order is by numeric suffix (`key2` before `key10`), then by name for
/// non-numeric suffixes, so tie-breaks in the annotator are reproducible.
pub fn placeholders_from_record(record: &Map<String, Value>) -> Vec<PlaceholderValue> {
    let mut entries: Vec<(&str, PlaceholderValue)> = record
        .iter()
        .filter_map(|(field, value)| {
            let suffix = field.strip_prefix(VALUE_PREFIX)?;
            let value = scalar_text(value)?;
            let description = record
                .get(&format!("{DESCRIPTION_PREFIX}{suffix}"))
                .and_then(scalar_text);
            Some((suffix, PlaceholderValue::new(value, description.as_deref())))
        })
        .collect();

    entries.sort_by(|(a, _), (b, _)| suffix_order(a).cmp(&suffix_order(b)));
    entries.into_iter().map(|(_, p)| p).collect()
}

/// Strings and numbers count; empty strings, nulls, and structured values do not.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric suffixes first, ascending; everything else after, by name.
fn suffix_order(suffix: &str) -> (bool, u64, &str) {
    match suffix.parse::<u64>() {
        Ok(n) => (false, n, suffix),
        Err(_) => (true, 0, suffix),
    }
}
