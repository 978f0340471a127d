use crate::error::ProfileLoadError;
use crate::models::{normalize_hobbies, parse_hobbies, AttributeRecord, BudgetValue, ProfileDirectory, UserId};
use serde_json::{Map, Value};
use std::path::Path;

/// Canonical attribute names and the legacy aliases they absorb
///
/// The canonical name wins when present and non-null, otherwise the first
/// alias present is used.
pub const FIELD_ALIASES: &[(&str, &[&str])] = &[
    ("userId", &["user_id", "id"]),
    ("cleanlinessLevel", &["cleanliness"]),
    ("smokingPreference", &["smoking"]),
    ("drinkingPreference", &["drinking"]),
    ("sleepingSchedule", &["sleeping"]),
    ("hobbies", &["hobby"]),
    ("budgetRange", &["budget"]),
    ("preferredLocation", &["location"]),
];

/// Load the profile directory from a JSON or CSV file
///
/// Files ending in `.csv` are read as one profile per row with a header
/// line. Anything else is JSON holding either an array of profile objects
/// or an object with a `profiles` array.
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<ProfileDirectory, ProfileLoadError> {
    let path = path.as_ref();
    let json = if is_csv(path) {
        rows_from_csv(std::fs::File::open(path)?)?
    } else {
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)?
    };
    let directory = build_directory(&json)?;

    tracing::info!(
        "Loaded {} profiles from {}",
        directory.len(),
        path.display()
    );

    Ok(directory)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Read CSV rows into profile objects keyed by the trimmed header names
///
/// Every cell is kept as a string and blank cells become `null`, so the
/// synonym table and field coercion apply exactly as they do for JSON.
/// Short rows simply lack the trailing fields.
pub fn rows_from_csv<R: std::io::Read>(reader: R) -> Result<Value, ProfileLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| {
                let value = if cell.trim().is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                (header.to_string(), value)
            })
            .collect();
        rows.push(Value::Object(row));
    }

    Ok(Value::Array(rows))
}

/// Build a directory from already parsed JSON
pub fn build_directory(json: &Value) -> Result<ProfileDirectory, ProfileLoadError> {
    let documents = json
        .as_array()
        .or_else(|| json.get("profiles").and_then(|p| p.as_array()))
        .ok_or_else(|| ProfileLoadError::Invalid("expected an array of profiles".into()))?;

    let mut directory = ProfileDirectory::new();

    for (row, doc) in documents.iter().enumerate() {
        let Some(obj) = doc.as_object() else {
            tracing::warn!("Skipping profile row {}: not an object", row);
            continue;
        };

        let Some(record) = parse_record(obj) else {
            tracing::warn!("Skipping profile row {}: missing or invalid userId", row);
            continue;
        };

        let user_id = record.user_id;
        if directory.insert(record) {
            tracing::warn!("Duplicate userId {} at row {}, keeping the later record", user_id, row);
        }
    }

    Ok(directory)
}

/// Resolve synonyms so only canonical field names remain
///
/// Aliases are dropped from the result whether or not they were used.
pub fn resolve_aliases(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut resolved = obj.clone();

    for (canonical, aliases) in FIELD_ALIASES {
        let value = std::iter::once(*canonical)
            .chain(aliases.iter().copied())
            .filter_map(|key| obj.get(key))
            .find(|v| !v.is_null())
            .cloned();

        for alias in aliases.iter() {
            resolved.remove(*alias);
        }
        match value {
            Some(v) => {
                resolved.insert(canonical.to_string(), v);
            }
            None => {
                resolved.remove(*canonical);
            }
        }
    }

    resolved
}

/// Convert one profile object into an attribute record
///
/// Returns `None` only when no integer user id can be found. Every other
/// malformed field degrades to its neutral default.
pub fn parse_record(obj: &Map<String, Value>) -> Option<AttributeRecord> {
    let fields = resolve_aliases(obj);
    let user_id = fields.get("userId").and_then(as_user_id)?;

    Some(AttributeRecord {
        user_id,
        cleanliness: fields.get("cleanlinessLevel").and_then(|v| as_number(v, "cleanlinessLevel", user_id)),
        smoking: fields.get("smokingPreference").and_then(as_token),
        drinking: fields.get("drinkingPreference").and_then(as_token),
        sleeping: fields.get("sleepingSchedule").and_then(as_token),
        hobbies: fields.get("hobbies").map(as_hobbies).unwrap_or_default(),
        budget: fields.get("budgetRange").and_then(as_budget),
        location: fields.get("preferredLocation").and_then(as_token),
    })
}

fn as_user_id(value: &Value) -> Option<UserId> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

fn as_number(value: &Value, field: &str, user_id: UserId) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let parsed = parsed.filter(|v| v.is_finite());
    if parsed.is_none() {
        tracing::debug!("userId {}: unparseable {} {:?}, using default", user_id, field, value);
    }
    parsed
}

fn as_token(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "yes" } else { "no" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_hobbies(value: &Value) -> std::collections::BTreeSet<String> {
    match value {
        Value::String(s) => parse_hobbies(s),
        Value::Array(items) => normalize_hobbies(items.iter().filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Number(_) | Value::Bool(_) => Some(item.to_string()),
            _ => None,
        })),
        _ => Default::default(),
    }
}

fn as_budget(value: &Value) -> Option<BudgetValue> {
    match value {
        Value::Number(n) => n.as_f64().map(BudgetValue::Amount),
        Value::String(s) => Some(BudgetValue::Text(s.clone())),
        _ => None,
    }
}
