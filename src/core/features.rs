use crate::models::{AttributeRecord, BudgetValue};
use std::collections::BTreeSet;
use std::ops::Index;

/// Number of signals in a pair feature vector
pub const FEATURE_COUNT: usize = 10;

/// Feature names in the exact order learned models were trained against
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "c_sim",
    "smoking_match",
    "drinking_match",
    "sleep_sim",
    "h_jacc",
    "b_sim",
    "loc_match",
    "h_overlap",
    "c_avg",
    "budget_ratio",
];

/// Maximum spread between two cleanliness levels on the 1-5 scale
const CLEANLINESS_SPREAD: f64 = 4.0;

/// Upper bound of the cleanliness scale
const CLEANLINESS_MAX: f64 = 5.0;

/// Tokens removed from budget strings before numeric parsing
const BUDGET_NOISE: [&str; 14] = [
    "₹", "$", "€", "£", "INR", "inr", "Rs.", "Rs", "USD", "usd",
    "/month", "per month", "/mo", ",",
];

/// Fixed-order comparability signals for a pair of users
///
/// Every element lies in `0.0..=1.0`. The order is part of the contract:
/// learned artifacts index into it positionally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn cleanliness_similarity(&self) -> f64 { self.0[0] }
    pub fn smoking_match(&self) -> f64 { self.0[1] }
    pub fn drinking_match(&self) -> f64 { self.0[2] }
    pub fn sleeping_compatibility(&self) -> f64 { self.0[3] }
    pub fn hobby_jaccard(&self) -> f64 { self.0[4] }
    pub fn budget_similarity(&self) -> f64 { self.0[5] }
    pub fn location_match(&self) -> f64 { self.0[6] }
    pub fn hobby_overlap(&self) -> f64 { self.0[7] }
    pub fn average_cleanliness(&self) -> f64 { self.0[8] }
    pub fn budget_ratio(&self) -> f64 { self.0[9] }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

/// Build the pair feature vector for two attribute records
///
/// Never fails. Missing or malformed attributes yield neutral values
/// (0.0 for numeric fields, empty string for tokens, empty set for hobbies).
pub fn extract(u1: &AttributeRecord, u2: &AttributeRecord) -> FeatureVector {
    let c1 = u1.cleanliness_level();
    let c2 = u2.cleanliness_level();

    let m1 = u1.budget.as_ref().and_then(budget_midpoint);
    let m2 = u2.budget.as_ref().and_then(budget_midpoint);

    FeatureVector([
        cleanliness_similarity(c1, c2),
        token_match(u1.smoking.as_deref(), u2.smoking.as_deref()),
        token_match(u1.drinking.as_deref(), u2.drinking.as_deref()),
        sleeping_compat(
            u1.sleeping.as_deref().unwrap_or(""),
            u2.sleeping.as_deref().unwrap_or(""),
        ),
        jaccard(&u1.hobbies, &u2.hobbies),
        midpoint_similarity(m1, m2),
        location_match(u1.location.as_deref(), u2.location.as_deref()),
        hobby_overlap(&u1.hobbies, &u2.hobbies),
        average_cleanliness(c1, c2),
        midpoint_ratio(m1, m2),
    ])
}

/// `1 - |c1 - c2| / 4`, floored at 0
#[inline]
pub fn cleanliness_similarity(c1: f64, c2: f64) -> f64 {
    (1.0 - (c1 - c2).abs() / CLEANLINESS_SPREAD).max(0.0)
}

/// `(c1 + c2) / 10`, clamped to the unit interval
#[inline]
pub fn average_cleanliness(c1: f64, c2: f64) -> f64 {
    ((c1 + c2) / (2.0 * CLEANLINESS_MAX)).clamp(0.0, 1.0)
}

#[inline]
fn normalize_token(token: Option<&str>) -> String {
    token.unwrap_or("").trim().to_lowercase()
}

/// 1.0 when both tokens are equal after trim and lowercase
///
/// Two missing tokens compare equal.
#[inline]
pub fn token_match(a: Option<&str>, b: Option<&str>) -> f64 {
    if normalize_token(a) == normalize_token(b) { 1.0 } else { 0.0 }
}

/// 1.0 when both locations are present and equal after trim and lowercase
#[inline]
pub fn location_match(a: Option<&str>, b: Option<&str>) -> f64 {
    let a = normalize_token(a);
    let b = normalize_token(b);
    if !a.is_empty() && !b.is_empty() && a == b { 1.0 } else { 0.0 }
}

/// Sleeping-schedule compatibility over `{early, night, irregular}`
///
/// Identical schedules score 1.0, `irregular` against anything else 0.5,
/// `early` against `night` 0.0. Unknown or missing tokens score 0.0.
pub fn sleeping_compat(s1: &str, s2: &str) -> f64 {
    let s1 = s1.trim().to_lowercase();
    let s2 = s2.trim().to_lowercase();

    match (s1.as_str(), s2.as_str()) {
        ("early", "early") | ("night", "night") | ("irregular", "irregular") => 1.0,
        ("early", "night") | ("night", "early") => 0.0,
        ("irregular", "early" | "night") | ("early" | "night", "irregular") => 0.5,
        _ => 0.0,
    }
}

/// `|A ∩ B| / |A ∪ B|`, 0.0 when both sets are empty
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    shared / union
}

/// `|A ∩ B| / min(|A|, |B|)`, 0.0 unless both sets are non-empty
///
/// Rewards a small hobby set fully contained in a larger one.
pub fn hobby_overlap(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count() as f64;
    shared / a.len().min(b.len()) as f64
}

/// Parse a budget into a single comparable amount
///
/// Ranges (`low-high`) collapse to their midpoint. Currency symbols,
/// currency codes, unit suffixes and thousands separators are stripped.
/// Returns `None` for anything that still fails to parse.
pub fn budget_midpoint(budget: &BudgetValue) -> Option<f64> {
    let raw = match budget {
        BudgetValue::Amount(value) => {
            return value.is_finite().then_some(*value);
        }
        BudgetValue::Text(raw) => raw,
    };

    let cleaned = BUDGET_NOISE
        .iter()
        .fold(raw.to_string(), |s, noise| s.replace(noise, ""));
    let cleaned = cleaned.trim();

    if let Some((lo, hi)) = cleaned.split_once('-') {
        if let (Some(lo), Some(hi)) = (parse_amount(lo), parse_amount(hi)) {
            return Some((lo + hi) / 2.0);
        }
    }

    parse_amount(cleaned)
}

#[inline]
fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Closeness of two budgets relative to the larger one
///
/// 0.0 when either budget fails to parse.
pub fn budget_similarity(b1: &BudgetValue, b2: &BudgetValue) -> f64 {
    midpoint_similarity(budget_midpoint(b1), budget_midpoint(b2))
}

#[inline]
fn midpoint_similarity(m1: Option<f64>, m2: Option<f64>) -> f64 {
    match (m1, m2) {
        (Some(m1), Some(m2)) => {
            let denom = m1.max(m2).max(1.0);
            (1.0 - (m1 - m2).abs() / denom).max(0.0)
        }
        _ => 0.0,
    }
}

/// `min / max` of the two budget midpoints
///
/// 0.0 when either budget fails to parse or the larger one is not positive.
pub fn budget_ratio(b1: &BudgetValue, b2: &BudgetValue) -> f64 {
    midpoint_ratio(budget_midpoint(b1), budget_midpoint(b2))
}

#[inline]
fn midpoint_ratio(m1: Option<f64>, m2: Option<f64>) -> f64 {
    match (m1, m2) {
        (Some(m1), Some(m2)) if m1.max(m2) > 0.0 => {
            // a negative amount against a positive one is no signal
            (m1.min(m2) / m1.max(m2)).max(0.0)
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_hobbies;

    fn create_record(id: i64, cleanliness: f64, sleeping: &str, hobbies: &str, budget: BudgetValue) -> AttributeRecord {
        AttributeRecord {
            user_id: id,
            cleanliness: Some(cleanliness),
            smoking: Some("no".to_string()),
            drinking: Some("yes".to_string()),
            sleeping: Some(sleeping.to_string()),
            hobbies: parse_hobbies(hobbies),
            budget: Some(budget),
            location: Some("Downtown".to_string()),
        }
    }

    #[test]
    fn test_sleeping_compat_table() {
        assert_eq!(sleeping_compat("early", "night"), 0.0);
        assert_eq!(sleeping_compat("night", "early"), 0.0);
        assert_eq!(sleeping_compat("early", "early"), 1.0);
        assert_eq!(sleeping_compat("irregular", "irregular"), 1.0);
        assert_eq!(sleeping_compat("early", "irregular"), 0.5);
        assert_eq!(sleeping_compat("irregular", "night"), 0.5);
        assert_eq!(sleeping_compat(" Early ", "EARLY"), 1.0);
        assert_eq!(sleeping_compat("late", "late"), 0.0);
        assert_eq!(sleeping_compat("", "early"), 0.0);
    }

    #[test]
    fn test_cleanliness_similarity() {
        assert_eq!(cleanliness_similarity(3.0, 3.0), 1.0);
        assert_eq!(cleanliness_similarity(1.0, 5.0), 0.0);
        assert_eq!(cleanliness_similarity(2.0, 4.0), 0.5);
        // missing level (0.0) against the top of the scale is floored
        assert_eq!(cleanliness_similarity(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_average_cleanliness_bounds() {
        assert_eq!(average_cleanliness(5.0, 5.0), 1.0);
        assert_eq!(average_cleanliness(0.0, 0.0), 0.0);
        assert_eq!(average_cleanliness(9.0, 9.0), 1.0);
        assert!((average_cleanliness(3.0, 2.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_cleanliness_stays_in_range() {
        let a = create_record(1, f64::NAN, "early", "music", BudgetValue::Amount(9000.0));
        let b = create_record(2, 4.0, "early", "music", BudgetValue::Amount(9000.0));

        let v = extract(&a, &b);
        for x in v.as_array() {
            assert!((0.0..=1.0).contains(x), "feature {} out of range", x);
        }
        assert_eq!(v, extract(&AttributeRecord { cleanliness: None, ..a }, &b));
    }

    #[test]
    fn test_jaccard_and_overlap() {
        let a = parse_hobbies("music,reading");
        let b = parse_hobbies("music,reading,gaming,travel");
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-12);
        assert_eq!(hobby_overlap(&a, &b), 1.0);

        let empty = BTreeSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(hobby_overlap(&a, &empty), 0.0);
        assert_eq!(jaccard(&a, &empty), 0.0);
    }

    #[test]
    fn test_budget_midpoint_parsing() {
        assert_eq!(budget_midpoint(&BudgetValue::Amount(9000.0)), Some(9000.0));
        assert_eq!(budget_midpoint(&"5000-7000".into()), Some(6000.0));
        assert_eq!(budget_midpoint(&"₹ 12000".into()), Some(12000.0));
        assert_eq!(budget_midpoint(&"INR 8000 - 10000".into()), Some(9000.0));
        assert_eq!(budget_midpoint(&"$1,500/month".into()), Some(1500.0));
        assert_eq!(budget_midpoint(&"flexible".into()), None);
        assert_eq!(budget_midpoint(&"".into()), None);
        assert_eq!(budget_midpoint(&BudgetValue::Amount(f64::NAN)), None);
    }

    #[test]
    fn test_budget_similarity_range_against_scalar() {
        let sim = budget_similarity(&"5000-7000".into(), &"6000".into());
        assert_eq!(sim, 1.0);

        let sim = budget_similarity(&"5000-7000".into(), &"8000".into());
        assert!(sim > 0.0 && sim < 1.0);
        assert!((sim - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_budget_unparseable_is_neutral() {
        assert_eq!(budget_similarity(&"ask me".into(), &BudgetValue::Amount(6000.0)), 0.0);
        assert_eq!(budget_ratio(&"ask me".into(), &BudgetValue::Amount(6000.0)), 0.0);
        assert_eq!(budget_ratio(&BudgetValue::Amount(0.0), &BudgetValue::Amount(0.0)), 0.0);
    }

    #[test]
    fn test_budget_ratio() {
        let ratio = budget_ratio(&BudgetValue::Amount(5000.0), &BudgetValue::Amount(10000.0));
        assert!((ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_location_match() {
        assert_eq!(location_match(Some(" Downtown"), Some("downtown ")), 1.0);
        assert_eq!(location_match(Some(""), Some("")), 0.0);
        assert_eq!(location_match(None, None), 0.0);
        assert_eq!(location_match(Some("Suburbs"), Some("Downtown")), 0.0);
    }

    #[test]
    fn test_token_match_missing_values() {
        assert_eq!(token_match(None, None), 1.0);
        assert_eq!(token_match(Some(" No"), Some("no")), 1.0);
        assert_eq!(token_match(Some("no"), None), 0.0);
    }

    #[test]
    fn test_extract_order() {
        let u1 = create_record(1, 4.0, "early", "music,reading", BudgetValue::Amount(8000.0));
        let u2 = create_record(2, 2.0, "irregular", "music", "6000-10000".into());

        let v = extract(&u1, &u2);

        assert_eq!(v.cleanliness_similarity(), 0.5);
        assert_eq!(v.smoking_match(), 1.0);
        assert_eq!(v.drinking_match(), 1.0);
        assert_eq!(v.sleeping_compatibility(), 0.5);
        assert_eq!(v.hobby_jaccard(), 0.5);
        assert_eq!(v.budget_similarity(), 1.0);
        assert_eq!(v.location_match(), 1.0);
        assert_eq!(v.hobby_overlap(), 1.0);
        assert!((v.average_cleanliness() - 0.6).abs() < 1e-12);
        assert_eq!(v.budget_ratio(), 1.0);
        assert_eq!(v[3], v.sleeping_compatibility());
    }

    #[test]
    fn test_extract_empty_records() {
        let v = extract(&AttributeRecord::new(1), &AttributeRecord::new(2));
        let expected = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        assert_eq!(v.as_array(), &expected);
    }

    #[test]
    fn test_feature_names_length() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
    }
}
