use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier of a user in the profile directory
pub type UserId = i64;

/// Normalized per-user profile data consumed by the matching engine
///
/// Every attribute is optional. Missing values degrade to neutral defaults
/// inside the feature extractor instead of failing the comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeRecord {
    pub user_id: UserId,
    /// Nominal range 1-5
    pub cleanliness: Option<f64>,
    pub smoking: Option<String>,
    pub drinking: Option<String>,
    /// One of `early`, `night`, `irregular`
    pub sleeping: Option<String>,
    /// Lowercased, trimmed, never contains empty strings
    pub hobbies: BTreeSet<String>,
    pub budget: Option<BudgetValue>,
    pub location: Option<String>,
}

impl AttributeRecord {
    /// Create an empty record for `user_id`
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Cleanliness level, defaulting to 0.0 when absent or not finite
    pub fn cleanliness_level(&self) -> f64 {
        self.cleanliness.filter(|c| c.is_finite()).unwrap_or(0.0)
    }
}

/// Raw budget as it appeared in the source data
///
/// Text budgets are either a scalar (`"12000"`, `"₹12000"`) or a
/// `low-high` range (`"5000-7000"`). Parsing happens at comparison time.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetValue {
    Amount(f64),
    Text(String),
}

impl From<f64> for BudgetValue {
    fn from(value: f64) -> Self {
        BudgetValue::Amount(value)
    }
}

impl From<&str> for BudgetValue {
    fn from(value: &str) -> Self {
        BudgetValue::Text(value.to_string())
    }
}

/// Parse a hobby list from a comma-delimited string
pub fn parse_hobbies(raw: &str) -> BTreeSet<String> {
    normalize_hobbies(raw.split(','))
}

/// Trim and lowercase hobby tokens, dropping empty ones
pub fn normalize_hobbies<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Scoring algorithm requested by, or reported to, a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Ai,
    Rule,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Ai => write!(f, "ai"),
            Algorithm::Rule => write!(f, "rule"),
        }
    }
}

/// Scored candidate returned by the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub score: f64,
}

/// Weights for the rule-based scorer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleWeights {
    pub cleanliness: f64,
    pub smoking: f64,
    pub drinking: f64,
    pub sleeping: f64,
    pub hobbies: f64,
    pub budget: f64,
    pub location: f64,
}

impl RuleWeights {
    pub fn sum(&self) -> f64 {
        self.cleanliness
            + self.smoking
            + self.drinking
            + self.sleeping
            + self.hobbies
            + self.budget
            + self.location
    }
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            cleanliness: 0.20,
            smoking: 0.15,
            drinking: 0.15,
            sleeping: 0.10,
            hobbies: 0.15,
            budget: 0.15,
            location: 0.10,
        }
    }
}
