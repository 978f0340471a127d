use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;
use crate::models::domain::Algorithm;

/// Query parameters for the matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchesQuery {
    /// Number of matches to return
    #[validate(range(min = 1, max = 50))]
    #[serde(rename = "N", alias = "n", default)]
    pub n: Option<u16>,
    /// Only the exact value `ai` requests the learned scorer
    #[serde(default = "default_algo", deserialize_with = "lenient_algo")]
    pub algo: Algorithm,
}

fn default_algo() -> Algorithm {
    Algorithm::Ai
}

/// Map any non-`ai` value to the rule scorer instead of rejecting it
fn lenient_algo<'de, D>(deserializer: D) -> Result<Algorithm, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(if raw == "ai" { Algorithm::Ai } else { Algorithm::Rule })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_bounds() {
        let ok = MatchesQuery { n: Some(50), algo: Algorithm::Rule };
        assert!(ok.validate().is_ok());

        let zero = MatchesQuery { n: Some(0), algo: Algorithm::Rule };
        assert!(zero.validate().is_err());

        let too_many = MatchesQuery { n: Some(51), algo: Algorithm::Ai };
        assert!(too_many.validate().is_err());

        let unset = MatchesQuery { n: None, algo: Algorithm::Ai };
        assert!(unset.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let query: MatchesQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.n, None);
        assert_eq!(query.algo, Algorithm::Ai);
    }

    #[test]
    fn test_non_ai_values_select_rule() {
        for raw in ["rule", "foo", "AI", "", " ai"] {
            let query: MatchesQuery = serde_json::from_value(serde_json::json!({ "algo": raw })).unwrap();
            assert_eq!(query.algo, Algorithm::Rule, "algo={:?}", raw);
        }

        let query: MatchesQuery = serde_json::from_value(serde_json::json!({ "algo": "ai" })).unwrap();
        assert_eq!(query.algo, Algorithm::Ai);
    }
}
