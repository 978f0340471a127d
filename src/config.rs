use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::models::RuleWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

/// Locations of the profile dataset and learned model files
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_profiles_path")]
    pub profiles_path: String,
    #[serde(default = "default_model_path")]
    pub model_path: Option<String>,
    #[serde(default = "default_meta_path")]
    pub meta_path: Option<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            profiles_path: default_profiles_path(),
            model_path: default_model_path(),
            meta_path: default_meta_path(),
        }
    }
}

fn default_profiles_path() -> String { "data/profiles.json".to_string() }
fn default_model_path() -> Option<String> { Some("data/compat_model.json".to_string()) }
fn default_meta_path() -> Option<String> { Some("data/compat_meta.json".to_string()) }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> u16 { 10 }
fn default_max_limit() -> u16 { 50 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_cleanliness_weight")]
    pub cleanliness: f64,
    #[serde(default = "default_smoking_weight")]
    pub smoking: f64,
    #[serde(default = "default_drinking_weight")]
    pub drinking: f64,
    #[serde(default = "default_sleeping_weight")]
    pub sleeping: f64,
    #[serde(default = "default_hobbies_weight")]
    pub hobbies: f64,
    #[serde(default = "default_budget_weight")]
    pub budget: f64,
    #[serde(default = "default_location_weight")]
    pub location: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            cleanliness: default_cleanliness_weight(),
            smoking: default_smoking_weight(),
            drinking: default_drinking_weight(),
            sleeping: default_sleeping_weight(),
            hobbies: default_hobbies_weight(),
            budget: default_budget_weight(),
            location: default_location_weight(),
        }
    }
}

fn default_cleanliness_weight() -> f64 { 0.20 }
fn default_smoking_weight() -> f64 { 0.15 }
fn default_drinking_weight() -> f64 { 0.15 }
fn default_sleeping_weight() -> f64 { 0.10 }
fn default_hobbies_weight() -> f64 { 0.15 }
fn default_budget_weight() -> f64 { 0.15 }
fn default_location_weight() -> f64 { 0.10 }

impl From<&WeightsConfig> for RuleWeights {
    fn from(w: &WeightsConfig) -> Self {
        RuleWeights {
            cleanliness: w.cleanliness,
            smoking: w.smoking,
            drinking: w.drinking,
            sleeping: w.sleeping,
            hobbies: w.hobbies,
            budget: w.budget,
            location: w.location,
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ROOMMATE__)
    /// 5. PROFILES_CSV, PROFILES_PATH, MODEL_PATH and META_PATH
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ROOMMATE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ROOMMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_path_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ROOMMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn rule_weights(&self) -> RuleWeights {
        RuleWeights::from(&self.scoring.weights)
    }
}

/// Apply the plain data path variables on top of the layered config
fn apply_path_overrides(settings: Config) -> Result<Config, ConfigError> {
    apply_overrides_from(settings, path_overrides(|var| std::env::var(var).ok()))
}

fn apply_overrides_from<I>(settings: Config, overrides: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = (&'static str, String)>,
{
    let mut builder = Config::builder().add_source(settings);

    for (key, value) in overrides {
        builder = builder.set_override(key, value)?;
    }

    builder.build()
}

/// Config keys set by the plain path variables, in application order
///
/// `PROFILES_CSV` names the same dataset as `PROFILES_PATH`; when both are
/// set `PROFILES_PATH` is applied last and wins.
fn path_overrides<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    [
        ("PROFILES_CSV", "data.profiles_path"),
        ("PROFILES_PATH", "data.profiles_path"),
        ("MODEL_PATH", "data.model_path"),
        ("META_PATH", "data.meta_path"),
    ]
    .into_iter()
    .filter_map(|(var, key)| lookup(var).map(|value| (key, value)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.cleanliness, 0.20);
        assert_eq!(weights.smoking, 0.15);
        assert_eq!(weights.drinking, 0.15);
        assert_eq!(weights.sleeping, 0.10);
        assert_eq!(weights.hobbies, 0.15);
        assert_eq!(weights.budget, 0.15);
        assert_eq!(weights.location, 0.10);
        assert_eq!(RuleWeights::from(&weights), RuleWeights::default());
    }

    #[test]
    fn test_default_matching() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.default_limit, 10);
        assert_eq!(matching.max_limit, 50);
    }

    #[test]
    fn test_load_from_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 9100\n\n[scoring.weights]\nlocation = 0.4").unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.data.profiles_path, "data/profiles.json");
        assert_eq!(settings.rule_weights().location, 0.4);
        assert_eq!(settings.rule_weights().cleanliness, 0.20);
    }

    #[test]
    fn test_profiles_csv_override() {
        let only_csv = path_overrides(|var| (var == "PROFILES_CSV").then(|| "data/users.csv".to_string()));
        assert_eq!(only_csv, vec![("data.profiles_path", "data/users.csv".to_string())]);

        let overrides = path_overrides(|var| match var {
            "PROFILES_CSV" => Some("data/users.csv".to_string()),
            "PROFILES_PATH" => Some("data/profiles.json".to_string()),
            "MODEL_PATH" => Some("model.json".to_string()),
            _ => None,
        });
        let profiles = overrides
            .iter()
            .filter(|(key, _)| *key == "data.profiles_path")
            .last()
            .map(|(_, value)| value.as_str());
        assert_eq!(profiles, Some("data/profiles.json"));
        assert!(overrides.contains(&("data.model_path", "model.json".to_string())));
        assert!(!overrides.iter().any(|(key, _)| *key == "data.meta_path"));
    }

    #[test]
    fn test_csv_override_applied_to_config() {
        let base = Config::builder().build().unwrap();
        let config = apply_overrides_from(base, [("data.profiles_path", "users.csv".to_string())]).unwrap();
        let settings: Settings = config.try_deserialize().unwrap();
        assert_eq!(settings.data.profiles_path, "users.csv");
    }
}
