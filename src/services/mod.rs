// Service exports
pub mod model_loader;
pub mod profiles;

pub use model_loader::{load_learned_scorer, load_artifact, load_metadata};
pub use profiles::{load_profiles, build_directory, parse_record, resolve_aliases, rows_from_csv, FIELD_ALIASES};
