use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use roommate_matcher::config::Settings;
use roommate_matcher::routes::{self, matches::AppState};
use roommate_matcher::services::{load_learned_scorer, load_profiles};
use roommate_matcher::{LearnedScorer, Matcher};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for query and path extraction errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path extraction errors (non-integer user ids)
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 400,
    }
    .into()
}

/// Try to load the learned scorer, returning `None` when scoring must fall back
fn try_load_learned(model_path: Option<&str>, meta_path: Option<&str>) -> Option<LearnedScorer> {
    let model_path = model_path?;
    if !Path::new(model_path).exists() {
        info!("No learned model at {}, serving rule-based scores only", model_path);
        return None;
    }

    match load_learned_scorer(model_path, meta_path) {
        Ok(scorer) => Some(scorer),
        Err(e) => {
            warn!("Failed to load learned model from {} ({}), falling back to rule-based scoring", model_path, e);
            None
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting roommate matching service...");

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    // Load profile directory and learned model off the async runtime
    let data = settings.data.clone();
    let (directory, learned) = tokio::task::spawn_blocking(move || {
        let directory = load_profiles(&data.profiles_path);
        let learned = try_load_learned(data.model_path.as_deref(), data.meta_path.as_deref());
        (directory, learned)
    })
    .await
    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let directory = directory.map_err(|e| {
        error!("Failed to load profiles from {}: {}", settings.data.profiles_path, e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    })?;

    let weights = settings.rule_weights();
    if (weights.sum() - 1.0).abs() > 1e-6 {
        warn!("Rule weights sum to {:.3}, scores will be clamped to [0, 100]", weights.sum());
    }

    let mut matcher = Matcher::new(Arc::new(directory), weights);
    if let Some(learned) = learned {
        matcher = matcher.with_learned(Arc::new(learned));
    }

    info!(
        "Matcher initialized ({} profiles, learned model loaded: {}, weights: {:?})",
        matcher.profile_count(),
        matcher.learned_model_loaded(),
        weights
    );

    // Build application state
    let app_state = AppState {
        matcher: Arc::new(matcher),
        default_limit: settings.matching.default_limit,
        max_limit: settings.matching.max_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
