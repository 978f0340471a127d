use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::Matcher;
use crate::error::MatchError;
use crate::models::{ErrorResponse, HealthResponse, MatchesQuery, UserId};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<Matcher>,
    pub default_limit: u16,
    pub max_limit: u16,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/{user_id}", web::get().to(get_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        profile_count: state.matcher.profile_count(),
        learned_model_loaded: state.matcher.learned_model_loaded(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// GET /api/v1/matches/{user_id}?N=10&algo=ai
///
/// Response body:
/// ```json
/// {
///   "algo": "ai|rule",
///   "matches": [{"userId": 2, "score": 87.5}]
/// }
/// ```
async fn get_matches(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    query: web::Query<MatchesQuery>,
) -> impl Responder {
    if let Err(errors) = query.validate() {
        tracing::info!("Validation failed for matches request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = path.into_inner();
    let limit = query.n.unwrap_or(state.default_limit).clamp(1, state.max_limit.max(1)) as usize;
    let requested = query.algo;

    let matcher = state.matcher.clone();
    // ranking is a CPU-bound full scan, keep it off the async workers
    let result = web::block(move || matcher.get_matches(user_id, limit, requested)).await;

    match result {
        Ok(Ok(response)) => {
            tracing::info!(
                "Returning {} matches for user {} (requested: {}, served: {})",
                response.matches.len(),
                user_id,
                requested,
                response.algo
            );
            HttpResponse::Ok().json(response)
        }
        Ok(Err(MatchError::NotFound(id))) => {
            tracing::info!("Match request for unknown user {}", id);
            HttpResponse::NotFound().json(ErrorResponse {
                error: "User not found".to_string(),
                message: format!("userId {} not in profiles", id),
                status_code: 404,
            })
        }
        Ok(Err(e @ MatchError::Configuration(_))) => {
            tracing::error!("Matcher misconfigured: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Matcher not configured".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
        Err(e) => {
            tracing::error!("Ranking task failed for user {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Ranking failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
