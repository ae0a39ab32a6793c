use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{compute_overlap, parse_availability, Matcher};
use crate::models::{
    apply_overrides, BatchMatchRequest, BatchMatchResponse, ErrorResponse, HealthResponse,
    ManualMatchRequest, OverlapRequest, RecommendRequest, RecommendResponse,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub recommendation_limit: usize,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/overlap", web::post().to(overlap))
        .route("/matches/batch", web::post().to(batch_match))
        .route("/matches/manual", web::post().to(manual_match))
        .route("/matches/recommend", web::post().to(recommend));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Raw overlap endpoint
///
/// POST /api/v1/overlap
///
/// Request body:
/// ```json
/// {
///   "availabilityA": ["Monday 9:00-12:00"],
///   "availabilityB": ["Monday 10:00-13:00"]
/// }
/// ```
async fn overlap(state: web::Data<AppState>, req: web::Json<OverlapRequest>) -> impl Responder {
    let result = compute_overlap(
        &parse_availability(&req.availability_a),
        &parse_availability(&req.availability_b),
        &state.matcher.config().day_order,
    );

    HttpResponse::Ok().json(result)
}

/// Batch match endpoint
///
/// POST /api/v1/matches/batch
///
/// Request body:
/// ```json
/// {
///   "poolA": [Person],
///   "poolB": [Person],
///   "weights": { "waitingTimeWeight": 0.2, "qualityWeight": 0.0, "minOverlapDays": 2 },
///   "filters": { "language": true, "liveScan": true }
/// }
/// ```
async fn batch_match(state: web::Data<AppState>, req: web::Json<BatchMatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for batch request: {:?}", errors);
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let matcher = if req.weights.is_none() && req.filters.is_none() {
        state.matcher.clone()
    } else {
        let config = apply_overrides(state.matcher.config(), req.weights.as_ref(), req.filters.as_ref());
        match Matcher::new(config) {
            Ok(m) => m,
            Err(e) => {
                tracing::info!("Rejected batch configuration: {}", e);
                return error_response(
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "Invalid configuration",
                    e.to_string(),
                );
            }
        }
    };

    match matcher.run_batch(&req.pool_a, &req.pool_b) {
        Ok(outcome) => HttpResponse::Ok().json(BatchMatchResponse::from(outcome)),
        Err(e) => {
            tracing::error!("Batch matching failed: {}", e);
            error_response(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Matching failed",
                e.to_string(),
            )
        }
    }
}

/// Manual match endpoint
///
/// POST /api/v1/matches/manual
///
/// Returns the match, or 422 with the reason the pair is not eligible.
async fn manual_match(state: web::Data<AppState>, req: web::Json<ManualMatchRequest>) -> impl Responder {
    match state.matcher.add_manual_match(&req.person_a, &req.person_b) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(reason) => error_response(
            actix_web::http::StatusCode::UNPROCESSABLE_ENTITY,
            "Pair is not eligible",
            reason.to_string(),
        ),
    }
}

/// Recommended matches endpoint
///
/// POST /api/v1/matches/recommend
async fn recommend(state: web::Data<AppState>, req: web::Json<RecommendRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "Validation failed",
            errors.to_string(),
        );
    }

    let limit = req.limit.unwrap_or(state.recommendation_limit);
    let recommendations = state.matcher.recommend(&req.person, req.side, &req.candidates, limit);

    HttpResponse::Ok().json(RecommendResponse { recommendations })
}
