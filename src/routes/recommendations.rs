use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    Category, ErrorResponse, HealthResponse, RecommendByCategoryRequest, RecommendByCategoryResponse,
    RecommendVendorsRequest, RecommendVendorsResponse,
};
use crate::services::{
    AuthError, DataStore, RecommendError, Recommender, SessionContext, SessionVerifier, VendorQuery,
    VendorSource,
};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DataStore>,
    pub recommender: Recommender<DataStore>,
    pub verifier: Option<Arc<SessionVerifier>>,
    pub default_categories: Vec<Category>,
}

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations/vendors", web::post().to(recommend_vendors))
        .route("/recommendations/by-category", web::post().to(recommend_by_category));
}

fn error_response(status: actix_web::http::StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn unauthorized(e: &AuthError) -> HttpResponse {
    error_response(actix_web::http::StatusCode::UNAUTHORIZED, "unauthorized", e.to_string())
}

/// A failed fetch is a 502, never an empty ranking
fn fetch_failed(e: &RecommendError) -> HttpResponse {
    error_response(actix_web::http::StatusCode::BAD_GATEWAY, "fetch_failed", e.to_string())
}

/// Reject limits above the ranker's configured cap
fn check_limit(state: &AppState, limit: Option<u16>) -> Result<(), HttpResponse> {
    let max = state.recommender.ranker().max_limit();
    match limit {
        Some(limit) if usize::from(limit) > max => Err(error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "validation_failed",
            format!("limit: must be at most {}", max),
        )),
        _ => Ok(()),
    }
}

/// Build the caller's session and load their profile
async fn resolve_session(state: &AppState, req: &HttpRequest) -> Result<SessionContext, HttpResponse> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let mut session = match (&state.verifier, header) {
        (Some(verifier), header) => verifier.session_from_header(header).map_err(|e| {
            tracing::info!("Rejected session on {}: {}", req.path(), e);
            unauthorized(&e)
        })?,
        (None, Some(_)) => {
            tracing::debug!("Ignoring Authorization header, token verification is not configured");
            SessionContext::anonymous()
        }
        (None, None) => SessionContext::anonymous(),
    };

    state.recommender.resolve_profile(&mut session).await.map_err(|e| {
        tracing::error!("Failed to load profile for {:?}: {}", session.user_id, e);
        fetch_failed(&e)
    })?;

    Ok(session)
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Data store health check failed ({}): {}", state.store.backend_name(), e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Flat vendor recommendations
///
/// POST /api/v1/recommendations/vendors
///
/// Request body:
/// ```json
/// {
///   "category": "venue",
///   "limit": 10,
///   "excludeIds": ["string"]
/// }
/// ```
async fn recommend_vendors(
    state: web::Data<AppState>,
    body: web::Json<RecommendVendorsRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for recommend_vendors request: {:?}", errors);
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "validation_failed",
            errors.to_string(),
        );
    }
    if let Err(response) = check_limit(&state, body.limit) {
        return response;
    }

    let session = match resolve_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let body = body.into_inner();
    let query = VendorQuery {
        category: body.category,
        limit: body.limit.map(usize::from),
        exclude_ids: body.exclude_ids,
    };

    tracing::info!(
        "Recommending vendors (user: {:?}, category: {:?}, limit: {:?})",
        session.user_id,
        query.category,
        query.limit
    );

    match state.recommender.recommend(&session, &query).await {
        Ok(vendors) => {
            tracing::info!("Returning {} recommended vendors", vendors.len());
            HttpResponse::Ok().json(RecommendVendorsResponse {
                request_id: uuid::Uuid::new_v4().to_string(),
                total: vendors.len(),
                vendors,
            })
        }
        Err(e) => {
            tracing::error!("Failed to recommend vendors: {}", e);
            fetch_failed(&e)
        }
    }
}

/// Per-category vendor recommendations
///
/// POST /api/v1/recommendations/by-category
///
/// Request body:
/// ```json
/// {
///   "categories": ["venue", "dj"],
///   "limit": 3
/// }
/// ```
async fn recommend_by_category(
    state: web::Data<AppState>,
    body: web::Json<RecommendByCategoryRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for recommend_by_category request: {:?}", errors);
        return error_response(
            actix_web::http::StatusCode::BAD_REQUEST,
            "validation_failed",
            errors.to_string(),
        );
    }
    if let Err(response) = check_limit(&state, body.limit) {
        return response;
    }

    let session = match resolve_session(&state, &http_req).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let body = body.into_inner();
    let categories = body
        .categories
        .unwrap_or_else(|| state.default_categories.clone());
    let limit = body.limit.map(usize::from);

    match state
        .recommender
        .recommend_by_category(&session, &categories, limit)
        .await
    {
        Ok(categories) => {
            tracing::info!("Returning recommendations for {} categories", categories.len());
            HttpResponse::Ok().json(RecommendByCategoryResponse {
                request_id: uuid::Uuid::new_v4().to_string(),
                categories,
            })
        }
        Err(e) => {
            tracing::error!("Failed to recommend vendors by category: {}", e);
            fetch_failed(&e)
        }
    }
}
