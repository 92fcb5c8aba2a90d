use crate::core::{pass::run_pass, MatchDetector, MatchSession};
use crate::models::{
    DetectionResponse, ErrorResponse, HealthResponse, MatchListResponse, RunDetectionRequest,
    WatchRequest, WatchResponse,
};
use crate::services::{
    AppwriteClient, MatchRecordStore, Notifier, PostgresRecordStore, ProfileDirectory,
};
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub records: Arc<PostgresRecordStore>,
    pub detector: MatchDetector,
    pub poll_interval: Duration,
    pub sessions: Arc<Mutex<HashMap<String, MatchSession>>>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/run", web::post().to(run_detection))
        .route("/matches/list", web::get().to(list_matches))
        .route("/watch/start", web::post().to(start_watch))
        .route("/watch/stop", web::post().to(stop_watch));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.records.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run one detection pass for a subject
///
/// POST /api/v1/matches/run
///
/// Request body:
/// ```json
/// { "userId": "string" }
/// ```
async fn run_detection(
    state: web::Data<AppState>,
    req: web::Json<RunDetectionRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = &req.user_id;

    tracing::info!("Running detection pass for user: {}", user_id);

    let subject = match state.appwrite.fetch_profile(user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Profile not found".to_string(),
                message: format!("No profile exists for user {}", user_id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch profile for {}: {}", user_id, e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch profile".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let outcome = match run_pass(
        &subject,
        &state.detector,
        state.appwrite.as_ref() as &dyn ProfileDirectory,
        state.records.as_ref() as &dyn MatchRecordStore,
        state.appwrite.as_ref() as &dyn Notifier,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Detection pass failed".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    tracing::info!(
        "Detection pass for {}: {} candidates, {} matches, {} new records",
        user_id,
        outcome.candidates,
        outcome.detected,
        outcome.created
    );

    HttpResponse::Ok().json(DetectionResponse {
        user_id: user_id.clone(),
        candidates: outcome.candidates,
        matches_found: outcome.detected,
        records_created: outcome.created,
    })
}

/// List persisted matches for a subject
///
/// GET /api/v1/matches/list?userId={userId}
async fn list_matches(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let user_id = match query.get("userId") {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing userId parameter".to_string(),
                message: "userId query parameter is required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.records.list_for_subject(user_id).await {
        Ok(matches) => HttpResponse::Ok().json(MatchListResponse {
            user_id: user_id.clone(),
            count: matches.len(),
            matches,
        }),
        Err(e) => {
            tracing::error!("Failed to list matches for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Start watching a subject's profile for changes
///
/// POST /api/v1/watch/start
///
/// Spawns a session that re-runs detection on every observed profile change.
/// At most one session exists per subject; starting twice is a no-op.
async fn start_watch(state: web::Data<AppState>, req: web::Json<WatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = req.user_id.clone();
    let mut sessions = state.sessions.lock().await;

    if !sessions.contains_key(&user_id) {
        let session = MatchSession::watch(
            user_id.clone(),
            state.poll_interval,
            state.detector.clone(),
            state.appwrite.clone() as Arc<dyn ProfileDirectory>,
            state.records.clone() as Arc<dyn MatchRecordStore>,
            state.appwrite.clone() as Arc<dyn Notifier>,
        );
        sessions.insert(user_id.clone(), session);
        tracing::info!("Started watch session for {}", user_id);
    }

    HttpResponse::Ok().json(WatchResponse {
        user_id,
        watching: true,
    })
}

/// Stop watching a subject's profile
///
/// POST /api/v1/watch/stop
///
/// Tears down the session and releases its subscription. Idempotent.
async fn stop_watch(state: web::Data<AppState>, req: web::Json<WatchRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let user_id = req.user_id.clone();
    let mut sessions = state.sessions.lock().await;

    if let Some(session) = sessions.remove(&user_id) {
        session.close();
        tracing::info!("Stopped watch session for {}", user_id);
    }

    HttpResponse::Ok().json(WatchResponse {
        user_id,
        watching: false,
    })
}
