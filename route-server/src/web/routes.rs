//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::domain::{Criterion, DomainError, GeoPoint};
use crate::engine::Evaluate;
use crate::providers::FetchError;
use crate::searchlog::SearchEntry;
use crate::selection::{SelectionError, SelectionHandle, Snapshot};

use super::dto::*;
use super::state::AppState;

/// User id recorded for searches made without one.
const ANONYMOUS_USER: &str = "anonymous";

/// Create the application router.
pub fn create_router<E: Evaluate>(state: AppState<E>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/routes/plan", post(plan_routes::<E>))
        .route("/api/sessions", post(create_session::<E>))
        .route(
            "/api/sessions/:id",
            get(get_session::<E>).delete(delete_session::<E>),
        )
        .route("/api/sessions/:id/endpoints", put(set_endpoints::<E>))
        .route("/api/sessions/:id/mode", put(set_mode::<E>))
        .route("/api/sessions/:id/criterion", put(set_criterion::<E>))
        .route("/api/sessions/:id/selection", put(select_route::<E>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Evaluate and rank routes for a single query.
async fn plan_routes<E: Evaluate>(
    State(state): State<AppState<E>>,
    Json(req): Json<PlanRouteRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    req.origin.validate()?;
    req.destination.validate()?;
    let criterion = parse_criterion(req.criterion.as_deref())?;

    let query = state
        .engine
        .query(req.origin, req.destination, req.mode, criterion);
    let routes = state.engine.plan(&query).await?;

    Ok(Json(SelectionResponse::planned(
        &routes,
        query.origin,
        query.destination,
        query.mode,
        criterion,
    )))
}

/// Open a selection session.
async fn create_session<E: Evaluate>(
    State(state): State<AppState<E>>,
) -> (StatusCode, Json<SessionResponse>) {
    let (session_id, handle) = state.create_session().await;
    info!(session_id, "opened session");

    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            selection: SelectionResponse::from(&handle.snapshot()),
        }),
    )
}

async fn get_session<E: Evaluate>(
    State(state): State<AppState<E>>,
    Path(id): Path<u64>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = lookup(&state, id).await?;
    Ok(session_response(id, &handle.snapshot()))
}

async fn delete_session<E: Evaluate>(
    State(state): State<AppState<E>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    if state.remove_session(id).await {
        info!(session_id = id, "closed session");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// Set or clear the endpoints of a session.
///
/// A search is logged whenever the update leaves a new pair set.
async fn set_endpoints<E: Evaluate>(
    State(state): State<AppState<E>>,
    Path(id): Path<u64>,
    Json(req): Json<EndpointsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    for point in [req.origin, req.destination].iter().flatten() {
        point.validate()?;
    }
    let handle = lookup(&state, id).await?;
    let before = handle.snapshot();
    let snapshot = handle.set_endpoints(req.origin, req.destination).await?;

    if let Some(log) = &state.search_log {
        let user = req.user_id.as_deref().unwrap_or(ANONYMOUS_USER);
        if let Some(entry) = search_entry(&before, &snapshot, user) {
            log.record(entry);
        }
    }

    Ok(session_response(id, &snapshot))
}

/// Entry for an endpoints update, if it produced a new complete pair.
fn search_entry(before: &Snapshot, after: &Snapshot, user: &str) -> Option<SearchEntry> {
    let (Some(origin), Some(destination)) = (after.origin, after.destination) else {
        return None;
    };
    if (before.origin, before.destination) == (after.origin, after.destination) {
        return None;
    }
    Some(SearchEntry::new(
        user,
        origin,
        destination,
        &after.mode,
        after.criterion,
        Utc::now(),
    ))
}

async fn set_mode<E: Evaluate>(
    State(state): State<AppState<E>>,
    Path(id): Path<u64>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = lookup(&state, id).await?;
    let snapshot = handle.set_mode(req.mode).await?;
    Ok(session_response(id, &snapshot))
}

async fn set_criterion<E: Evaluate>(
    State(state): State<AppState<E>>,
    Path(id): Path<u64>,
    Json(req): Json<CriterionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let criterion = parse_criterion(Some(&req.criterion))?;
    let handle = lookup(&state, id).await?;
    let snapshot = handle.set_criterion(criterion).await?;
    Ok(session_response(id, &snapshot))
}

async fn select_route<E: Evaluate>(
    State(state): State<AppState<E>>,
    Path(id): Path<u64>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = lookup(&state, id).await?;
    let snapshot = handle.select(req.id).await?;
    Ok(session_response(id, &snapshot))
}

fn parse_criterion(value: Option<&str>) -> Result<Criterion, AppError> {
    match value {
        Some(s) => Ok(s.parse()?),
        None => Ok(Criterion::default()),
    }
}

async fn lookup<E: Evaluate>(state: &AppState<E>, id: u64) -> Result<SelectionHandle, AppError> {
    state.session(id).await.ok_or_else(|| session_not_found(id))
}

fn session_not_found(id: u64) -> AppError {
    AppError::NotFound {
        message: format!("Session not found: {id}"),
    }
}

fn session_response(session_id: u64, snapshot: &Snapshot) -> Json<SessionResponse> {
    Json(SessionResponse {
        session_id,
        selection: SelectionResponse::from(snapshot),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(e: SelectionError) -> Self {
        match e {
            SelectionError::UnknownRoute(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            SelectionError::Closed => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            warn!(%status, "{message}");
        } else {
            debug!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
