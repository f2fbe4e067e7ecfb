use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Local;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Milestone, PricingFactors, ProjectDetails, QuoteEngine, QuoteError, QuoteOutcome,
    QuoteRequest, ReportBundle, RoleAssignment, RoleDefinition, ValidationError, catalog,
};

/// Shared host state: the engine plus the single editable quotation session.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<QuoteEngine>,
    session: Arc<RwLock<QuoteRequest>>,
}

impl AppState {
    pub fn new(engine: QuoteEngine) -> Self {
        let request = engine.new_request();
        Self::with_request(engine, request)
    }

    pub fn with_request(engine: QuoteEngine, request: QuoteRequest) -> Self {
        Self {
            engine: Arc::new(engine),
            session: Arc::new(RwLock::new(request)),
        }
    }

    fn session(&self) -> Arc<RwLock<QuoteRequest>> {
        self.session.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::RowNotFound(_) | ValidationError::MilestoneNotFound(_) => {
                ApiError::NotFound(value.to_string())
            }
            ValidationError::NoRolesAvailable | ValidationError::MilestonesFullyAllocated => {
                ApiError::Conflict(value.to_string())
            }
            other => ApiError::Invalid(other.to_string()),
        }
    }
}

impl From<QuoteError> for ApiError {
    fn from(value: QuoteError) -> Self {
        match value {
            QuoteError::Invalid(err) => err.into(),
            blocked @ QuoteError::ExportBlocked { .. } => ApiError::Conflict(blocked.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Fields left out are kept; an empty `role` clears the selection.
#[derive(Debug, Deserialize)]
struct RowPayload {
    role: Option<String>,
    count: Option<u32>,
    hours: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct MilestonePayload {
    name: Option<String>,
    description: Option<String>,
    percent: Option<f64>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/roles", get(list_roles))
        .route("/quote", post(quote_request))
        .route("/session", get(get_session).put(replace_session))
        .route("/session/project", put(update_project))
        .route("/session/factors", put(update_factors))
        .route("/session/rows", post(add_row))
        .route("/session/rows/:id", put(update_row).delete(delete_row))
        .route("/session/milestones", post(add_milestone))
        .route(
            "/session/milestones/:id",
            put(update_milestone).delete(delete_milestone),
        )
        .route("/session/quote", get(session_quote))
        .route("/session/reports", post(session_reports))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, engine: QuoteEngine) -> std::io::Result<()> {
    let state = AppState::new(engine);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_roles() -> Json<&'static [RoleDefinition]> {
    Json(catalog::roles())
}

async fn quote_request(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteOutcome>, ApiError> {
    Ok(Json(state.engine.quote(&request)?))
}

async fn get_session(State(state): State<AppState>) -> Json<QuoteRequest> {
    let session = state.session();
    let request = session.read().clone();
    Json(request)
}

async fn replace_session(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteRequest>, ApiError> {
    request.validate()?;
    let session = state.session();
    *session.write() = request.clone();
    Ok(Json(request))
}

async fn update_project(
    State(state): State<AppState>,
    Json(project): Json<ProjectDetails>,
) -> Json<ProjectDetails> {
    let session = state.session();
    session.write().project = project.clone();
    Json(project)
}

async fn update_factors(
    State(state): State<AppState>,
    Json(factors): Json<PricingFactors>,
) -> Result<Json<PricingFactors>, ApiError> {
    crate::validation::validate_factors(&factors)?;
    let session = state.session();
    session.write().factors = factors.clone();
    Ok(Json(factors))
}

async fn add_row(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RoleAssignment>), ApiError> {
    let session = state.session();
    let row = {
        let mut guard = session.write();
        let id = guard.team.add_row()?;
        guard
            .team
            .find_row(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("row {id} not found")))?
    };
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_row(
    State(state): State<AppState>,
    Path(row_id): Path<u32>,
    Json(payload): Json<RowPayload>,
) -> Result<Json<RoleAssignment>, ApiError> {
    let session = state.session();
    let mut guard = session.write();
    let team = &mut guard.team;
    if team.find_row(row_id).is_none() {
        return Err(ValidationError::RowNotFound(row_id).into());
    }
    if let Some(role) = payload.role.as_deref() {
        team.set_role(row_id, Some(role))?;
    }
    if let Some(count) = payload.count {
        team.set_count(row_id, count)?;
    }
    if let Some(hours) = payload.hours {
        team.set_hours(row_id, hours)?;
    }
    let row = team
        .find_row(row_id)
        .cloned()
        .ok_or(ValidationError::RowNotFound(row_id))?;
    Ok(Json(row))
}

async fn delete_row(
    State(state): State<AppState>,
    Path(row_id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    let session = state.session();
    let removed = session.write().team.remove_row(row_id);
    if !removed {
        return Err(ValidationError::RowNotFound(row_id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn add_milestone(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Milestone>), ApiError> {
    let session = state.session();
    let milestone = {
        let mut guard = session.write();
        let id = guard.milestones.add()?;
        guard
            .milestones
            .find(id)
            .cloned()
            .ok_or(ValidationError::MilestoneNotFound(id))?
    };
    Ok((StatusCode::CREATED, Json(milestone)))
}

async fn update_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<u32>,
    Json(payload): Json<MilestonePayload>,
) -> Result<Json<Milestone>, ApiError> {
    let session = state.session();
    let mut guard = session.write();
    let plan = &mut guard.milestones;
    if plan.find(milestone_id).is_none() {
        return Err(ValidationError::MilestoneNotFound(milestone_id).into());
    }
    if let Some(percent) = payload.percent {
        plan.set_percent(milestone_id, percent)?;
    }
    if let Some(name) = payload.name {
        plan.set_name(milestone_id, name)?;
    }
    if let Some(description) = payload.description {
        plan.set_description(milestone_id, description)?;
    }
    let milestone = plan
        .find(milestone_id)
        .cloned()
        .ok_or(ValidationError::MilestoneNotFound(milestone_id))?;
    Ok(Json(milestone))
}

async fn delete_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    let session = state.session();
    let removed = session.write().milestones.remove(milestone_id);
    if !removed {
        return Err(ValidationError::MilestoneNotFound(milestone_id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn session_quote(State(state): State<AppState>) -> Result<Json<QuoteOutcome>, ApiError> {
    let request = state.session().read().clone();
    Ok(Json(state.engine.quote(&request)?))
}

async fn session_reports(State(state): State<AppState>) -> Result<Json<ReportBundle>, ApiError> {
    let request = state.session().read().clone();
    let bundle = state
        .engine
        .reports(&request, Local::now().naive_local())?;
    Ok(Json(bundle))
}
